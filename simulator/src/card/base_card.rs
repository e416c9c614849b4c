use std::sync::Arc;

use models::{
    CardCategory, CardEffect, DiceSpec, EffectKind, EffectTiming, Element, PersistenceScope,
    Rarity,
};

use super::{CardId, CardTemplate};

/// A card copy owned by a deck. The template is shared and never mutated.
#[derive(Clone, Debug)]
pub struct Card {
    pub id: CardId,
    pub inner: Arc<CardTemplate>,
    pub upgrade: bool,
}

impl Card {
    pub fn new(inner: Arc<CardTemplate>, upgrade: bool, id: CardId) -> Self {
        Self {
            id,
            inner,
            upgrade,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn category(&self) -> CardCategory {
        self.inner.category
    }

    pub fn dice(&self) -> DiceSpec {
        self.inner.dice
    }

    pub fn armor(&self) -> u32 {
        self.inner.armor
    }

    pub fn damage(&self) -> u32 {
        self.inner.damage
    }

    pub fn element(&self) -> Element {
        self.inner.element
    }

    pub fn rarity(&self) -> Rarity {
        self.inner.rarity
    }

    pub fn scope(&self) -> PersistenceScope {
        self.inner.scope
    }

    /// Worth of the card when deciding what to throw away.
    pub fn value(&self) -> u32 {
        self.inner.dice.value()
    }

    /// Summed magnitude of every tag of the given kind.
    pub fn magnitude(&self, kind: EffectKind) -> u32 {
        self.inner
            .effects
            .iter()
            .filter(|effect| effect.kind == kind)
            .fold(0u32, |total, effect| total.saturating_add(effect.magnitude))
    }

    pub fn effects_with(&self, timing: EffectTiming) -> impl Iterator<Item = &CardEffect> {
        self.inner
            .effects
            .iter()
            .filter(move |effect| effect.kind.timing() == timing)
    }

    pub fn persistent_effects(&self) -> impl Iterator<Item = &CardEffect> {
        self.inner
            .effects
            .iter()
            .filter(|effect| effect.kind.is_persistable())
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.inner.name, self.inner.dice)?;
        if self.upgrade {
            write!(f, " (upgrade)")?;
        }
        Ok(())
    }
}
