use models::{
    CardCategory, CardEffect, DiceSpec, EffectTiming, Element, PersistenceScope, Rarity,
};
use serde::Deserialize;

use crate::MAX_ATTACK_DICE;

fn default_copies() -> u32 {
    1
}

#[derive(Clone, Debug, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub category: CardCategory,
    #[serde(default)]
    pub dice: DiceSpec,
    #[serde(default)]
    pub armor: u32,
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub scope: PersistenceScope,
    #[serde(default)]
    pub effects: Vec<CardEffect>,
    #[serde(default = "default_copies")]
    pub copies: u32,
}

impl CardTemplate {
    pub fn new(name: &str, category: CardCategory, dice: DiceSpec) -> Self {
        Self {
            name: name.to_string(),
            category,
            dice,
            armor: 0,
            damage: 0,
            element: Element::None,
            rarity: Rarity::Base,
            scope: PersistenceScope::None,
            effects: Vec::new(),
            copies: 1,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("card template without a name: {self:?}");
        }
        if self.copies == 0 {
            anyhow::bail!("card {} has zero copies", self.name);
        }
        if self.category == CardCategory::Utility {
            if !self.dice.is_empty() || self.damage > 0 {
                anyhow::bail!("utility card {} cannot roll dice or deal damage", self.name);
            }
            let carries_modifiers = self
                .effects
                .iter()
                .any(|effect| effect.kind.timing() != EffectTiming::Immediate);
            if carries_modifiers && self.scope == PersistenceScope::None {
                anyhow::bail!(
                    "utility card {} carries attack modifiers but no persistence scope",
                    self.name
                );
            }
        }
        if self.dice.count > 0 && self.dice.sides < 2 {
            anyhow::bail!("card {} rolls dice with fewer than two sides", self.name);
        }
        if self.dice.count > *MAX_ATTACK_DICE {
            anyhow::bail!(
                "card {} rolls {} dice, more than the {} allowed",
                self.name,
                self.dice.count,
                *MAX_ATTACK_DICE
            );
        }
        Ok(())
    }
}
