use models::{EffectKind, PersistenceScope};
use smallvec::SmallVec;

use crate::{CardId, EFFECT_REGISTRY_CAPACITY};

/// A modifier that outlives the card resolution that created it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PersistentEffect {
    pub source: CardId,
    pub kind: EffectKind,
    pub magnitude: u32,
    pub scope: PersistenceScope,
}

/// Ordered, bounded list of the active effects of one scope.
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    scope: PersistenceScope,
    entries: SmallVec<[PersistentEffect; 8]>,
}

impl EffectRegistry {
    pub fn new(scope: PersistenceScope) -> Self {
        Self {
            scope,
            entries: SmallVec::new(),
        }
    }

    pub fn scope(&self) -> PersistenceScope {
        self.scope
    }

    /// Registers an effect, evicting and returning the oldest entry when full.
    pub fn register(&mut self, effect: PersistentEffect) -> Option<PersistentEffect> {
        let evicted = if self.entries.len() >= *EFFECT_REGISTRY_CAPACITY {
            Some(self.entries.remove(0))
        } else {
            None
        };
        self.entries.push(effect);
        evicted
    }

    pub fn total(&self, kind: EffectKind) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .fold(0u32, |total, e| total.saturating_add(e.magnitude))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersistentEffect> {
        self.entries.iter()
    }

    pub fn remove(&mut self, index: usize) -> Option<PersistentEffect> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Drops every entry whose scope ends at `ending` and returns how many went.
    pub fn expire(&mut self, ending: PersistenceScope) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.scope != ending);
        before - self.entries.len()
    }
}
