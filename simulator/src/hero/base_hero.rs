use std::sync::Arc;

use models::{EffectKind, PersistenceScope};
use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{ArmorPolicy, Card, CardIdSequence, CardTemplate, Deck, RulesConfig, UpgradeWeights};

use super::{EffectRegistry, Fate, Health, HeroProfile, PersistentEffect, TargetPolicy};

#[derive(Clone, Debug)]
pub struct Hero {
    pub name: String,
    pub health: Health,
    pub armor: u32,
    pub fate: Fate,
    pub plate: u32,
    pub poison: u32,
    pub pending_draws: usize,
    pub targeting: TargetPolicy,
    pub deck: Deck,
    pub exchange_effects: EffectRegistry,
    pub combat_effects: EffectRegistry,
    pub card_ids: CardIdSequence,
    pub profile: Arc<HeroProfile>,
}

impl Hero {
    /// Builds a fresh hero with a shuffled starting deck.
    pub fn new(profile: Arc<HeroProfile>, rules: &RulesConfig, rng: &mut StdRng) -> Self {
        let mut card_ids = CardIdSequence::default();
        let cards = profile
            .starting_deck
            .iter()
            .map(|template| Card::new(template.clone(), false, card_ids.next_id()))
            .collect();
        Self {
            name: profile.name.clone(),
            health: Health::full(profile.max_hp),
            armor: 0,
            fate: Fate::new(profile.starting_fate, profile.fate_max),
            plate: profile.plate,
            poison: 0,
            pending_draws: 0,
            targeting: profile.targeting,
            deck: Deck::shuffled(cards, rules.hand_capacity, rng),
            exchange_effects: EffectRegistry::new(PersistenceScope::Exchange),
            combat_effects: EffectRegistry::new(PersistenceScope::Combat),
            card_ids,
            profile,
        }
    }

    /// Creates a new card copy owned by this hero.
    pub fn mint_card(&mut self, template: Arc<CardTemplate>, upgrade: bool) -> Card {
        Card::new(template, upgrade, self.card_ids.next_id())
    }

    pub fn is_defeated(&self) -> bool {
        self.health.is_depleted()
    }

    /// Returns the hit points actually lost, which never exceeds the current health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.health.current();
        self.health -= amount as i64;
        (before - self.health.current()) as u32
    }

    /// Heals up to `amount` and returns the hit points actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health.current();
        self.health += amount as i64;
        (self.health.current() - before) as u32
    }

    pub fn registry_mut(&mut self, scope: PersistenceScope) -> Option<&mut EffectRegistry> {
        match scope {
            PersistenceScope::None => None,
            PersistenceScope::Exchange => Some(&mut self.exchange_effects),
            PersistenceScope::Combat => Some(&mut self.combat_effects),
        }
    }

    /// Registers an effect in the registry of its scope. Effects without a scope are dropped.
    pub fn register_effect(&mut self, effect: PersistentEffect) {
        let Some(registry) = self.registry_mut(effect.scope) else {
            return;
        };
        if let Some(evicted) = registry.register(effect) {
            tracing::trace!(?evicted, "Evict persistent effect");
        }
    }

    /// Summed magnitude of an effect kind across both registries.
    pub fn effect_total(&self, kind: EffectKind) -> u32 {
        self.exchange_effects
            .total(kind)
            .saturating_add(self.combat_effects.total(kind))
    }

    pub fn active_effects(&self) -> usize {
        self.exchange_effects.len() + self.combat_effects.len()
    }

    /// Cancels one active effect chosen uniformly across both registries.
    pub fn cancel_random_effect(&mut self, rng: &mut StdRng) -> Option<PersistentEffect> {
        let total = self.active_effects();
        if total == 0 {
            return None;
        }
        let index = rng.random_range(0..total);
        let exchange_len = self.exchange_effects.len();
        if index < exchange_len {
            self.exchange_effects.remove(index)
        } else {
            self.combat_effects.remove(index - exchange_len)
        }
    }

    pub fn decay_armor(&mut self, policy: ArmorPolicy) {
        self.armor = policy.decay(self.armor);
    }

    pub fn take_pending_draws(&mut self) -> usize {
        std::mem::take(&mut self.pending_draws)
    }

    /// Clears everything that only lasts for one wave.
    pub fn end_wave(&mut self) {
        self.exchange_effects.expire(PersistenceScope::Exchange);
        self.combat_effects.expire(PersistenceScope::Combat);
        self.poison = 0;
        self.armor = 0;
        self.pending_draws = 0;
    }

    /// Adds `count` cards sampled from the upgrade pool, weighted by rarity, on top of the
    /// draw pile. Returns the names of the gained cards.
    pub fn gain_upgrades(
        &mut self,
        count: usize,
        weights: &UpgradeWeights,
        rng: &mut StdRng,
    ) -> Vec<String> {
        let mut gained = Vec::with_capacity(count);
        for _ in 0..count {
            let Ok(template) = self
                .profile
                .upgrade_pool
                .choose_weighted(rng, |card| weights.weight(card.rarity))
                .map(Arc::clone)
            else {
                break;
            };
            let card = self.mint_card(template, true);
            gained.push(card.name().to_string());
            self.deck.put_on_top(card);
        }
        gained
    }
}

impl std::fmt::Display for Hero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(❤️ {}/{}, 🛡️:{}, fate:{}/{}, 🧪:{}) [{} cards]",
            self.name,
            self.health.current(),
            self.health.max(),
            self.armor,
            self.fate.current(),
            self.fate.max(),
            self.poison,
            self.deck.len(),
        )
    }
}
