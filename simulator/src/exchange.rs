use indexmap::IndexMap;
use models::{AbilityTrigger, CardCategory, DiceSpec, EffectKind, EffectTiming, PersistenceScope};
use rand::{Rng, rngs::StdRng, seq::IndexedRandom};
use smallvec::SmallVec;

use crate::{
    ACTION_DIE_SIDES, AbilityContext, AbilityEffect, Card, CombatEvent, CombatLog, Hero,
    MAX_ATTACK_DICE, Monster, PersistentEffect, RollModifiers, RulesConfig, TargetPolicy, dice,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExchangePhase {
    Utility,
    Ranged,
    MonsterStrike,
    Melee,
    Cleanup,
}

impl ExchangePhase {
    pub const ORDER: [ExchangePhase; 5] = [
        ExchangePhase::Utility,
        ExchangePhase::Ranged,
        ExchangePhase::MonsterStrike,
        ExchangePhase::Melee,
        ExchangePhase::Cleanup,
    ];
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    #[default]
    Continue,
    Won,
    Lost,
}

#[derive(Debug, Default, Clone)]
pub struct ExchangeReport {
    pub outcome: ExchangeOutcome,
    pub cards_played: usize,
    pub monsters_slain: usize,
    /// Hit points the monsters lost to attacks, splash and bleed.
    pub monster_hp_removed: u64,
    /// Hit points the hero lost to each monster, keyed by monster name.
    pub damage_taken: IndexMap<String, u64>,
}

/// Card and registry modifiers that apply to a single attack.
#[derive(Debug, Default, Clone, Copy)]
struct AttackModifiers {
    rerolls: u32,
    extra_dice: u32,
    flat_damage: u32,
    roll_modifier: i32,
    pierce: u32,
    sweep: bool,
    lifesteal: u32,
    splash: u32,
    shatter: u32,
    armor_per_attack: u32,
    bleed: u32,
}

impl AttackModifiers {
    /// Modifiers of a scoped card are registered after it resolves, so they only count
    /// here when the card has no persistence scope.
    fn gather(card: &Card, hero: &Hero) -> Self {
        let own = |kind: EffectKind| match card.scope() {
            PersistenceScope::None => card.magnitude(kind),
            _ => 0,
        };
        let total = |kind: EffectKind| own(kind).saturating_add(hero.effect_total(kind));
        Self {
            rerolls: total(EffectKind::Reroll),
            extra_dice: total(EffectKind::ExtraDice),
            flat_damage: total(EffectKind::FlatDamage),
            roll_modifier: total(EffectKind::RollModifier).min(i32::MAX as u32) as i32,
            pierce: total(EffectKind::Pierce),
            sweep: total(EffectKind::Sweep) > 0,
            lifesteal: total(EffectKind::Lifesteal),
            splash: total(EffectKind::Splash),
            shatter: total(EffectKind::Shatter),
            armor_per_attack: total(EffectKind::ArmorPerAttack),
            bleed: own(EffectKind::Bleed),
        }
    }
}

/// One round of a wave, resolved phase by phase.
pub struct Exchange<'a> {
    number: u32,
    hero: &'a mut Hero,
    monsters: &'a mut [Monster],
    rules: &'a RulesConfig,
    rng: &'a mut StdRng,
    log: &'a mut CombatLog,
    ranged_as_melee: bool,
    pending_bleed: u32,
    report: ExchangeReport,
}

impl<'a> Exchange<'a> {
    pub fn new(
        number: u32,
        hero: &'a mut Hero,
        monsters: &'a mut [Monster],
        rules: &'a RulesConfig,
        rng: &'a mut StdRng,
        log: &'a mut CombatLog,
    ) -> Self {
        Self {
            number,
            hero,
            monsters,
            rules,
            rng,
            log,
            ranged_as_melee: false,
            pending_bleed: 0,
            report: ExchangeReport::default(),
        }
    }

    /// Runs the start-of-wave hooks of every monster.
    pub fn start_wave(mut self) {
        for i in 0..self.monsters.len() {
            self.trigger(i, AbilityTrigger::StartOfWave);
        }
    }

    pub fn resolve(mut self) -> ExchangeReport {
        for i in 0..self.monsters.len() {
            if self.monsters[i].is_alive() {
                self.trigger(i, AbilityTrigger::StartOfExchange);
            }
        }

        for phase in ExchangePhase::ORDER {
            if self.hero.is_defeated() {
                self.report.outcome = ExchangeOutcome::Lost;
                break;
            }
            self.log
                .record(self.number, || CombatEvent::PhaseStarted(phase));
            tracing::trace!(exchange = self.number, ?phase, "Enter phase");
            match phase {
                ExchangePhase::Utility => self.utility_phase(),
                ExchangePhase::Ranged => {
                    if !self.ranged_as_melee {
                        self.attack_phase(&[CardCategory::Ranged]);
                    }
                }
                ExchangePhase::MonsterStrike => self.monster_strike_phase(),
                ExchangePhase::Melee => {
                    if self.ranged_as_melee {
                        self.attack_phase(&[CardCategory::Melee, CardCategory::Ranged]);
                    } else {
                        self.attack_phase(&[CardCategory::Melee]);
                    }
                    self.bleed_tick();
                }
                ExchangePhase::Cleanup => self.cleanup(),
            }
        }
        if self.hero.is_defeated() {
            self.report.outcome = ExchangeOutcome::Lost;
        }
        self.report
    }

    fn any_alive(&self) -> bool {
        self.monsters.iter().any(Monster::is_alive)
    }

    fn utility_phase(&mut self) {
        while let Some(card) = self.hero.deck.play_first(CardCategory::Utility) {
            self.report.cards_played += 1;
            self.log.record(self.number, || {
                CombatEvent::CardPlayed(card.name().to_string(), card.category())
            });
            self.hero.armor = self.hero.armor.saturating_add(card.armor());
            self.apply_immediate(&card);
            self.register_persistent(&card);
        }
    }

    fn attack_phase(&mut self, categories: &[CardCategory]) {
        while self.any_alive() && !self.hero.is_defeated() {
            let Some(card) = categories
                .iter()
                .find_map(|category| self.hero.deck.play_first(*category))
            else {
                break;
            };
            self.report.cards_played += 1;
            self.resolve_attack(&card);
        }
    }

    /// Fires the on-play tags of a card. Returns the bonus damage bought by sacrificing
    /// hand cards.
    fn apply_immediate(&mut self, card: &Card) -> u32 {
        let mut sacrificed = 0;
        for effect in card.effects_with(EffectTiming::Immediate) {
            match effect.kind {
                EffectKind::Armor => {
                    self.hero.armor = self.hero.armor.saturating_add(effect.magnitude)
                }
                EffectKind::Heal => {
                    self.hero.heal(effect.magnitude);
                }
                EffectKind::Fate => {
                    self.hero.fate.gain(effect.magnitude);
                }
                EffectKind::Draw => self.hero.pending_draws += effect.magnitude as usize,
                EffectKind::Sacrifice => {
                    let discarded = self.hero.deck.discard_weakest(effect.magnitude as usize);
                    sacrificed += discarded.len() as u32;
                }
                _ => {}
            }
        }
        sacrificed
    }

    fn register_persistent(&mut self, card: &Card) {
        let scope = card.scope();
        if scope == PersistenceScope::None {
            return;
        }
        for effect in card.persistent_effects() {
            self.hero.register_effect(PersistentEffect {
                source: card.id,
                kind: effect.kind,
                magnitude: effect.magnitude,
                scope,
            });
        }
    }

    fn resolve_attack(&mut self, card: &Card) {
        self.log.record(self.number, || {
            CombatEvent::CardPlayed(card.name().to_string(), card.category())
        });
        self.hero.armor = self.hero.armor.saturating_add(card.armor());
        let sacrificed = self.apply_immediate(card);

        let Some(target) = self.select_target() else {
            self.register_persistent(card);
            return;
        };
        let modifiers = AttackModifiers::gather(card, self.hero);
        let spec = match card.dice() {
            spec if spec.is_empty() => spec,
            spec => DiceSpec::new(
                spec.count
                    .saturating_add(modifiers.extra_dice)
                    .min(*MAX_ATTACK_DICE),
                spec.sides,
            ),
        };
        let monster = &self.monsters[target];
        let threshold = monster.defense.saturating_sub(modifiers.pierce).max(1);
        let roll = RollModifiers {
            roll_modifier: modifiers.roll_modifier,
            flat_damage: card
                .damage()
                .saturating_add(modifiers.flat_damage)
                .saturating_add(sacrificed),
            rerolls: modifiers.rerolls,
            element: card.element(),
            vulnerability: monster.vulnerability,
            resistance: monster.resistance,
            target_hp: Some(
                (monster.health.current().max(0) as u32).saturating_add(monster.transient_armor),
            ),
        };
        let outcome = dice::resolve(
            spec,
            threshold,
            &roll,
            &mut self.hero.fate,
            self.rules,
            self.rng,
        );
        let target_name = &self.monsters[target].name;
        self.log.record(self.number, || CombatEvent::Attack {
            card: card.name().to_string(),
            target: target_name.clone(),
            hits: outcome.hits,
            damage: outcome.total,
        });

        if outcome.missed() {
            self.trigger(target, AbilityTrigger::OnMiss);
        }

        if outcome.total > 0 {
            let dealt: u32 = if modifiers.sweep {
                self.monsters
                    .iter_mut()
                    .filter(|m| m.is_alive())
                    .map(|m| m.take_hit(outcome.total))
                    .sum()
            } else {
                self.monsters[target].take_hit(outcome.total)
            };
            self.report.monster_hp_removed += dealt as u64;
            if dealt > 0 {
                if modifiers.lifesteal > 0 {
                    self.hero.heal(modifiers.lifesteal.min(dealt));
                }
                if modifiers.splash > 0 {
                    for (i, monster) in self.monsters.iter_mut().enumerate() {
                        if i != target && monster.is_alive() {
                            self.report.monster_hp_removed +=
                                monster.take_hit(modifiers.splash) as u64;
                        }
                    }
                }
                if modifiers.shatter > 0 {
                    let monster = &mut self.monsters[target];
                    monster.defense = monster.defense.saturating_sub(modifiers.shatter).max(1);
                }
            }
        }
        self.hero.armor = self.hero.armor.saturating_add(modifiers.armor_per_attack);
        self.pending_bleed = self.pending_bleed.saturating_add(modifiers.bleed);

        self.settle_deaths();
        self.register_persistent(card);
    }

    fn lowest_hp_target(&self) -> Option<usize> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive())
            .min_by_key(|(_, m)| m.health.current())
            .map(|(i, _)| i)
    }

    /// Picks the attack target according to the hero's policy. Ties on threat are broken
    /// uniformly at random, ties on hit points go to the earliest monster of the wave.
    fn select_target(&mut self) -> Option<usize> {
        if self.hero.targeting == TargetPolicy::HighestThreat {
            let highest = self
                .monsters
                .iter()
                .filter(|m| m.is_alive())
                .filter_map(|m| m.threat)
                .max();
            if let Some(highest) = highest {
                let candidates: SmallVec<[usize; 8]> = self
                    .monsters
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.is_alive() && m.threat == Some(highest))
                    .map(|(i, _)| i)
                    .collect();
                return candidates.choose(&mut *self.rng).copied();
            }
        }
        self.lowest_hp_target()
    }

    fn monster_strike_phase(&mut self) {
        if !self.any_alive() {
            return;
        }
        for i in 0..self.monsters.len() {
            if self.hero.is_defeated() {
                break;
            }
            if !self.monsters[i].is_alive() {
                continue;
            }
            let roll = self.rng.random_range(1..=*ACTION_DIE_SIDES);
            let band = Monster::band_for_roll(roll);
            let mut damage = self.monsters[i].strike_damage(roll);
            let mut ignore_armor = false;
            if damage > 0 {
                match self.fire(i, AbilityTrigger::OnDamageDealt) {
                    Some(AbilityEffect::BonusDamage(bonus)) => damage = damage.saturating_add(bonus),
                    Some(AbilityEffect::IgnoreArmor) => ignore_armor = true,
                    Some(effect) => self.apply_ability(i, effect),
                    None => {}
                }
            }
            let damage = damage.saturating_sub(self.hero.plate);
            self.monsters[i].threat = Some(damage);

            let absorbed = if ignore_armor {
                0
            } else {
                damage.min(self.hero.armor)
            };
            self.hero.armor -= absorbed;
            let dealt = self.hero.take_damage(damage - absorbed);
            if dealt > 0 {
                *self
                    .report
                    .damage_taken
                    .entry(self.monsters[i].name.clone())
                    .or_default() += dealt as u64;
            }
            let name = &self.monsters[i].name;
            self.log.record(self.number, || CombatEvent::MonsterStruck {
                monster: name.clone(),
                band,
                damage,
                absorbed,
            });
        }
    }

    fn bleed_tick(&mut self) {
        let bleed = self
            .pending_bleed
            .saturating_add(self.hero.effect_total(EffectKind::Bleed));
        if bleed == 0 {
            return;
        }
        let Some(target) = self.lowest_hp_target() else {
            return;
        };
        let dealt = self.monsters[target].take_hit(bleed);
        self.report.monster_hp_removed += dealt as u64;
        let name = &self.monsters[target].name;
        self.log
            .record(self.number, || CombatEvent::Bleed(name.clone(), dealt));
        self.settle_deaths();
    }

    fn cleanup(&mut self) {
        if !self.any_alive() {
            self.report.outcome = ExchangeOutcome::Won;
        } else if self.hero.poison > 0 {
            let poison = self.hero.poison;
            self.log.record(self.number, || CombatEvent::Poisoned(poison));
            self.hero.take_damage(poison);
        }
        let expired = self
            .hero
            .exchange_effects
            .expire(PersistenceScope::Exchange);
        if expired > 0 {
            self.log
                .record(self.number, || CombatEvent::EffectsExpired(expired));
        }
        self.hero.decay_armor(self.rules.armor_policy);
        for monster in self.monsters.iter_mut() {
            monster.end_exchange();
        }
    }

    /// Marks freshly killed monsters as slain and runs their on-death hooks until no new
    /// deaths occur.
    fn settle_deaths(&mut self) {
        while let Some(i) = self
            .monsters
            .iter()
            .position(|m| !m.is_alive() && !m.slain)
        {
            self.monsters[i].slain = true;
            self.report.monsters_slain += 1;
            let label = self.monsters[i].label();
            tracing::trace!(exchange = self.number, monster = %label, "Monster slain");
            self.log
                .record(self.number, || CombatEvent::MonsterSlain(label));
            self.trigger(i, AbilityTrigger::OnDeath);
        }
    }

    fn fire(&mut self, i: usize, trigger: AbilityTrigger) -> Option<AbilityEffect> {
        let context = AbilityContext {
            exchange: self.number,
            hero_hand: self.hero.deck.hand().len(),
            hero_effects: self.hero.active_effects(),
            others_alive: self
                .monsters
                .iter()
                .enumerate()
                .filter(|(j, m)| *j != i && m.is_alive())
                .count(),
        };
        let effect = self.monsters[i].try_fire(trigger, &context)?;
        if let Some(ability) = self.monsters[i].ability {
            let name = &self.monsters[i].name;
            self.log.record(self.number, || {
                CombatEvent::AbilityTriggered(name.clone(), ability.kind)
            });
        }
        Some(effect)
    }

    fn trigger(&mut self, i: usize, trigger: AbilityTrigger) {
        if let Some(effect) = self.fire(i, trigger) {
            self.apply_ability(i, effect);
        }
    }

    fn apply_ability(&mut self, i: usize, effect: AbilityEffect) {
        match effect {
            // Only meaningful while a strike is being resolved.
            AbilityEffect::BonusDamage(_) | AbilityEffect::IgnoreArmor => {}
            AbilityEffect::Poison(amount) => {
                self.hero.poison = self.hero.poison.saturating_add(amount)
            }
            AbilityEffect::DrainFate(amount) => {
                self.hero.fate.drain(amount);
            }
            AbilityEffect::ForceMelee => self.ranged_as_melee = true,
            AbilityEffect::CancelEffect { heal } => {
                if let Some(cancelled) = self.hero.cancel_random_effect(self.rng) {
                    tracing::trace!(?cancelled, "Persistent effect cancelled");
                    self.monsters[i].heal(heal);
                }
            }
            AbilityEffect::ForceDiscard(count) => {
                self.hero.deck.discard_weakest(count);
            }
            AbilityEffect::TransientArmor(amount) => {
                let monster = &mut self.monsters[i];
                monster.transient_armor = monster.transient_armor.saturating_add(amount);
            }
            AbilityEffect::DamageReduction(amount) => self.monsters[i].damage_reduction = amount,
            AbilityEffect::HeroDamage(amount) => {
                self.hero.take_damage(amount);
            }
            AbilityEffect::KillOther => {
                if let Some(other) = self
                    .monsters
                    .iter()
                    .enumerate()
                    .position(|(j, m)| j != i && m.is_alive())
                {
                    self.monsters[other].kill();
                }
            }
        }
    }
}
