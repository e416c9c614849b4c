use std::sync::Arc;

use indexmap::IndexMap;
use models::Rarity;
use rand::{Rng, rngs::StdRng};

use crate::{
    CombatEvent, CombatLog, EncounterBook, GauntletContext, HP_LOG_LENGTH, Hero, HeroProfile,
    RulesConfig, RunBounds, SimulationError, Wave, WaveOutcome, WaveState,
};

/// A monster met in a wave the hero reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Encounter {
    pub monster: String,
    pub elite: bool,
}

/// Everything the statistics need from one gauntlet.
#[derive(Debug, Clone)]
pub struct GauntletRecord {
    pub hero: String,
    pub max_hp: u64,
    pub won: bool,
    pub waves_cleared: usize,
    /// Hit points left after each wave, as a percentage of max hp.
    pub hp_log: [f64; HP_LOG_LENGTH],
    /// Rarity and name of every card in the final deck.
    pub deck: Vec<(Rarity, String)>,
    /// Distinct monsters met over the whole gauntlet.
    pub encounters: Vec<Encounter>,
    /// Hit points the hero lost to each monster.
    pub damage_taken: IndexMap<String, u64>,
    pub exchanges: u32,
    /// Per-wave combat logs, only filled when event logging is on.
    pub logs: Vec<CombatLog>,
}

/// One hero running through a sequence of waves.
#[derive(Clone, Debug)]
pub struct Gauntlet {
    pub profile: Arc<HeroProfile>,
    pub book: Arc<EncounterBook>,
    pub rules: Arc<RulesConfig>,
    pub bounds: RunBounds,
    pub log_events: bool,
}

impl Gauntlet {
    pub fn new(
        profile: Arc<HeroProfile>,
        book: Arc<EncounterBook>,
        rules: Arc<RulesConfig>,
        bounds: RunBounds,
    ) -> Self {
        Self {
            profile,
            book,
            rules,
            bounds,
            log_events: false,
        }
    }

    pub fn with_event_log(mut self) -> Self {
        self.log_events = true;
        self
    }

    /// Runs a complete gauntlet with a freshly built hero. The hero never outlives the call.
    #[tracing::instrument(level = "debug", skip_all, fields(hero = %self.profile.name))]
    pub fn run_once_with_rng(&self, mut rng: StdRng) -> Result<GauntletRecord, SimulationError> {
        let waves = self.book.select(&mut rng);
        let mut hero = Hero::new(self.profile.clone(), &self.rules, &mut rng);
        hero.deck.draw(self.rules.opening_hand, &mut rng);

        let mut ctx = GauntletContext::new(&self.rules, self.bounds, &mut rng);
        ctx.skip_next_draw = true;
        ctx.log_events = self.log_events;

        let mut hp_log = [0.0; HP_LOG_LENGTH];
        let mut encounters = Vec::new();
        let mut damage_taken: IndexMap<String, u64> = IndexMap::new();
        let mut waves_cleared = 0;
        let mut logs = Vec::new();

        for (index, plan) in waves.iter().enumerate() {
            let mut wave = Wave::spawn(index, plan);
            for monster in &wave.monsters {
                let encounter = Encounter {
                    monster: monster.name.clone(),
                    elite: monster.elite,
                };
                if !encounters.contains(&encounter) {
                    encounters.push(encounter);
                }
            }

            let report = wave.run(&mut hero, &mut ctx)?;
            for (monster, damage) in report.damage_taken {
                *damage_taken.entry(monster).or_default() += damage;
            }
            hp_log[index] = hero.health.percent();

            match report.outcome {
                WaveOutcome::Won => {
                    waves_cleared += 1;
                    if index + 1 < waves.len() {
                        let mut count = if ctx.rng.random_bool(0.5) { 2 } else { 1 };
                        if self.rules.bonus_upgrade_after.contains(&(index + 1)) {
                            count += 1;
                        }
                        let gained =
                            hero.gain_upgrades(count, &self.rules.upgrade_weights, ctx.rng);
                        for name in gained {
                            wave.log
                                .record(report.exchanges, || CombatEvent::UpgradeGained(name));
                        }
                    }
                }
                WaveOutcome::Lost(cause) => {
                    tracing::debug!(wave = index + 1, ?cause, "Gauntlet lost");
                }
            }
            let lost = wave.state == WaveState::Lost;
            if self.log_events {
                logs.push(wave.log);
            }
            if lost {
                break;
            }
        }

        Ok(GauntletRecord {
            hero: hero.name.clone(),
            max_hp: hero.health.max(),
            won: waves_cleared == waves.len(),
            waves_cleared,
            hp_log,
            deck: hero
                .deck
                .cards()
                .map(|card| (card.rarity(), card.name().to_string()))
                .collect(),
            encounters,
            damage_taken,
            exchanges: ctx.total_exchanges,
            logs,
        })
    }
}
