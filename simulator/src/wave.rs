use std::time::Instant;

use indexmap::IndexMap;
use rand::rngs::StdRng;

use crate::{
    CombatEvent, CombatLog, Exchange, ExchangeOutcome, Hero, Monster, RulesConfig, RunBounds,
    SimulationError, WavePlan,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveState {
    Spawned,
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LossCause {
    Defeated,
    Stalled,
    ExchangeCap,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveOutcome {
    Won,
    Lost(LossCause),
}

#[derive(Debug, Clone)]
pub struct WaveReport {
    pub outcome: WaveOutcome,
    pub exchanges: u32,
    pub damage_taken: IndexMap<String, u64>,
}

/// Shared state of the gauntlet a wave runs in.
pub struct GauntletContext<'a> {
    pub rules: &'a RulesConfig,
    pub bounds: RunBounds,
    pub rng: &'a mut StdRng,
    pub started: Instant,
    pub total_exchanges: u32,
    /// Set while the opening hand covers the next exchange's draw.
    pub skip_next_draw: bool,
    pub log_events: bool,
}

impl<'a> GauntletContext<'a> {
    pub fn new(rules: &'a RulesConfig, bounds: RunBounds, rng: &'a mut StdRng) -> Self {
        Self {
            rules,
            bounds,
            rng,
            started: Instant::now(),
            total_exchanges: 0,
            skip_next_draw: false,
            log_events: false,
        }
    }

    pub fn with_event_log(mut self) -> Self {
        self.log_events = true;
        self
    }
}

/// The monsters of one encounter and the state machine driving it.
#[derive(Debug, Clone)]
pub struct Wave {
    pub index: usize,
    pub monsters: Vec<Monster>,
    pub state: WaveState,
    pub log: CombatLog,
}

impl Wave {
    pub fn new(index: usize, monsters: Vec<Monster>) -> Self {
        Self {
            index,
            monsters,
            state: WaveState::Spawned,
            log: CombatLog::disabled(),
        }
    }

    pub fn spawn(index: usize, plan: &WavePlan) -> Self {
        Self::new(index, plan.spawn())
    }

    pub fn monster_names(&self) -> Vec<String> {
        self.monsters.iter().map(Monster::label).collect()
    }

    fn timeout(
        &self,
        hero: &Hero,
        ctx: &GauntletContext<'_>,
        started: Instant,
        exchanges: u32,
    ) -> Result<(), SimulationError> {
        match ctx
            .bounds
            .exceeded(ctx.started, started, exchanges, ctx.total_exchanges)
        {
            Some(bound) => {
                tracing::debug!(hero = %hero.name, wave = self.index + 1, %bound, "Wave timed out");
                Err(SimulationError::Timeout {
                    hero: hero.name.clone(),
                    wave: self.index + 1,
                    monsters: self.monster_names(),
                    bound,
                })
            }
            None => Ok(()),
        }
    }

    /// Fights the wave to the end. Budgets are checked before every exchange.
    pub fn run(
        &mut self,
        hero: &mut Hero,
        ctx: &mut GauntletContext<'_>,
    ) -> Result<WaveReport, SimulationError> {
        let started = Instant::now();
        if ctx.log_events {
            self.log = CombatLog::enabled();
        }
        self.timeout(hero, ctx, started, 0)?;

        let names = self.monster_names();
        self.log.record(0, || CombatEvent::WaveStarted(names));
        Exchange::new(0, hero, &mut self.monsters, ctx.rules, ctx.rng, &mut self.log)
            .start_wave();
        self.state = WaveState::InProgress;

        let mut exchanges = 0u32;
        let mut stalled = 0u32;
        let mut damage_taken: IndexMap<String, u64> = IndexMap::new();
        let outcome = loop {
            self.timeout(hero, ctx, started, exchanges)?;
            if exchanges >= ctx.rules.max_exchanges_per_wave {
                break WaveOutcome::Lost(LossCause::ExchangeCap);
            }
            exchanges += 1;
            ctx.total_exchanges += 1;

            if ctx.skip_next_draw {
                ctx.skip_next_draw = false;
            } else {
                let count = ctx.rules.exchange_draw + hero.take_pending_draws();
                hero.deck.draw(count, ctx.rng);
            }

            let report = Exchange::new(
                exchanges,
                hero,
                &mut self.monsters,
                ctx.rules,
                ctx.rng,
                &mut self.log,
            )
            .resolve();
            for (monster, damage) in report.damage_taken {
                *damage_taken.entry(monster).or_default() += damage;
            }

            match report.outcome {
                ExchangeOutcome::Won => break WaveOutcome::Won,
                ExchangeOutcome::Lost => break WaveOutcome::Lost(LossCause::Defeated),
                ExchangeOutcome::Continue => {}
            }

            if report.monsters_slain > 0 || report.monster_hp_removed > 0 {
                stalled = 0;
            } else {
                stalled += 1;
            }
            if stalled >= ctx.rules.stall_limit {
                self.force_resolve(hero, ctx.rules.stall_penalty, exchanges);
                break WaveOutcome::Lost(LossCause::Stalled);
            }
        };

        self.state = match outcome {
            WaveOutcome::Won => WaveState::Won,
            WaveOutcome::Lost(_) => WaveState::Lost,
        };
        hero.end_wave();
        tracing::debug!(
            hero = %hero.name,
            wave = self.index + 1,
            ?outcome,
            exchanges,
            hp = %hero.health,
            "Wave finished"
        );

        Ok(WaveReport {
            outcome,
            exchanges,
            damage_taken,
        })
    }

    /// Ends a wave that stopped making progress: the hero takes a fixed hit and every
    /// remaining monster dies.
    fn force_resolve(&mut self, hero: &mut Hero, penalty: u32, exchange: u32) {
        tracing::debug!(hero = %hero.name, wave = self.index + 1, penalty, "Wave stalled");
        hero.take_damage(penalty);
        for monster in self.monsters.iter_mut().filter(|m| m.is_alive()) {
            monster.kill();
            monster.slain = true;
        }
        self.log.record(exchange, || CombatEvent::Stalled(penalty));
    }
}
