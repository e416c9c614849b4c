use models::{AbilityKind, CardCategory};

use crate::ExchangePhase;

#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    WaveStarted(Vec<String>),
    PhaseStarted(ExchangePhase),
    CardPlayed(String, CardCategory),
    Attack {
        card: String,
        target: String,
        hits: u32,
        damage: u32,
    },
    MonsterStruck {
        monster: String,
        band: usize,
        damage: u32,
        absorbed: u32,
    },
    AbilityTriggered(String, AbilityKind),
    MonsterSlain(String),
    Bleed(String, u32),
    Poisoned(u32),
    EffectsExpired(usize),
    Stalled(u32),
    UpgradeGained(String),
}

/// An event tagged with the exchange it happened in.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedCombatEvent(pub u32, pub CombatEvent);

/// Optional in-memory record of everything that happened in a wave.
#[derive(Clone, Debug, Default)]
pub struct CombatLog {
    enabled: bool,
    events: Vec<TaggedCombatEvent>,
}

impl CombatLog {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            events: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Records the event built by `event`; the closure only runs when logging is on.
    pub fn record(&mut self, exchange: u32, event: impl FnOnce() -> CombatEvent) {
        if self.enabled {
            self.events.push(TaggedCombatEvent(exchange, event()));
        }
    }

    pub fn events(&self) -> &[TaggedCombatEvent] {
        &self.events
    }

    pub fn phases(&self, exchange: u32) -> Vec<ExchangePhase> {
        self.events
            .iter()
            .filter(|e| e.0 == exchange)
            .filter_map(|e| match e.1 {
                CombatEvent::PhaseStarted(phase) => Some(phase),
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for CombatLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut last_exchange = None;
        for TaggedCombatEvent(exchange, event) in &self.events {
            if last_exchange != Some(*exchange) {
                writeln!(f, "[{exchange}] Exchange")?;
                last_exchange = Some(*exchange);
            }
            writeln!(f, "  {event:?}")?;
        }
        Ok(())
    }
}
