use std::time::{Duration, Instant};

use models::Rarity;
use serde::Deserialize;

use crate::{
    DEFAULT_BONUS_UPGRADE_AFTER, DEFAULT_CRITICAL_POINTS, DEFAULT_EXCHANGE_DRAW,
    DEFAULT_HAND_CAPACITY, DEFAULT_MAX_EXCHANGES, DEFAULT_MAX_EXCHANGES_PER_WAVE,
    DEFAULT_MAX_FATE_REROLLS, DEFAULT_MAX_RETRIES, DEFAULT_OPENING_HAND, DEFAULT_RUNS,
    DEFAULT_STALL_LIMIT, DEFAULT_STALL_PENALTY, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_WAVE_TIMEOUT_SECONDS, SimulationError, TimeoutBound,
};

/// What happens to the hero's unspent armor when an exchange ends.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorPolicy {
    #[default]
    Reset,
    Halve,
    Persist,
}

impl ArmorPolicy {
    pub fn decay(&self, armor: u32) -> u32 {
        match self {
            ArmorPolicy::Reset => 0,
            ArmorPolicy::Halve => armor / 2,
            ArmorPolicy::Persist => armor,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpgradeWeights {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
}

impl Default for UpgradeWeights {
    fn default() -> Self {
        Self {
            common: 3,
            uncommon: 2,
            rare: 1,
        }
    }
}

impl UpgradeWeights {
    pub fn weight(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Base => 0,
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
        }
    }
}

/// Rule-set knobs that differ between drafts of the rulebook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub max_fate_rerolls: u32,
    pub fate_requires_lethal: bool,
    pub critical_points: u32,
    pub armor_policy: ArmorPolicy,
    pub minimum_damage: u32,
    pub hand_capacity: usize,
    pub opening_hand: usize,
    pub exchange_draw: usize,
    pub stall_limit: u32,
    pub stall_penalty: u32,
    pub max_exchanges_per_wave: u32,
    pub bonus_upgrade_after: Vec<usize>,
    pub upgrade_weights: UpgradeWeights,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_fate_rerolls: *DEFAULT_MAX_FATE_REROLLS,
            fate_requires_lethal: true,
            critical_points: *DEFAULT_CRITICAL_POINTS,
            armor_policy: ArmorPolicy::default(),
            minimum_damage: 0,
            hand_capacity: *DEFAULT_HAND_CAPACITY,
            opening_hand: *DEFAULT_OPENING_HAND,
            exchange_draw: *DEFAULT_EXCHANGE_DRAW,
            stall_limit: *DEFAULT_STALL_LIMIT,
            stall_penalty: *DEFAULT_STALL_PENALTY,
            max_exchanges_per_wave: *DEFAULT_MAX_EXCHANGES_PER_WAVE,
            bonus_upgrade_after: DEFAULT_BONUS_UPGRADE_AFTER.clone(),
            upgrade_weights: UpgradeWeights::default(),
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hand_capacity == 0 {
            anyhow::bail!("hand capacity must be at least 1");
        }
        if self.stall_limit == 0 {
            anyhow::bail!("stall limit must be at least 1");
        }
        if self.max_exchanges_per_wave == 0 {
            anyhow::bail!("max exchanges per wave must be at least 1");
        }
        Ok(())
    }
}

/// Parameters of one statistics run, as handed over by the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub runs: usize,
    pub timeout_seconds: f64,
    pub max_retries: u32,
    pub max_exchanges_per_wave: Option<u32>,
    pub wave_timeout_seconds: Option<f64>,
    pub max_total_exchanges: Option<u32>,
    pub seed: u64,
    pub workers: Option<usize>,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            runs: *DEFAULT_RUNS,
            timeout_seconds: *DEFAULT_TIMEOUT_SECONDS,
            max_retries: *DEFAULT_MAX_RETRIES,
            max_exchanges_per_wave: Some(*DEFAULT_MAX_EXCHANGES),
            wave_timeout_seconds: Some(*DEFAULT_WAVE_TIMEOUT_SECONDS),
            max_total_exchanges: None,
            seed: 0,
            workers: None,
        }
    }
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |reason: String| Err(SimulationError::InvalidRequest(reason));
        if self.runs == 0 {
            return invalid("runs must be greater than zero".to_string());
        }
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return invalid(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout_seconds
            ));
        }
        if let Some(wave_timeout) = self.wave_timeout_seconds {
            if !wave_timeout.is_finite() || wave_timeout < 0.0 {
                return invalid(format!(
                    "wave timeout must not be negative, got {wave_timeout}"
                ));
            }
        }
        if self.max_exchanges_per_wave == Some(0) {
            return invalid("max exchanges per wave must be greater than zero".to_string());
        }
        if self.max_total_exchanges == Some(0) {
            return invalid("max total exchanges must be greater than zero".to_string());
        }
        if self.workers == Some(0) {
            return invalid("worker count must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Budgets for a single gauntlet. Call [`SimulationRequest::validate`] first.
    pub fn bounds(&self) -> RunBounds {
        RunBounds {
            gauntlet_timeout: Some(Duration::from_secs_f64(self.timeout_seconds)),
            wave_timeout: self.wave_timeout_seconds.map(Duration::from_secs_f64),
            max_exchanges_per_wave: self.max_exchanges_per_wave,
            max_total_exchanges: self.max_total_exchanges,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(num_cpus::get)
            .clamp(1, self.runs.max(1))
    }
}

/// Budgets checked at every exchange boundary of a gauntlet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunBounds {
    pub gauntlet_timeout: Option<Duration>,
    pub wave_timeout: Option<Duration>,
    pub max_exchanges_per_wave: Option<u32>,
    pub max_total_exchanges: Option<u32>,
}

impl RunBounds {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn exceeded(
        &self,
        gauntlet_started: Instant,
        wave_started: Instant,
        wave_exchanges: u32,
        total_exchanges: u32,
    ) -> Option<TimeoutBound> {
        if let Some(limit) = self.wave_timeout {
            if wave_started.elapsed() >= limit {
                return Some(TimeoutBound::WaveDuration(limit));
            }
        }
        if let Some(limit) = self.gauntlet_timeout {
            if gauntlet_started.elapsed() >= limit {
                return Some(TimeoutBound::GauntletDuration(limit));
            }
        }
        if let Some(limit) = self.max_exchanges_per_wave {
            if wave_exchanges >= limit {
                return Some(TimeoutBound::WaveExchanges(limit));
            }
        }
        if let Some(limit) = self.max_total_exchanges {
            if total_exchanges >= limit {
                return Some(TimeoutBound::TotalExchanges(limit));
            }
        }
        None
    }
}
