lazy_static::lazy_static! {
    pub static ref DEFAULT_HAND_CAPACITY: usize = 7;
    pub static ref DEFAULT_OPENING_HAND: usize = 4;
    pub static ref DEFAULT_EXCHANGE_DRAW: usize = 3;
    pub static ref DEFAULT_FATE_MAX: u32 = 10;
    pub static ref DEFAULT_MAX_FATE_REROLLS: u32 = 2;
    pub static ref DEFAULT_CRITICAL_POINTS: u32 = 2;
    pub static ref DEFAULT_STALL_LIMIT: u32 = 2;
    pub static ref DEFAULT_STALL_PENALTY: u32 = 3;
    pub static ref DEFAULT_MAX_EXCHANGES_PER_WAVE: u32 = 100;
    pub static ref DEFAULT_BONUS_UPGRADE_AFTER: Vec<usize> = vec![3, 6];
    pub static ref EFFECT_REGISTRY_CAPACITY: usize = 16;
    pub static ref ACTION_DIE_SIDES: u32 = 8;
    pub static ref MAX_MONSTER_DEFENSE: u32 = *ACTION_DIE_SIDES;
    /// Upper bound on the dice of a single attack, extra dice included.
    pub static ref MAX_ATTACK_DICE: u32 = 64;

    pub static ref DEFAULT_RUNS: usize = 1000;
    pub static ref DEFAULT_TIMEOUT_SECONDS: f64 = 60.0;
    pub static ref DEFAULT_MAX_RETRIES: u32 = 5;
    pub static ref DEFAULT_MAX_EXCHANGES: u32 = 1000;
    pub static ref DEFAULT_WAVE_TIMEOUT_SECONDS: f64 = 10.0;
}

/// Number of waves tracked by the hit-point retention log.
pub const HP_LOG_LENGTH: usize = 8;
pub const ACTION_BANDS: usize = 4;
