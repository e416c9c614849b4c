/// Stat adjustments applied to a monster of a given level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LevelModifier {
    pub defense: u32,
    pub hp: u32,
    pub damage: u32,
}

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 6;

lazy_static::lazy_static! {
    static ref LEVEL_MODIFIERS: [LevelModifier; MAX_LEVEL as usize] = [
        LevelModifier { defense: 0, hp: 0, damage: 0 },
        LevelModifier { defense: 0, hp: 2, damage: 1 },
        LevelModifier { defense: 1, hp: 5, damage: 3 },
        LevelModifier { defense: 1, hp: 7, damage: 5 },
        LevelModifier { defense: 2, hp: 10, damage: 7 },
        LevelModifier { defense: 2, hp: 15, damage: 10 },
    ];
}

impl LevelModifier {
    pub fn for_level(level: u8) -> anyhow::Result<LevelModifier> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            anyhow::bail!("monster level {level} outside {MIN_LEVEL}..={MAX_LEVEL}");
        }
        Ok(LEVEL_MODIFIERS[(level - MIN_LEVEL) as usize])
    }
}
