use std::str::FromStr;

use serde::Deserialize;

use crate::re::{DICE_SPEC_REGEX, FLAT_DICE_REGEX};

/// A die specification such as `2d8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
}

impl DiceSpec {
    pub const NONE: DiceSpec = DiceSpec { count: 0, sides: 8 };

    pub fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Rough worth of the dice, used to pick which card to throw away.
    pub fn value(&self) -> u32 {
        self.count.saturating_mul(self.sides)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for DiceSpec {
    fn default() -> Self {
        DiceSpec::NONE
    }
}

impl FromStr for DiceSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(captures) = FLAT_DICE_REGEX.captures(s) {
            let count: u32 = captures[1].parse()?;
            if count != 0 {
                anyhow::bail!("dice spec {s:?} is missing its die size");
            }
            return Ok(DiceSpec::NONE);
        }
        let Some(captures) = DICE_SPEC_REGEX.captures(s) else {
            anyhow::bail!("malformed dice spec {s:?}");
        };
        let count: u32 = match &captures[1] {
            "" => 1,
            count => count.parse()?,
        };
        let sides: u32 = captures[2].parse()?;
        if sides == 0 {
            anyhow::bail!("dice spec {s:?} has zero-sided dice");
        }
        Ok(DiceSpec { count, sides })
    }
}

impl TryFrom<String> for DiceSpec {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
