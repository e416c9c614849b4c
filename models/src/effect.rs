use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// When the tag of an [`EffectKind`] takes effect during a card resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EffectTiming {
    /// Fires once when the card is played, regardless of persistence scope.
    Immediate,
    /// Shapes the dice roll of an attack.
    Roll,
    /// Applied after an attack resolves against its target.
    PostHit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "snake_case")]
pub enum EffectKind {
    Armor,
    Heal,
    Fate,
    Draw,
    Sacrifice,
    Reroll,
    ExtraDice,
    FlatDamage,
    RollModifier,
    Pierce,
    Sweep,
    Lifesteal,
    Splash,
    Shatter,
    ArmorPerAttack,
    Bleed,
}

impl EffectKind {
    pub fn timing(&self) -> EffectTiming {
        match self {
            EffectKind::Armor
            | EffectKind::Heal
            | EffectKind::Fate
            | EffectKind::Draw
            | EffectKind::Sacrifice => EffectTiming::Immediate,
            EffectKind::Reroll
            | EffectKind::ExtraDice
            | EffectKind::FlatDamage
            | EffectKind::RollModifier
            | EffectKind::Pierce
            | EffectKind::Sweep => EffectTiming::Roll,
            EffectKind::Lifesteal
            | EffectKind::Splash
            | EffectKind::Shatter
            | EffectKind::ArmorPerAttack
            | EffectKind::Bleed => EffectTiming::PostHit,
        }
    }

    /// Whether the tag can live in a persistent-effect registry.
    pub fn is_persistable(&self) -> bool {
        self.timing() != EffectTiming::Immediate
    }
}

impl TryFrom<&str> for EffectKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "armor" => Ok(EffectKind::Armor),
            "heal" => Ok(EffectKind::Heal),
            "fate" => Ok(EffectKind::Fate),
            "draw" => Ok(EffectKind::Draw),
            "sacrifice" => Ok(EffectKind::Sacrifice),
            "reroll" => Ok(EffectKind::Reroll),
            "extra_dice" | "sky" => Ok(EffectKind::ExtraDice),
            "flat_damage" | "damage" => Ok(EffectKind::FlatDamage),
            "roll_modifier" => Ok(EffectKind::RollModifier),
            "pierce" | "def_mod" => Ok(EffectKind::Pierce),
            "sweep" => Ok(EffectKind::Sweep),
            "lifesteal" => Ok(EffectKind::Lifesteal),
            "splash" => Ok(EffectKind::Splash),
            "shatter" => Ok(EffectKind::Shatter),
            "armor_per_attack" => Ok(EffectKind::ArmorPerAttack),
            "bleed" => Ok(EffectKind::Bleed),
            kind => anyhow::bail!("invalid effect kind {kind}"),
        }
    }
}

impl TryFrom<String> for EffectKind {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EffectKind::try_from(value.as_str())
    }
}

fn default_magnitude() -> u32 {
    1
}

/// A named effect tag with its magnitude, as it appears on a card.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffect {
    pub kind: EffectKind,
    #[serde(default = "default_magnitude")]
    pub magnitude: u32,
}

impl CardEffect {
    pub fn new(kind: EffectKind, magnitude: u32) -> Self {
        Self { kind, magnitude }
    }
}
