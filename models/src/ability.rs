use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// Points in an exchange where a monster ability can be invoked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AbilityTrigger {
    StartOfWave,
    StartOfExchange,
    OnDamageDealt,
    OnDeath,
    OnMiss,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "snake_case")]
pub enum AbilityKind {
    Enrage,
    ArmorBreaker,
    Venom,
    FateDrain,
    Web,
    PowerSap,
    Terror,
    Toughened,
    Carapace,
    RootsOfDespair,
    Domino,
}

impl TryFrom<&str> for AbilityKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "enrage" => Ok(AbilityKind::Enrage),
            "armor_breaker" => Ok(AbilityKind::ArmorBreaker),
            "venom" => Ok(AbilityKind::Venom),
            "fate_drain" => Ok(AbilityKind::FateDrain),
            "web" => Ok(AbilityKind::Web),
            "power_sap" => Ok(AbilityKind::PowerSap),
            "terror" => Ok(AbilityKind::Terror),
            "toughened" => Ok(AbilityKind::Toughened),
            "carapace" => Ok(AbilityKind::Carapace),
            "roots_of_despair" => Ok(AbilityKind::RootsOfDespair),
            "domino" | "domino_death" => Ok(AbilityKind::Domino),
            kind => anyhow::bail!("unknown monster ability {kind}"),
        }
    }
}

impl TryFrom<String> for AbilityKind {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AbilityKind::try_from(value.as_str())
    }
}

fn default_magnitude() -> u32 {
    1
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub kind: AbilityKind,
    #[serde(default = "default_magnitude")]
    pub magnitude: u32,
}
