use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "snake_case")]
pub enum CardCategory {
    Melee,
    Ranged,
    Utility,
}

impl TryFrom<&str> for CardCategory {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "melee" => Ok(CardCategory::Melee),
            "ranged" => Ok(CardCategory::Ranged),
            "utility" | "util" => Ok(CardCategory::Utility),
            category => anyhow::bail!("invalid card category {category}"),
        }
    }
}

impl TryFrom<String> for CardCategory {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CardCategory::try_from(value.as_str())
    }
}

/// Rarity of a card. `Base` marks the starting deck, the others make up upgrade pools.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Base,
    Common,
    Uncommon,
    Rare,
}

impl TryFrom<&str> for Rarity {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "base" | "starting" => Ok(Rarity::Base),
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            rarity => anyhow::bail!("invalid rarity {rarity}"),
        }
    }
}

impl TryFrom<String> for Rarity {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rarity::try_from(value.as_str())
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rarity::Base => "base",
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
        };
        write!(f, "{name}")
    }
}

/// How long the modifiers of a played card outlive its own resolution.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "snake_case")]
pub enum PersistenceScope {
    #[default]
    None,
    Exchange,
    Combat,
}

impl TryFrom<&str> for PersistenceScope {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "" | "none" | "once" => Ok(PersistenceScope::None),
            "exchange" => Ok(PersistenceScope::Exchange),
            "combat" | "wave" => Ok(PersistenceScope::Combat),
            scope => anyhow::bail!("invalid persistence scope {scope}"),
        }
    }
}

impl TryFrom<String> for PersistenceScope {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PersistenceScope::try_from(value.as_str())
    }
}
