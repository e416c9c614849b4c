use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// Elemental affinity of an attack or a monster.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "snake_case")]
pub enum Element {
    #[default]
    None,
    Brutal,
    Precise,
    Divine,
    Arcane,
    Shadow,
}

impl Element {
    /// An attack without an element never matches a vulnerability or resistance.
    pub fn matches(&self, other: Option<Element>) -> bool {
        match (self, other) {
            (Element::None, _) | (_, None) => false,
            (element, Some(other)) => *element == other,
        }
    }
}

impl TryFrom<&str> for Element {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "" | "none" => Ok(Element::None),
            "brutal" => Ok(Element::Brutal),
            "precise" => Ok(Element::Precise),
            "divine" => Ok(Element::Divine),
            "arcane" => Ok(Element::Arcane),
            "shadow" => Ok(Element::Shadow),
            element => anyhow::bail!("invalid element {element}"),
        }
    }
}

impl TryFrom<String> for Element {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Element::try_from(value.as_str())
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Element::None => "none",
            Element::Brutal => "brutal",
            Element::Precise => "precise",
            Element::Divine => "divine",
            Element::Arcane => "arcane",
            Element::Shadow => "shadow",
        };
        write!(f, "{name}")
    }
}
