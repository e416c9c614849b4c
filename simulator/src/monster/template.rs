use std::sync::Arc;

use models::{AbilitySpec, Element, LevelModifier};
use serde::Deserialize;

use crate::{ACTION_BANDS, MAX_MONSTER_DEFENSE};

use super::Monster;

fn default_level() -> u8 {
    1
}

#[derive(Clone, Debug, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    #[serde(default)]
    pub elite: bool,
    pub hp: u64,
    pub defense: u32,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub vulnerability: Option<Element>,
    #[serde(default)]
    pub resistance: Option<Element>,
    /// Damage for the d8 bands 1-2, 3-4, 5-6 and 7-8.
    pub bands: [u32; ACTION_BANDS],
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub ability: Option<AbilitySpec>,
}

impl MonsterTemplate {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("monster template without a name");
        }
        if self.hp == 0 || self.hp > i64::MAX as u64 {
            anyhow::bail!("monster {} has invalid hp {}", self.name, self.hp);
        }
        if self.defense == 0 {
            anyhow::bail!("monster {} needs a defense of at least 1", self.name);
        }
        if self.vulnerability.is_some() && self.vulnerability == self.resistance {
            anyhow::bail!(
                "monster {} cannot be vulnerable and resistant to the same element",
                self.name
            );
        }
        LevelModifier::for_level(self.level)
            .map_err(|error| anyhow::anyhow!("monster {}: {error}", self.name))?;
        Ok(())
    }
}

/// One monster slot of a wave, with its level already resolved.
#[derive(Clone, Debug)]
pub struct MonsterSpawn {
    pub template: Arc<MonsterTemplate>,
    pub level: u8,
    pub modifier: LevelModifier,
}

impl MonsterSpawn {
    pub fn new(template: Arc<MonsterTemplate>, level: Option<u8>) -> anyhow::Result<Self> {
        let level = level.unwrap_or(template.level);
        let modifier = LevelModifier::for_level(level)
            .map_err(|error| anyhow::anyhow!("monster {}: {error}", template.name))?;
        Ok(Self {
            template,
            level,
            modifier,
        })
    }

    pub fn spawn(&self, index: usize) -> Monster {
        let template = &self.template;
        let bands = template.bands.map(|damage| {
            if damage > 0 {
                damage + self.modifier.damage
            } else {
                0
            }
        });
        Monster::new(
            index,
            template.name.clone(),
            template.elite,
            template.hp + self.modifier.hp as u64,
            (template.defense + self.modifier.defense).min(*MAX_MONSTER_DEFENSE),
            bands,
        )
        .with_level(self.level)
        .with_affinity(template.element, template.vulnerability, template.resistance)
        .with_ability(template.ability)
    }
}
