use std::sync::Arc;

use models::Rarity;
use serde::Deserialize;

use crate::{CardTemplate, DEFAULT_FATE_MAX};

/// How a hero picks which monster to attack.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    #[default]
    LowestHp,
    HighestThreat,
}

fn default_fate_max() -> u32 {
    *DEFAULT_FATE_MAX
}

#[derive(Clone, Debug, Deserialize)]
pub struct HeroTemplate {
    pub name: String,
    pub max_hp: u64,
    #[serde(default = "default_fate_max")]
    pub fate_max: u32,
    #[serde(default)]
    pub starting_fate: u32,
    #[serde(default)]
    pub plate: u32,
    #[serde(default)]
    pub targeting: TargetPolicy,
    #[serde(default, rename = "cards")]
    pub card_templates: Vec<CardTemplate>,
    #[serde(default, rename = "upgrades")]
    pub upgrade_templates: Vec<CardTemplate>,
}

/// A validated hero template, ready to create fresh heroes for every gauntlet.
#[derive(Clone, Debug)]
pub struct HeroProfile {
    pub name: String,
    pub max_hp: u64,
    pub fate_max: u32,
    pub starting_fate: u32,
    pub plate: u32,
    pub targeting: TargetPolicy,
    pub starting_deck: Vec<Arc<CardTemplate>>,
    pub upgrade_pool: Vec<Arc<CardTemplate>>,
}

impl TryFrom<HeroTemplate> for HeroProfile {
    type Error = anyhow::Error;

    fn try_from(template: HeroTemplate) -> Result<Self, Self::Error> {
        if template.name.trim().is_empty() {
            anyhow::bail!("hero template without a name");
        }
        if template.max_hp == 0 || template.max_hp > i64::MAX as u64 {
            anyhow::bail!("hero {} has invalid max hp {}", template.name, template.max_hp);
        }
        if template.card_templates.is_empty() {
            anyhow::bail!("hero {} has an empty starting deck", template.name);
        }

        let mut starting_deck = Vec::new();
        for card in template.card_templates {
            card.validate().map_err(|error| {
                anyhow::anyhow!("unable to load card for hero {}: {error}", template.name)
            })?;
            let copies = card.copies;
            let card = Arc::new(card);
            for _ in 0..copies {
                starting_deck.push(card.clone());
            }
        }

        let mut upgrade_pool = Vec::new();
        for card in template.upgrade_templates {
            card.validate().map_err(|error| {
                anyhow::anyhow!("unable to load upgrade for hero {}: {error}", template.name)
            })?;
            if card.rarity == Rarity::Base {
                anyhow::bail!(
                    "upgrade {} of hero {} needs a rarity other than base",
                    card.name,
                    template.name
                );
            }
            let copies = card.copies;
            let card = Arc::new(card);
            for _ in 0..copies {
                upgrade_pool.push(card.clone());
            }
        }

        #[cfg(feature = "trace")]
        tracing::info!(
            name = %template.name,
            cards = starting_deck.len(),
            upgrades = upgrade_pool.len(),
            "Register hero"
        );

        Ok(Self {
            name: template.name,
            max_hp: template.max_hp,
            fate_max: template.fate_max,
            starting_fate: template.starting_fate,
            plate: template.plate,
            targeting: template.targeting,
            starting_deck,
            upgrade_pool,
        })
    }
}
