use std::{path::Path, sync::Arc};

use serde::Deserialize;

use crate::{
    EncounterBook, HeroProfile, HeroTemplate, MonsterTemplate, RulesConfig, SimulationRequest,
    WaveSelection, WaveTemplate,
};

#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioTemplate {
    #[serde(default)]
    pub heroes: Vec<HeroTemplate>,
    #[serde(default)]
    pub monsters: Vec<MonsterTemplate>,
    #[serde(default)]
    pub waves: Vec<WaveTemplate>,
    #[serde(default)]
    pub selection: WaveSelection,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub request: Option<SimulationRequest>,
    #[serde(skip, default)]
    pub source: Option<String>,
}

/// Heroes, encounters and rules, validated and ready to simulate.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub heroes: Vec<Arc<HeroProfile>>,
    pub book: EncounterBook,
    pub rules: RulesConfig,
    pub request: Option<SimulationRequest>,
    pub source: Option<String>,
}

impl TryFrom<ScenarioTemplate> for Scenario {
    type Error = anyhow::Error;

    fn try_from(template: ScenarioTemplate) -> Result<Self, Self::Error> {
        if template.heroes.is_empty() {
            anyhow::bail!("scenario has no heroes");
        }
        template.rules.validate()?;

        let mut heroes = Vec::with_capacity(template.heroes.len());
        for hero in template.heroes {
            let name = hero.name.clone();
            if heroes.iter().any(|h: &Arc<HeroProfile>| h.name == name) {
                anyhow::bail!("hero {name} defined twice");
            }
            let profile: HeroProfile = hero
                .try_into()
                .map_err(|error| anyhow::anyhow!("unable to load hero {name:?}: {error}"))?;
            heroes.push(Arc::new(profile));
        }

        let book = EncounterBook::new(template.monsters, template.waves, template.selection)?;

        Ok(Self {
            heroes,
            book,
            rules: template.rules,
            request: template.request,
            source: template.source,
        })
    }
}

impl Scenario {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let template = toml::from_str::<ScenarioTemplate>(contents)?;
        template.try_into()
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|error| anyhow::anyhow!("unable to read {}: {error}", path.display()))?;
        let mut template = toml::from_str::<ScenarioTemplate>(&contents)
            .map_err(|error| anyhow::anyhow!("unable to parse {}: {error}", path.display()))?;
        template.source = Some(path.display().to_string());
        template.try_into()
    }

    pub fn hero(&self, name: &str) -> Option<&Arc<HeroProfile>> {
        self.heroes.iter().find(|hero| hero.name == name)
    }
}
