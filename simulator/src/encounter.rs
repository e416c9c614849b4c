use std::sync::Arc;

use indexmap::IndexMap;
use rand::{rngs::StdRng, seq::{IndexedRandom, SliceRandom}};
use serde::Deserialize;

use crate::{HP_LOG_LENGTH, Monster, MonsterSpawn, MonsterTemplate};

fn default_count() -> u32 {
    1
}

/// A reference to a monster template from inside a wave.
#[derive(Clone, Debug, Deserialize)]
pub struct WaveEntry {
    pub monster: String,
    #[serde(default)]
    pub elite: bool,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub level: Option<u8>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WaveTemplate {
    #[serde(default)]
    pub name: Option<String>,
    pub monsters: Vec<WaveEntry>,
}

/// How the waves of a gauntlet are picked from the scenario's wave list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WaveSelection {
    /// Every wave, in file order.
    #[default]
    Fixed,
    /// A shuffled sample of common and elite waves.
    Sampled { common: usize, elite: usize },
}

/// A wave with its monster references resolved against the monster library.
#[derive(Clone, Debug)]
pub struct WavePlan {
    pub name: String,
    pub elite: bool,
    pub spawns: Vec<MonsterSpawn>,
}

impl WavePlan {
    pub fn spawn(&self) -> Vec<Monster> {
        self.spawns
            .iter()
            .enumerate()
            .map(|(index, spawn)| spawn.spawn(index))
            .collect()
    }
}

/// All monsters and waves a gauntlet can be assembled from.
#[derive(Clone, Debug)]
pub struct EncounterBook {
    pub waves: Vec<WavePlan>,
    pub selection: WaveSelection,
}

impl EncounterBook {
    pub fn new(
        monsters: Vec<MonsterTemplate>,
        waves: Vec<WaveTemplate>,
        selection: WaveSelection,
    ) -> anyhow::Result<Self> {
        let mut library: IndexMap<(String, bool), Arc<MonsterTemplate>> = IndexMap::new();
        for monster in monsters {
            monster.validate()?;
            let key = (monster.name.clone(), monster.elite);
            if library.contains_key(&key) {
                anyhow::bail!("monster {} (elite: {}) defined twice", key.0, key.1);
            }
            library.insert(key, Arc::new(monster));
        }

        let mut plans = Vec::with_capacity(waves.len());
        for (position, wave) in waves.into_iter().enumerate() {
            if wave.monsters.is_empty() {
                anyhow::bail!("wave {} has no monsters", position + 1);
            }
            let mut spawns = Vec::new();
            for entry in &wave.monsters {
                let template = library
                    .get(&(entry.monster.clone(), entry.elite))
                    .ok_or(anyhow::anyhow!(
                        "wave {} references unknown monster {:?} (elite: {})",
                        position + 1,
                        entry.monster,
                        entry.elite
                    ))?;
                if entry.count == 0 {
                    anyhow::bail!("wave {} spawns zero {}", position + 1, entry.monster);
                }
                for _ in 0..entry.count {
                    spawns.push(MonsterSpawn::new(template.clone(), entry.level)?);
                }
            }
            plans.push(WavePlan {
                name: wave
                    .name
                    .unwrap_or_else(|| format!("Wave {}", position + 1)),
                elite: wave.monsters.iter().any(|entry| entry.elite),
                spawns,
            });
        }

        let book = Self {
            waves: plans,
            selection,
        };
        book.validate()?;
        Ok(book)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let length = match &self.selection {
            WaveSelection::Fixed => self.waves.len(),
            WaveSelection::Sampled { common, elite } => {
                let (elite_pool, common_pool): (Vec<_>, Vec<_>) =
                    self.waves.iter().partition(|wave| wave.elite);
                if *common > common_pool.len() {
                    anyhow::bail!(
                        "cannot sample {common} common waves from {}",
                        common_pool.len()
                    );
                }
                if *elite > elite_pool.len() {
                    anyhow::bail!("cannot sample {elite} elite waves from {}", elite_pool.len());
                }
                common + elite
            }
        };
        if length == 0 {
            anyhow::bail!("a gauntlet needs at least one wave");
        }
        if length > HP_LOG_LENGTH {
            anyhow::bail!("a gauntlet holds at most {HP_LOG_LENGTH} waves, got {length}");
        }
        Ok(())
    }

    /// The waves of one gauntlet, in the order they are fought.
    pub fn select(&self, rng: &mut StdRng) -> Vec<&WavePlan> {
        match &self.selection {
            WaveSelection::Fixed => self.waves.iter().collect(),
            WaveSelection::Sampled { common, elite } => {
                let (elite_pool, common_pool): (Vec<&WavePlan>, Vec<&WavePlan>) =
                    self.waves.iter().partition(|wave| wave.elite);
                let mut selected: Vec<&WavePlan> = common_pool
                    .choose_multiple(rng, *common)
                    .copied()
                    .collect();
                selected.extend(elite_pool.choose_multiple(rng, *elite).copied());
                selected.shuffle(rng);
                selected
            }
        }
    }
}
