use indexmap::IndexMap;
use serde::Serialize;

use crate::{GauntletRecord, HP_LOG_LENGTH};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub win: u64,
    pub loss: u64,
}

impl WinLoss {
    pub fn record(&mut self, won: bool) {
        if won {
            self.win += 1;
        } else {
            self.loss += 1;
        }
    }

    fn merge(&mut self, other: &WinLoss) {
        self.win += other.win;
        self.loss += other.loss;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncounterTally {
    pub common: WinLoss,
    pub elite: WinLoss,
}

impl EncounterTally {
    pub fn get(&self, elite: bool) -> &WinLoss {
        if elite { &self.elite } else { &self.common }
    }

    fn get_mut(&mut self, elite: bool) -> &mut WinLoss {
        if elite {
            &mut self.elite
        } else {
            &mut self.common
        }
    }
}

/// Integer hit-point sums, so that merging partial reports is order independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HpTotals {
    max_hp: u64,
    runs: u64,
    per_wave: [u64; HP_LOG_LENGTH],
}

impl HpTotals {
    fn retention(&self) -> [f64; HP_LOG_LENGTH] {
        let mut retention = [0.0; HP_LOG_LENGTH];
        if self.runs == 0 || self.max_hp == 0 {
            return retention;
        }
        let denominator = (self.runs * self.max_hp) as f64;
        for (slot, hp) in retention.iter_mut().zip(self.per_wave) {
            *slot = hp as f64 * 100.0 / denominator;
        }
        retention
    }
}

/// Statistics folded over many gauntlets, keyed by hero name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    pub wins_by_actor: IndexMap<String, u64>,
    pub runs_by_actor: IndexMap<String, u64>,
    /// Average hit points left after each wave, in percent of max hp.
    pub hp_retention_by_actor: IndexMap<String, [f64; HP_LOG_LENGTH]>,
    /// hero → rarity → card → outcome of the gauntlets the card finished in.
    pub card_correlation: IndexMap<String, IndexMap<String, IndexMap<String, WinLoss>>>,
    /// hero → monster → common/elite → outcome of the gauntlets it was met in.
    pub enemy_correlation: IndexMap<String, IndexMap<String, EncounterTally>>,
    /// hero → monster → hit points the hero lost to it.
    pub damage_by_pair: IndexMap<String, IndexMap<String, u64>>,
    #[serde(skip)]
    hp_totals: IndexMap<String, HpTotals>,
}

impl AggregateReport {
    pub fn record(&mut self, record: &GauntletRecord) {
        let hero = &record.hero;
        *self.runs_by_actor.entry(hero.clone()).or_default() += 1;
        let wins = self.wins_by_actor.entry(hero.clone()).or_default();
        if record.won {
            *wins += 1;
        }

        let totals = self.hp_totals.entry(hero.clone()).or_default();
        totals.max_hp = record.max_hp;
        totals.runs += 1;
        for (slot, percent) in totals.per_wave.iter_mut().zip(record.hp_log) {
            *slot += (percent * record.max_hp as f64 / 100.0).round() as u64;
        }
        self.hp_retention_by_actor
            .insert(hero.clone(), totals.retention());

        let cards = self.card_correlation.entry(hero.clone()).or_default();
        for (rarity, card) in &record.deck {
            cards
                .entry(rarity.to_string())
                .or_default()
                .entry(card.clone())
                .or_default()
                .record(record.won);
        }

        let enemies = self.enemy_correlation.entry(hero.clone()).or_default();
        for encounter in &record.encounters {
            enemies
                .entry(encounter.monster.clone())
                .or_default()
                .get_mut(encounter.elite)
                .record(record.won);
        }

        let damage = self.damage_by_pair.entry(hero.clone()).or_default();
        for (monster, amount) in &record.damage_taken {
            *damage.entry(monster.clone()).or_default() += amount;
        }
    }

    /// Folds another partial report into this one.
    pub fn merge(mut self, other: AggregateReport) -> Self {
        for (hero, runs) in other.runs_by_actor {
            *self.runs_by_actor.entry(hero).or_default() += runs;
        }
        for (hero, wins) in other.wins_by_actor {
            *self.wins_by_actor.entry(hero).or_default() += wins;
        }
        for (hero, theirs) in other.hp_totals {
            let ours = self.hp_totals.entry(hero.clone()).or_default();
            ours.max_hp = ours.max_hp.max(theirs.max_hp);
            ours.runs += theirs.runs;
            for (slot, hp) in ours.per_wave.iter_mut().zip(theirs.per_wave) {
                *slot += hp;
            }
            self.hp_retention_by_actor.insert(hero, ours.retention());
        }
        for (hero, rarities) in other.card_correlation {
            let ours = self.card_correlation.entry(hero).or_default();
            for (rarity, cards) in rarities {
                let ours = ours.entry(rarity).or_default();
                for (card, tally) in cards {
                    ours.entry(card).or_default().merge(&tally);
                }
            }
        }
        for (hero, monsters) in other.enemy_correlation {
            let ours = self.enemy_correlation.entry(hero).or_default();
            for (monster, tally) in monsters {
                let ours = ours.entry(monster).or_default();
                ours.common.merge(&tally.common);
                ours.elite.merge(&tally.elite);
            }
        }
        for (hero, monsters) in other.damage_by_pair {
            let ours = self.damage_by_pair.entry(hero).or_default();
            for (monster, amount) in monsters {
                *ours.entry(monster).or_default() += amount;
            }
        }
        self
    }

    pub fn runs(&self, hero: &str) -> u64 {
        self.runs_by_actor.get(hero).copied().unwrap_or_default()
    }

    pub fn wins(&self, hero: &str) -> u64 {
        self.wins_by_actor.get(hero).copied().unwrap_or_default()
    }

    pub fn win_rate(&self, hero: &str) -> Option<f64> {
        let runs = self.runs(hero);
        (runs > 0).then(|| self.wins(hero) as f64 / runs as f64)
    }

    pub fn damage_between(&self, hero: &str, monster: &str) -> u64 {
        self.damage_by_pair
            .get(hero)
            .and_then(|monsters| monsters.get(monster))
            .copied()
            .unwrap_or_default()
    }
}

impl From<&Vec<GauntletRecord>> for AggregateReport {
    fn from(records: &Vec<GauntletRecord>) -> Self {
        let mut report = AggregateReport::default();
        for record in records {
            report.record(record);
        }
        report
    }
}
