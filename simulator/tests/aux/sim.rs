use std::{path::PathBuf, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};
use simulator::{
    CombatLog, Exchange, ExchangeReport, Gauntlet, GauntletRecord, Hero, Monster, RulesConfig,
    RunBounds, Scenario, ScenarioTemplate,
};

pub static SEED: u64 = 0x3a3f7af8085da7a2;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

pub fn read_scenario(path: &PathBuf) -> Result<ScenarioTemplate, Box<dyn std::error::Error>> {
    let scenario_str = std::fs::read_to_string(path)?;
    let template = toml::from_str::<ScenarioTemplate>(&scenario_str)?;
    Ok(template)
}

/// Runs one gauntlet per hero of the scenario with event logging on and no budgets.
pub fn run_scenario(
    name: String,
    scenario: &Scenario,
) -> Result<Vec<GauntletRecord>, Box<dyn std::error::Error>> {
    let name = name.replace('"', "");
    let book = Arc::new(scenario.book.clone());
    let rules = Arc::new(scenario.rules.clone());
    let mut records = Vec::new();
    for profile in &scenario.heroes {
        let gauntlet = Gauntlet::new(
            profile.clone(),
            book.clone(),
            rules.clone(),
            RunBounds::unbounded(),
        )
        .with_event_log();
        let record = tracing::info_span!("scenario", %name)
            .in_scope(|| gauntlet.run_once_with_rng(seeded_rng()))?;
        records.push(record);
    }
    Ok(records)
}

/// Resolves a single exchange and returns its report together with the event log.
pub fn run_exchange(
    number: u32,
    hero: &mut Hero,
    monsters: &mut [Monster],
    rules: &RulesConfig,
    rng: &mut StdRng,
) -> (ExchangeReport, CombatLog) {
    let mut log = CombatLog::enabled();
    let report = Exchange::new(number, hero, monsters, rules, rng, &mut log).resolve();
    (report, log)
}
