use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    AggregateReport, Gauntlet, GauntletRecord, Scenario, SimulationError, SimulationRequest,
};

/// Seed of one gauntlet attempt. Depends only on its coordinates, never on scheduling.
pub fn run_seed(base: u64, actor: usize, run: usize, attempt: u32) -> u64 {
    base ^ (actor as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (run as u64 + 1).wrapping_mul(0xbf58_476d_1ce4_e5b9)
        ^ (attempt as u64 + 1).wrapping_mul(0x94d0_49bb_1331_11eb)
}

/// Runs one gauntlet, retrying with a fresh hero whenever it times out.
pub fn run_with_retries(
    gauntlet: &Gauntlet,
    request: &SimulationRequest,
    actor: usize,
    run: usize,
) -> Result<GauntletRecord, SimulationError> {
    let mut attempts = 0u32;
    loop {
        let rng = StdRng::seed_from_u64(run_seed(request.seed, actor, run, attempts));
        attempts += 1;
        match gauntlet.run_once_with_rng(rng) {
            Ok(record) => return Ok(record),
            Err(error) if error.is_timeout() => {
                if attempts > request.max_retries {
                    tracing::error!(hero = %gauntlet.profile.name, run, attempts, %error, "Giving up");
                    return Err(SimulationError::RetriesExhausted {
                        hero: gauntlet.profile.name.clone(),
                        attempts,
                        source: Box::new(error),
                    });
                }
                tracing::warn!(hero = %gauntlet.profile.name, run, attempts, %error, "Retrying gauntlet");
            }
            Err(error) => return Err(error),
        }
    }
}

/// Runs `request.runs` gauntlets for every hero of the scenario and folds them into one
/// report. Gauntlets are spread over a dedicated worker pool.
#[tracing::instrument(skip_all, fields(heroes = scenario.heroes.len(), runs = request.runs))]
pub fn run_statistics(
    scenario: &Scenario,
    request: &SimulationRequest,
) -> Result<AggregateReport, SimulationError> {
    request.validate()?;
    let workers = request.worker_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    tracing::info!(workers, "Starting statistics run");

    let book = Arc::new(scenario.book.clone());
    let rules = Arc::new(scenario.rules.clone());
    let mut report = AggregateReport::default();
    for (actor, profile) in scenario.heroes.iter().enumerate() {
        let gauntlet = Gauntlet::new(
            profile.clone(),
            book.clone(),
            rules.clone(),
            request.bounds(),
        );
        let partial = pool.install(|| {
            (0..request.runs)
                .into_par_iter()
                .try_fold(
                    AggregateReport::default,
                    |mut partial, run| -> Result<AggregateReport, SimulationError> {
                        let record = run_with_retries(&gauntlet, request, actor, run)?;
                        partial.record(&record);
                        Ok(partial)
                    },
                )
                .try_reduce(AggregateReport::default, |a, b| Ok(a.merge(b)))
        })?;
        tracing::info!(
            hero = %profile.name,
            wins = partial.wins(&profile.name),
            runs = partial.runs(&profile.name),
            "Hero finished"
        );
        report = report.merge(partial);
    }
    Ok(report)
}
