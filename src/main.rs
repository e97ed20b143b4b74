use std::process::ExitCode;

use danci_quiz_engine::config::Config;
use danci_quiz_engine::logging::init_tracing;
use danci_quiz_engine::quiz::simulation::{
    load_item_bank, simulate_batch, summarize, synthetic_item_bank, SimulationOutcome,
};
use danci_quiz_engine::quiz::{QuizConfig, QuizEngine, QuizResult};

const TRUE_THETAS: [f64; 7] = [-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0];

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "quiz simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> QuizResult<()> {
    let engine = QuizEngine::new(QuizConfig::from_env())?;

    let items = match config.item_bank {
        Some(ref path) => load_item_bank(path)?,
        None => synthetic_item_bank(config.synthetic_bank_size),
    };
    tracing::info!(
        items = items.len(),
        source = if config.item_bank.is_some() { "file" } else { "synthetic" },
        replications = config.sim_replications,
        seed = config.sim_seed,
        "running adaptive quiz simulation"
    );

    let outcomes = simulate_batch(
        &engine,
        &items,
        &TRUE_THETAS,
        config.sim_replications,
        config.sim_seed,
    )?;

    let per_theta: Vec<serde_json::Value> = TRUE_THETAS
        .iter()
        .map(|&theta| {
            let runs: Vec<SimulationOutcome> = outcomes
                .iter()
                .filter(|o| o.true_theta == theta)
                .cloned()
                .collect();
            serde_json::json!({
                "trueTheta": theta,
                "summary": summarize(&runs),
            })
        })
        .collect();

    let report = serde_json::json!({
        "overall": summarize(&outcomes),
        "byTheta": per_theta,
    });
    println!("{report:#}");

    tracing::info!(runs = outcomes.len(), "simulation complete");
    Ok(())
}
