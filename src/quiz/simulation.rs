//! Simulated adaptive sessions against an item bank.
//!
//! Each run draws responses from the 3PL model at a known true ability with
//! its own seeded RNG, so a batch is reproducible for a fixed seed no matter
//! how rayon schedules it.

use std::path::Path;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::quiz::decision::StopDecision;
use crate::quiz::engine::QuizEngine;
use crate::quiz::error::{QuizError, QuizResult};
use crate::quiz::modeling::response_probability;
use crate::quiz::types::{CandidateItem, ItemParameters};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub true_theta: f64,
    pub estimated_theta: f64,
    pub confidence: f64,
    pub questions_answered: u32,
    pub correct_count: u32,
    pub stop_reason: StopDecision,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub runs: usize,
    pub mean_bias: f64,
    pub rmse: f64,
    pub mean_test_length: f64,
    pub mean_confidence: f64,
}

pub fn simulate_session<R: Rng>(
    engine: &QuizEngine,
    items: &[CandidateItem],
    true_theta: f64,
    rng: &mut R,
) -> QuizResult<SimulationOutcome> {
    let start = engine.start_session(items.to_vec())?;
    let mut session = start.session;
    let mut next = start.first_item;

    while let Some(item) = next {
        let p = response_probability(true_theta, &item.params)?;
        let correct = rng.gen::<f64>() < p;
        let response_time = item.estimated_time_seconds * (0.5 + rng.gen::<f64>());
        let outcome = engine.submit_response(&mut session, &item.id, correct, Some(response_time))?;
        if outcome.should_stop {
            break;
        }
        next = outcome.next_item;
    }

    let stop_reason = session.status;
    let result = engine.finalize(&mut session)?;
    Ok(SimulationOutcome {
        true_theta,
        estimated_theta: result.theta,
        confidence: session.ability.confidence,
        questions_answered: result.questions_answered,
        correct_count: result.correct_count,
        stop_reason,
        score: result.score,
    })
}

/// Runs `replications` sessions per true theta in parallel.
pub fn simulate_batch(
    engine: &QuizEngine,
    items: &[CandidateItem],
    true_thetas: &[f64],
    replications: usize,
    seed: u64,
) -> QuizResult<Vec<SimulationOutcome>> {
    let tasks: Vec<(usize, usize)> = (0..true_thetas.len())
        .flat_map(|t| (0..replications).map(move |r| (t, r)))
        .collect();

    tasks
        .par_iter()
        .map(|&(theta_idx, rep)| {
            let task_seed = seed
                .wrapping_add(theta_idx as u64 * 1000)
                .wrapping_add(rep as u64);
            let mut rng = ChaCha8Rng::seed_from_u64(task_seed);
            simulate_session(engine, items, true_thetas[theta_idx], &mut rng)
        })
        .collect()
}

pub fn summarize(outcomes: &[SimulationOutcome]) -> SimulationSummary {
    let runs = outcomes.len();
    if runs == 0 {
        return SimulationSummary {
            runs,
            mean_bias: 0.0,
            rmse: 0.0,
            mean_test_length: 0.0,
            mean_confidence: 0.0,
        };
    }
    let n = runs as f64;
    let mean_bias = outcomes
        .iter()
        .map(|o| o.estimated_theta - o.true_theta)
        .sum::<f64>()
        / n;
    let mse = outcomes
        .iter()
        .map(|o| (o.estimated_theta - o.true_theta).powi(2))
        .sum::<f64>()
        / n;
    SimulationSummary {
        runs,
        mean_bias,
        rmse: mse.sqrt(),
        mean_test_length: outcomes.iter().map(|o| o.questions_answered as f64).sum::<f64>() / n,
        mean_confidence: outcomes.iter().map(|o| o.confidence).sum::<f64>() / n,
    }
}

/// JSON array of candidate items; every item is validated.
pub fn load_item_bank(path: &Path) -> QuizResult<Vec<CandidateItem>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| QuizError::ItemBank(format!("{}: {e}", path.display())))?;
    let items: Vec<CandidateItem> = serde_json::from_str(&raw)
        .map_err(|e| QuizError::ItemBank(format!("{}: {e}", path.display())))?;
    for item in &items {
        item.params.validate()?;
    }
    Ok(items)
}

/// Evenly spread difficulties over `[-3, 3]` with cycling discrimination.
pub fn synthetic_item_bank(size: usize) -> Vec<CandidateItem> {
    const DISCRIMINATIONS: [f64; 4] = [0.8, 1.0, 1.3, 1.7];
    (0..size)
        .map(|i| {
            let difficulty = if size > 1 {
                -3.0 + 6.0 * i as f64 / (size - 1) as f64
            } else {
                0.0
            };
            CandidateItem::new(
                format!("item-{i:04}"),
                ItemParameters {
                    difficulty,
                    discrimination: DISCRIMINATIONS[i % DISCRIMINATIONS.len()],
                    guessing: 0.2,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::config::QuizConfig;
    use std::io::Write;

    #[test]
    fn test_batch_is_reproducible() {
        let engine = QuizEngine::new(QuizConfig::default()).unwrap();
        let bank = synthetic_item_bank(60);
        let a = simulate_batch(&engine, &bank, &[-1.0, 0.0, 1.5], 3, 42).unwrap();
        let b = simulate_batch(&engine, &bank, &[-1.0, 0.0, 1.5], 3, 42).unwrap();
        assert_eq!(a.len(), 9);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.estimated_theta.to_bits(), y.estimated_theta.to_bits());
            assert_eq!(x.questions_answered, y.questions_answered);
        }
    }

    #[test]
    fn test_sessions_respect_length_bounds() {
        let engine = QuizEngine::new(QuizConfig::default()).unwrap();
        let bank = synthetic_item_bank(60);
        let outcomes = simulate_batch(&engine, &bank, &[-2.0, 0.0, 2.0], 4, 7).unwrap();
        for outcome in &outcomes {
            assert!(outcome.questions_answered >= 5 && outcome.questions_answered <= 20);
            assert!(outcome.estimated_theta >= -4.0 && outcome.estimated_theta <= 4.0);
            assert!(outcome.stop_reason != StopDecision::Continue);
        }
    }

    #[test]
    fn test_summary_of_empty_batch() {
        let summary = summarize(&[]);
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.rmse, 0.0);
    }

    #[test]
    fn test_summary_values() {
        let outcome = |true_theta: f64, estimated_theta: f64| SimulationOutcome {
            true_theta,
            estimated_theta,
            confidence: 0.5,
            questions_answered: 10,
            correct_count: 5,
            stop_reason: StopDecision::ConfidenceReached,
            score: 50,
        };
        let summary = summarize(&[outcome(0.0, 1.0), outcome(0.0, -1.0)]);
        assert_eq!(summary.mean_bias, 0.0);
        assert!((summary.rmse - 1.0).abs() < 1e-12);
        assert!((summary.mean_test_length - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_synthetic_bank_is_valid() {
        let bank = synthetic_item_bank(25);
        assert_eq!(bank.len(), 25);
        assert!(bank.iter().all(|i| i.params.validate().is_ok()));
        assert!((bank[0].params.difficulty + 3.0).abs() < 1e-12);
        assert!((bank[24].params.difficulty - 3.0).abs() < 1e-12);
        assert_eq!(synthetic_item_bank(1)[0].params.difficulty, 0.0);
    }

    #[test]
    fn test_load_item_bank() {
        let bank = synthetic_item_bank(5);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&bank).unwrap().as_bytes())
            .unwrap();
        let loaded = load_item_bank(file.path()).unwrap();
        assert_eq!(loaded, bank);
    }

    #[test]
    fn test_load_item_bank_rejects_bad_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            load_item_bank(file.path()),
            Err(QuizError::ItemBank(_))
        ));

        let mut bank = synthetic_item_bank(2);
        bank[1].params.guessing = 1.0;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&bank).unwrap().as_bytes())
            .unwrap();
        assert!(matches!(
            load_item_bank(file.path()),
            Err(QuizError::InvalidParameter { .. })
        ));

        assert!(load_item_bank(Path::new("/nonexistent/bank.json")).is_err());
    }
}
