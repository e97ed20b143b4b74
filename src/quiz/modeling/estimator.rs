//! Maximum-likelihood ability estimation.
//!
//! The estimate is recomputed from the full response list on every call.
//! A grid scan of the score function brackets each local maximum, Fisher
//! scoring with a bisection fallback refines it, and the candidate with the
//! highest log-likelihood is returned. When every response points the same
//! way the likelihood has no interior maximum and theta is pinned to the
//! configured bound.

use crate::quiz::config::EstimatorConfig;
use crate::quiz::error::QuizResult;
use crate::quiz::modeling::irt::{information_unchecked, probability_unchecked, score_unchecked};
use crate::quiz::types::{AbilityEstimate, ResponseRecord};

/// Spacing of the score-sign scan that brackets local maxima.
const GRID_STEP: f64 = 0.1;

/// Maps accumulated information to `[0, 1)`.
pub fn confidence_from_information(test_information: f64) -> f64 {
    if !(test_information > 0.0) {
        return 0.0;
    }
    1.0 - 1.0 / (1.0 + test_information).sqrt()
}

/// Stateless estimate with the default configuration.
pub fn estimate_ability(responses: &[ResponseRecord]) -> QuizResult<AbilityEstimate> {
    AbilityEstimator::default().estimate(responses)
}

pub struct AbilityEstimator {
    config: EstimatorConfig,
}

impl Default for AbilityEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl AbilityEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Stateless estimate. `history[k]` is the estimate over `responses[..=k]`.
    pub fn estimate(&self, responses: &[ResponseRecord]) -> QuizResult<AbilityEstimate> {
        validate_all(responses)?;
        if responses.is_empty() {
            return Ok(AbilityEstimate::prior());
        }

        let history: Vec<f64> = (1..=responses.len())
            .map(|n| self.solve(&responses[..n], 0.0))
            .collect();
        let theta = history[history.len() - 1];
        Ok(self.finish(responses, theta, history))
    }

    /// Continues a session trajectory: iteration starts at the mean of
    /// `previous.history` and the new theta is appended to it.
    ///
    /// An empty `responses` list has nothing to continue and resets to the
    /// prior, discarding `previous.history`.
    pub fn estimate_continuing(
        &self,
        responses: &[ResponseRecord],
        previous: &AbilityEstimate,
    ) -> QuizResult<AbilityEstimate> {
        validate_all(responses)?;
        if responses.is_empty() {
            return Ok(AbilityEstimate::prior());
        }

        let start = if previous.history.is_empty() {
            0.0
        } else {
            previous.history.iter().sum::<f64>() / previous.history.len() as f64
        };
        let theta = self.solve(responses, start);
        let mut history = previous.history.clone();
        history.push(theta);
        Ok(self.finish(responses, theta, history))
    }

    fn finish(
        &self,
        responses: &[ResponseRecord],
        theta: f64,
        history: Vec<f64>,
    ) -> AbilityEstimate {
        let test_information = test_information(responses, theta);
        AbilityEstimate {
            theta,
            confidence: confidence_from_information(test_information),
            test_information,
            history,
        }
    }

    /// Global maximum of the log-likelihood on `[theta_min, theta_max]`.
    ///
    /// Guessing makes the 3PL likelihood multi-modal, so every local maximum
    /// found on a coarse score-sign grid is refined and the best one wins.
    /// A bound is a candidate when the score points out of the range there;
    /// all-correct and all-incorrect patterns therefore land on a bound.
    fn solve(&self, responses: &[ResponseRecord], start: f64) -> f64 {
        let lo_bound = self.config.theta_min;
        let hi_bound = self.config.theta_max;

        let cells = ((hi_bound - lo_bound) / GRID_STEP).ceil().max(1.0) as usize;
        let grid: Vec<f64> = (0..=cells)
            .map(|i| lo_bound + (hi_bound - lo_bound) * i as f64 / cells as f64)
            .collect();
        let scores: Vec<f64> = grid.iter().map(|&t| total_score(responses, t)).collect();

        let mut best: Option<(f64, f64)> = None;
        let mut consider = |theta: f64| {
            let ll = log_likelihood(responses, theta);
            if best.map_or(true, |(_, best_ll)| ll > best_ll) {
                best = Some((theta, ll));
            }
        };

        if scores[0] < 0.0 {
            consider(lo_bound);
        }
        for i in 0..cells {
            if scores[i] >= 0.0 && scores[i + 1] < 0.0 {
                consider(self.refine(responses, grid[i], grid[i + 1], start));
            }
        }
        if scores[cells] >= 0.0 {
            consider(hi_bound);
        }

        best.map_or(0.0, |(theta, _)| theta)
    }

    /// Root of the score inside `[lo, hi]`, where the score changes sign from
    /// non-negative to negative. Fisher steps are taken only while they at
    /// least halve the bracket; otherwise the step is a bisection.
    fn refine(&self, responses: &[ResponseRecord], lo: f64, hi: f64, start: f64) -> f64 {
        let mut lo = lo;
        let mut hi = hi;
        let mut theta = if start.is_finite() && start > lo && start < hi {
            start
        } else {
            0.5 * (lo + hi)
        };
        let mut width = hi - lo;

        for _ in 0..self.config.max_iterations {
            let score = total_score(responses, theta);
            if score >= 0.0 {
                lo = theta;
            } else {
                hi = theta;
            }
            if hi - lo < self.config.tolerance {
                return 0.5 * (lo + hi);
            }

            let info = test_information(responses, theta);
            let newton = if info > 0.0 {
                theta + score / info
            } else {
                f64::NAN
            };
            let shrunk = hi - lo <= 0.5 * width;
            width = hi - lo;

            theta = if shrunk && newton.is_finite() && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
        }

        theta
    }
}

fn validate_all(responses: &[ResponseRecord]) -> QuizResult<()> {
    for response in responses {
        response.params.validate()?;
    }
    Ok(())
}

fn log_likelihood(responses: &[ResponseRecord], theta: f64) -> f64 {
    responses
        .iter()
        .map(|r| {
            let p = probability_unchecked(theta, &r.params);
            if r.correct {
                p.ln()
            } else {
                (1.0 - p).ln()
            }
        })
        .sum()
}

fn total_score(responses: &[ResponseRecord], theta: f64) -> f64 {
    responses
        .iter()
        .map(|r| score_unchecked(theta, &r.params, r.correct))
        .sum()
}

fn test_information(responses: &[ResponseRecord], theta: f64) -> f64 {
    responses
        .iter()
        .map(|r| information_unchecked(theta, &r.params))
        .sum()
}
