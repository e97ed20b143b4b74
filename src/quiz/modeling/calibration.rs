use crate::quiz::config::CalibrationConfig;
use crate::quiz::error::QuizResult;
use crate::quiz::modeling::irt::probability_unchecked;
use crate::quiz::types::ItemParameters;

pub fn update_question_parameters(
    item_id: &str,
    correct: bool,
    response_time_seconds: f64,
    current: &ItemParameters,
) -> QuizResult<ItemParameters> {
    ParameterCalibrator::default().update_question_parameters(
        item_id,
        correct,
        response_time_seconds,
        current,
    )
}

/// Online nudging of a single item's difficulty and discrimination.
///
/// This is a low learning-rate heuristic, not a re-calibration. Concurrent
/// updates for the same item are not ordered here; the item store decides.
pub struct ParameterCalibrator {
    config: CalibrationConfig,
}

impl Default for ParameterCalibrator {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

impl ParameterCalibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Calibrates against the population mean ability.
    pub fn update_question_parameters(
        &self,
        item_id: &str,
        correct: bool,
        response_time_seconds: f64,
        current: &ItemParameters,
    ) -> QuizResult<ItemParameters> {
        self.update_question_parameters_for(item_id, correct, response_time_seconds, current, 0.0)
    }

    pub fn update_question_parameters_for(
        &self,
        item_id: &str,
        correct: bool,
        response_time_seconds: f64,
        current: &ItemParameters,
        respondent_theta: f64,
    ) -> QuizResult<ItemParameters> {
        current.validate()?;
        let theta = if respondent_theta.is_finite() {
            respondent_theta
        } else {
            0.0
        };

        let y = if correct { 1.0 } else { 0.0 };
        let p = probability_unchecked(theta, current);
        let residual = y - p;
        let weight = self.latency_weight(correct, response_time_seconds);

        let (b_lo, b_hi) = self.config.difficulty_bounds;
        let (a_lo, a_hi) = self.config.discrimination_bounds;

        let difficulty = (current.difficulty - self.config.difficulty_rate * residual * weight)
            .clamp(b_lo, b_hi);
        let discrimination = (current.discrimination
            + self.config.discrimination_rate * residual * (theta - current.difficulty) * weight)
            .clamp(a_lo, a_hi);

        let updated = ItemParameters {
            difficulty,
            discrimination,
            guessing: current.guessing,
        };

        tracing::debug!(
            item_id,
            correct,
            residual,
            weight,
            old_difficulty = current.difficulty,
            new_difficulty = updated.difficulty,
            old_discrimination = current.discrimination,
            new_discrimination = updated.discrimination,
            "item parameters calibrated"
        );

        Ok(updated)
    }

    /// Fast correct answers amplify the nudge, rushed wrong answers damp it.
    fn latency_weight(&self, correct: bool, response_time_seconds: f64) -> f64 {
        if !response_time_seconds.is_finite() || response_time_seconds <= 0.0 {
            return 1.0;
        }
        let reference = self.config.reference_response_seconds;
        if correct {
            (reference / response_time_seconds).sqrt().clamp(0.5, 2.0)
        } else if response_time_seconds < 0.2 * reference {
            0.5
        } else {
            1.0
        }
    }
}
