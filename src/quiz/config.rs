use serde::{Deserialize, Serialize};

use crate::quiz::error::{QuizError, QuizResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub theta_min: f64,
    pub theta_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            theta_min: -4.0,
            theta_max: 4.0,
            tolerance: 1e-4,
            max_iterations: 25,
        }
    }
}

/// Stop once the last `window` estimates span less than `tolerance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateauRule {
    pub window: usize,
    pub tolerance: f64,
}

impl Default for PlateauRule {
    fn default() -> Self {
        Self {
            window: 4,
            tolerance: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoppingConfig {
    pub min_questions: u32,
    pub max_questions: u32,
    pub confidence_threshold: f64,
    pub plateau: Option<PlateauRule>,
}

impl Default for StoppingConfig {
    fn default() -> Self {
        Self {
            min_questions: 5,
            max_questions: 20,
            confidence_threshold: 0.8,
            plateau: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub difficulty_rate: f64,
    pub discrimination_rate: f64,
    pub reference_response_seconds: f64,
    pub difficulty_bounds: (f64, f64),
    pub discrimination_bounds: (f64, f64),
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            difficulty_rate: 0.05,
            discrimination_rate: 0.02,
            reference_response_seconds: 20.0,
            difficulty_bounds: (-4.0, 4.0),
            discrimination_bounds: (0.1, 4.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Below this confidence the result recommends more practice items.
    pub low_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            low_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    pub estimator: EstimatorConfig,
    pub stopping: StoppingConfig,
    pub calibration: CalibrationConfig,
    pub scoring: ScoringConfig,
}

impl QuizConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("QUIZ_MIN_QUESTIONS") {
            config.stopping.min_questions = val.parse().unwrap_or(config.stopping.min_questions);
        }
        if let Ok(val) = std::env::var("QUIZ_MAX_QUESTIONS") {
            config.stopping.max_questions = val.parse().unwrap_or(config.stopping.max_questions);
        }
        if let Ok(val) = std::env::var("QUIZ_CONFIDENCE_THRESHOLD") {
            config.stopping.confidence_threshold =
                val.parse().unwrap_or(config.stopping.confidence_threshold);
        }
        if let Ok(val) = std::env::var("QUIZ_MAX_ITERATIONS") {
            config.estimator.max_iterations =
                val.parse().unwrap_or(config.estimator.max_iterations);
        }
        if let Ok(val) = std::env::var("QUIZ_CALIBRATION_RATE") {
            config.calibration.difficulty_rate =
                val.parse().unwrap_or(config.calibration.difficulty_rate);
        }

        config
    }

    pub fn validate(&self) -> QuizResult<()> {
        self.estimator.validate()?;
        self.stopping.validate()?;
        self.calibration.validate()?;
        if !(0.0..=1.0).contains(&self.scoring.low_confidence) {
            return Err(QuizError::InvalidConfig(format!(
                "scoring.low_confidence must be in [0, 1], got {}",
                self.scoring.low_confidence
            )));
        }
        Ok(())
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> QuizResult<()> {
        if !(self.theta_min.is_finite() && self.theta_max.is_finite())
            || self.theta_min >= self.theta_max
        {
            return Err(QuizError::InvalidConfig(format!(
                "estimator theta range [{}, {}] is empty",
                self.theta_min, self.theta_max
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(QuizError::InvalidConfig(
                "estimator.tolerance must be positive".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(QuizError::InvalidConfig(
                "estimator.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl StoppingConfig {
    pub fn validate(&self) -> QuizResult<()> {
        if self.max_questions == 0 {
            return Err(QuizError::InvalidConfig(
                "stopping.max_questions must be at least 1".to_string(),
            ));
        }
        if self.min_questions > self.max_questions {
            return Err(QuizError::InvalidConfig(format!(
                "stopping.min_questions ({}) exceeds max_questions ({})",
                self.min_questions, self.max_questions
            )));
        }
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(QuizError::InvalidConfig(format!(
                "stopping.confidence_threshold must be in (0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if let Some(ref plateau) = self.plateau {
            if plateau.window < 2 || !(plateau.tolerance > 0.0) {
                return Err(QuizError::InvalidConfig(
                    "stopping.plateau needs window >= 2 and a positive tolerance".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> QuizResult<()> {
        if !(self.difficulty_rate >= 0.0 && self.discrimination_rate >= 0.0) {
            return Err(QuizError::InvalidConfig(
                "calibration rates must be non-negative".to_string(),
            ));
        }
        if !(self.reference_response_seconds > 0.0) {
            return Err(QuizError::InvalidConfig(
                "calibration.reference_response_seconds must be positive".to_string(),
            ));
        }
        let (b_lo, b_hi) = self.difficulty_bounds;
        let (a_lo, a_hi) = self.discrimination_bounds;
        if !(b_lo < b_hi) || !(a_lo > 0.0 && a_lo < a_hi) {
            return Err(QuizError::InvalidConfig(
                "calibration bounds must be non-empty and discrimination positive".to_string(),
            ));
        }
        Ok(())
    }
}
