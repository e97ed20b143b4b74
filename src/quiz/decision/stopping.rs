use serde::{Deserialize, Serialize};

use crate::quiz::config::StoppingConfig;
use crate::quiz::types::AbilityEstimate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopDecision {
    Continue,
    ConfidenceReached,
    MaximumReached,
    Plateau,
    /// Reported by the session when the selector has nothing left.
    PoolExhausted,
}

impl StopDecision {
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::ConfidenceReached => "confidence_reached",
            Self::MaximumReached => "maximum_reached",
            Self::Plateau => "plateau",
            Self::PoolExhausted => "pool_exhausted",
        }
    }
}

/// Default bounds (5 to 20 questions) with an explicit threshold.
pub fn should_continue_quiz(
    ability: &AbilityEstimate,
    questions_answered: u32,
    confidence_threshold: f64,
) -> bool {
    StoppingRule::default().should_continue_quiz(ability, questions_answered, confidence_threshold)
}

/// Precedence: maximum count, then minimum count, then confidence, then plateau.
pub struct StoppingRule {
    config: StoppingConfig,
}

impl Default for StoppingRule {
    fn default() -> Self {
        Self::new(StoppingConfig::default())
    }
}

impl StoppingRule {
    pub fn new(config: StoppingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoppingConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        ability: &AbilityEstimate,
        questions_answered: u32,
        confidence_threshold: f64,
    ) -> StopDecision {
        if questions_answered >= self.config.max_questions {
            return StopDecision::MaximumReached;
        }
        if questions_answered < self.config.min_questions {
            return StopDecision::Continue;
        }
        if ability.confidence >= confidence_threshold {
            return StopDecision::ConfidenceReached;
        }
        if let Some(ref plateau) = self.config.plateau {
            let history = &ability.history;
            if plateau.window >= 2 && history.len() >= plateau.window {
                let recent = &history[history.len() - plateau.window..];
                let max = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = recent.iter().copied().fold(f64::INFINITY, f64::min);
                if max - min < plateau.tolerance {
                    return StopDecision::Plateau;
                }
            }
        }
        StopDecision::Continue
    }

    pub fn should_continue_quiz(
        &self,
        ability: &AbilityEstimate,
        questions_answered: u32,
        confidence_threshold: f64,
    ) -> bool {
        self.evaluate(ability, questions_answered, confidence_threshold)
            .should_continue()
    }

    /// Uses the configured threshold.
    pub fn should_continue(&self, ability: &AbilityEstimate, questions_answered: u32) -> bool {
        self.should_continue_quiz(ability, questions_answered, self.config.confidence_threshold)
    }
}
