//! Final score, proficiency band and recommendations.
//!
//! The score is a linear rescale of theta over the estimator range, so it
//! depends on theta only and never on raw accuracy.

use crate::quiz::config::{EstimatorConfig, ScoringConfig};
use crate::quiz::types::{AbilityEstimate, FinalResult, ProficiencyBand};

pub fn calculate_final_results(ability: &AbilityEstimate, correct_count: u32) -> FinalResult {
    ResultSummarizer::default().calculate_final_results(ability, correct_count)
}

pub struct ResultSummarizer {
    scoring: ScoringConfig,
    theta_min: f64,
    theta_max: f64,
}

impl Default for ResultSummarizer {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), &EstimatorConfig::default())
    }
}

impl ResultSummarizer {
    pub fn new(scoring: ScoringConfig, estimator: &EstimatorConfig) -> Self {
        Self {
            scoring,
            theta_min: estimator.theta_min,
            theta_max: estimator.theta_max,
        }
    }

    pub fn score(&self, theta: f64) -> u32 {
        let theta = if theta.is_finite() { theta } else { 0.0 };
        let fraction = (theta - self.theta_min) / (self.theta_max - self.theta_min);
        (fraction * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Questions answered is taken from the length of `ability.history`.
    pub fn calculate_final_results(
        &self,
        ability: &AbilityEstimate,
        correct_count: u32,
    ) -> FinalResult {
        self.summarize(ability, correct_count, ability.history.len() as u32)
    }

    pub(crate) fn summarize(
        &self,
        ability: &AbilityEstimate,
        correct_count: u32,
        questions_answered: u32,
    ) -> FinalResult {
        let band = ProficiencyBand::from_theta(ability.theta);
        let confidence_percent = (ability.confidence * 100.0).round().clamp(0.0, 100.0) as u32;

        FinalResult {
            score: self.score(ability.theta),
            proficiency_label: band.label().to_string(),
            band,
            confidence_percent,
            recommendations: self.recommendations(
                band,
                ability.confidence,
                correct_count,
                questions_answered,
            ),
            theta: ability.theta,
            correct_count,
            questions_answered,
        }
    }

    fn recommendations(
        &self,
        band: ProficiencyBand,
        confidence: f64,
        correct_count: u32,
        questions_answered: u32,
    ) -> Vec<String> {
        let mut out = Vec::new();

        if confidence < self.scoring.low_confidence {
            out.push("Take more practice items to confirm this placement.".to_string());
        }

        let targeted = match band {
            ProficiencyBand::A1 => {
                "Start with the foundational lessons before attempting graded quizzes."
            }
            ProficiencyBand::A2 => {
                "Review core vocabulary and basic structures, then retake the placement quiz."
            }
            ProficiencyBand::B1 => {
                "Focus on intermediate material and practice applying concepts in context."
            }
            ProficiencyBand::B2 => {
                "Work through upper-intermediate topics with timed practice to build fluency."
            }
            ProficiencyBand::C1 => "Tackle advanced material and revisit the items you missed.",
            ProficiencyBand::C2 => {
                "You have mastered this material; consider moving on to the next course."
            }
        };
        out.push(targeted.to_string());

        if questions_answered > 0 {
            let accuracy = correct_count.min(questions_answered) as f64 / questions_answered as f64;
            if accuracy < 0.5 && band >= ProficiencyBand::C1 {
                out.push(
                    "Several items were missed despite a high placement; review fundamentals to close gaps."
                        .to_string(),
                );
            } else if accuracy > 0.8 && band <= ProficiencyBand::A2 {
                out.push(
                    "Accuracy was high on easier items; try harder practice sets to show your full level."
                        .to_string(),
                );
            }
        }

        out
    }
}
