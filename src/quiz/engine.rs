//! Session-level API for the hosting service.
//!
//! The engine holds configuration only. All per-examinee state lives in
//! [`QuizSession`], which the caller owns and persists between requests, so
//! sessions for different examinees never share anything.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::quiz::config::QuizConfig;
use crate::quiz::decision::{select_next_question, StopDecision, StoppingRule};
use crate::quiz::error::{QuizError, QuizResult};
use crate::quiz::modeling::{AbilityEstimator, ParameterCalibrator};
use crate::quiz::scoring::ResultSummarizer;
use crate::quiz::types::{
    AbilityEstimate, CandidateItem, FinalResult, ItemParameters, ResponseRecord,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub items: Vec<CandidateItem>,
    pub responses: Vec<ResponseRecord>,
    pub answered_ids: HashSet<String>,
    pub ability: AbilityEstimate,
    /// Item most recently suggested by the selector.
    pub current_item: Option<String>,
    pub status: StopDecision,
    pub finalized: bool,
}

impl QuizSession {
    pub fn questions_answered(&self) -> u32 {
        self.responses.len() as u32
    }

    pub fn correct_count(&self) -> u32 {
        self.responses.iter().filter(|r| r.correct).count() as u32
    }

    pub fn is_finished(&self) -> bool {
        self.finalized || !self.status.should_continue()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStart {
    pub session: QuizSession,
    pub first_item: Option<CandidateItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub next_item: Option<CandidateItem>,
    pub ability: AbilityEstimate,
    pub should_stop: bool,
    pub decision: StopDecision,
    /// Updated parameters for the answered item; the caller writes them back.
    pub calibrated_params: ItemParameters,
}

pub struct QuizEngine {
    config: QuizConfig,
    estimator: AbilityEstimator,
    stopping: StoppingRule,
    calibrator: ParameterCalibrator,
    summarizer: ResultSummarizer,
}

impl QuizEngine {
    pub fn new(config: QuizConfig) -> QuizResult<Self> {
        config.validate()?;
        Ok(Self {
            estimator: AbilityEstimator::new(config.estimator.clone()),
            stopping: StoppingRule::new(config.stopping.clone()),
            calibrator: ParameterCalibrator::new(config.calibration.clone()),
            summarizer: ResultSummarizer::new(config.scoring.clone(), &config.estimator),
            config,
        })
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn start_session(&self, candidates: Vec<CandidateItem>) -> QuizResult<SessionStart> {
        for item in &candidates {
            item.params.validate()?;
        }

        let ability = AbilityEstimate::prior();
        let answered_ids = HashSet::new();
        let first_item = select_next_question(&candidates, &ability, &answered_ids)?.cloned();
        let status = if first_item.is_some() {
            StopDecision::Continue
        } else {
            StopDecision::PoolExhausted
        };

        tracing::debug!(
            pool_size = candidates.len(),
            first_item = first_item.as_ref().map(|i| i.id.as_str()),
            "quiz session started"
        );

        Ok(SessionStart {
            session: QuizSession {
                items: candidates,
                responses: Vec::new(),
                answered_ids,
                ability,
                current_item: first_item.as_ref().map(|i| i.id.clone()),
                status,
                finalized: false,
            },
            first_item,
        })
    }

    pub fn submit_response(
        &self,
        session: &mut QuizSession,
        item_id: &str,
        correct: bool,
        response_time_seconds: Option<f64>,
    ) -> QuizResult<SubmitOutcome> {
        if session.is_finished() {
            return Err(QuizError::SessionFinished);
        }
        let params = session
            .items
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.params)
            .ok_or_else(|| QuizError::UnknownItem(item_id.to_string()))?;
        if session.answered_ids.contains(item_id) {
            return Err(QuizError::DuplicateResponse(item_id.to_string()));
        }

        let mut responses = session.responses.clone();
        responses.push(ResponseRecord {
            item_id: item_id.to_string(),
            correct,
            params,
            response_time_seconds,
        });
        let ability = self
            .estimator
            .estimate_continuing(&responses, &session.ability)?;
        let calibrated_params = self.calibrator.update_question_parameters_for(
            item_id,
            correct,
            response_time_seconds.unwrap_or(f64::NAN),
            &params,
            ability.theta,
        )?;

        session.responses = responses;
        session.answered_ids.insert(item_id.to_string());
        session.ability = ability;

        let mut decision = self.stopping.evaluate(
            &session.ability,
            session.questions_answered(),
            self.config.stopping.confidence_threshold,
        );
        let next_item = if decision.should_continue() {
            let next =
                select_next_question(&session.items, &session.ability, &session.answered_ids)?
                    .cloned();
            if next.is_none() {
                decision = StopDecision::PoolExhausted;
            }
            next
        } else {
            None
        };

        session.status = decision;
        session.current_item = next_item.as_ref().map(|i| i.id.clone());

        tracing::debug!(
            item_id,
            correct,
            theta = session.ability.theta,
            confidence = session.ability.confidence,
            answered = session.questions_answered(),
            decision = decision.as_str(),
            "quiz response processed"
        );

        Ok(SubmitOutcome {
            next_item,
            ability: session.ability.clone(),
            should_stop: !decision.should_continue(),
            decision,
            calibrated_params,
        })
    }

    /// Produces the result exactly once; later calls fail.
    pub fn finalize(&self, session: &mut QuizSession) -> QuizResult<FinalResult> {
        if session.finalized {
            return Err(QuizError::SessionFinished);
        }
        session.finalized = true;
        let result = self.summarizer.summarize(
            &session.ability,
            session.correct_count(),
            session.questions_answered(),
        );

        tracing::info!(
            theta = result.theta,
            score = result.score,
            band = result.band.as_str(),
            confidence_percent = result.confidence_percent,
            answered = result.questions_answered,
            stop_reason = session.status.as_str(),
            "quiz session finalized"
        );

        Ok(result)
    }
}
