pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod modeling;
pub mod scoring;
pub mod simulation;
pub mod types;

pub use config::QuizConfig;
pub use engine::{QuizEngine, QuizSession, SessionStart, SubmitOutcome};
pub use error::{QuizError, QuizResult};
pub use scoring::{calculate_final_results, ResultSummarizer};
pub use types::*;
