//! Adaptive quiz engine for the danci learning platform.
//!
//! - [`quiz::modeling`] - 3PL response model, ability estimation, online item calibration
//! - [`quiz::decision`] - maximum-information item selection and stopping rules
//! - [`quiz::scoring`] - final score, proficiency band and recommendations
//! - [`quiz::engine`] - session API for the hosting service
//! - [`quiz::simulation`] - seeded CAT simulations over an item bank
//!
//! Everything in [`quiz`] is synchronous and free of shared state; session
//! state is owned by the caller.

pub mod config;
pub mod logging;
pub mod quiz;

pub use quiz::{QuizConfig, QuizEngine, QuizError, QuizResult, QuizSession};
