pub mod selector;
pub mod stopping;

pub use selector::{rank_candidates, select_next_question, RankedCandidate};
pub use stopping::{should_continue_quiz, StopDecision, StoppingRule};
