#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuizError {
    #[error("invalid item parameter {field}: {value}")]
    InvalidParameter { field: &'static str, value: f64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("item already answered: {0}")]
    DuplicateResponse(String),
    #[error("quiz session already finished")]
    SessionFinished,
    #[error("item bank error: {0}")]
    ItemBank(String),
}

pub type QuizResult<T> = Result<T, QuizError>;
