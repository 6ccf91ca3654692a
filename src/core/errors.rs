use thiserror::Error;

use super::models::{
    PartOfSpeech,
    QuizMode,
};

#[derive(Error, Debug)]
pub enum DrillError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("word table is missing the '{0}' column")]
    MissingColumn(String),

    #[error("word table has no usable rows for level '{0}'")]
    EmptyTable(String),

    #[error("{part_of_speech} pool has {available} words, need at least {required}")]
    PoolTooSmall { part_of_speech: PartOfSpeech, available: usize, required: usize },

    #[error("only {available} distinct {quiz_mode} distractors for '{word}', need 3")]
    InsufficientDistractors { word: String, quiz_mode: QuizMode, available: usize },

    #[error("retry requested with an empty word list")]
    EmptyWordList,

    #[error("none of the supplied word keys match the loaded pool")]
    NoMatchingWords,

    #[error("answer index {index} out of range for {len} questions")]
    AnswerOutOfRange { index: usize, len: usize },

    #[error("session is already submitted")]
    SessionAlreadySubmitted,

    #[error("DrillError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for DrillError {
    fn from(error: std::io::Error) -> Self {
        DrillError::Io(Box::new(error))
    }
}

impl From<csv::Error> for DrillError {
    fn from(error: csv::Error) -> Self {
        DrillError::Csv(Box::new(error))
    }
}

impl DrillError {
    /// Fatal errors mean the word table itself cannot support the requested
    /// quiz; nothing the user does at runtime will fix them.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            DrillError::PoolTooSmall { .. } | DrillError::InsufficientDistractors { .. }
        )
    }
}
