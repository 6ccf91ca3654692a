//! Core logic of a Japanese vocabulary drill application: loading a word
//! table into per-category pools, generating multiple-choice questions,
//! filtering out mastered words, assembling and grading quiz sessions, and
//! shaping the records the hosting application persists.
//!
//! The crate is pure and synchronous. The host owns the UI, the user
//! identity, and the remote store; it feeds discrete events (start, answer,
//! submit, retry) into a `QuizSession` + `MasteryState` pair it keeps per
//! user.

pub mod core;
pub mod pool;
pub mod quiz;
pub mod record;
pub mod stats;

pub use crate::core::{
    DrillError,
    PartOfSpeech,
    Question,
    QuizMode,
    WordEntry,
};
pub use pool::WordPool;
pub use quiz::{
    mastery::MasteryState,
    session::{
        BuildOutcome,
        GradeReport,
        MixPolicy,
        PosSelection,
        QuizBuilder,
        QuizConfig,
        QuizSession,
        SessionPhase,
        WrongAnswer,
    },
    MIN_QUIZ_SIZE,
};
pub use record::{
    word_results,
    AttemptRecord,
    AttemptStore,
    MemoryStore,
    WordResult,
};
