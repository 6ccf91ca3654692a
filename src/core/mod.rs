pub mod errors;
pub mod kana;
pub mod models;

pub use errors::DrillError;
pub use models::{
    PartOfSpeech,
    Question,
    QuizMode,
    WordEntry,
};
