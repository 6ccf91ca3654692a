use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Grammatical category of a vocabulary word. The word table only carries
/// these three; rows tagged with anything else are dropped at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    #[serde(rename = "i-adjective")]
    IAdjective,
    #[serde(rename = "na-adjective")]
    NaAdjective,
    #[serde(rename = "verb")]
    Verb,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 3] =
        [PartOfSpeech::IAdjective, PartOfSpeech::NaAdjective, PartOfSpeech::Verb];

    /// Parse a table cell. Tolerant of case, stray whitespace and the short
    /// tags the original word list used.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "i-adjective" | "i-adj" | "i_adjective" => Some(PartOfSpeech::IAdjective),
            "na-adjective" | "na-adj" | "na_adjective" => Some(PartOfSpeech::NaAdjective),
            "verb" => Some(PartOfSpeech::Verb),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartOfSpeech::IAdjective => "i-adjective",
            PartOfSpeech::NaAdjective => "na-adjective",
            PartOfSpeech::Verb => "verb",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which attribute of a word a quiz tests. Mastery is tracked independently
/// per mode. `GlossToWord` keeps the original wire name `kr2jp` (the source
/// application's glosses are Korean).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizMode {
    #[serde(rename = "reading")]
    Reading,
    #[serde(rename = "meaning")]
    Meaning,
    #[serde(rename = "kr2jp")]
    GlossToWord,
}

impl QuizMode {
    pub const ALL: [QuizMode; 3] = [QuizMode::Reading, QuizMode::Meaning, QuizMode::GlossToWord];

    pub fn label(&self) -> &'static str {
        match self {
            QuizMode::Reading => "reading",
            QuizMode::Meaning => "meaning",
            QuizMode::GlossToWord => "kr2jp",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One vocabulary item from the word table. Immutable after load; the pool
/// hands out references only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub level: String,
    pub part_of_speech: PartOfSpeech,
    /// Written form (kanji or mixed). Absent for words the table only lists
    /// in kana.
    pub surface_form: Option<String>,
    /// Phonetic form in hiragana. Never empty after load.
    pub reading: String,
    /// Gloss. Never empty after load.
    pub meaning: String,
}

impl WordEntry {
    /// What a quiz shows the user for this word.
    pub fn display_form(&self) -> &str {
        self.surface_form.as_deref().unwrap_or(&self.reading)
    }

    /// Key under which mastery and attempt results are recorded: the surface
    /// form when one exists, otherwise the reading.
    pub fn key(&self) -> &str {
        self.surface_form.as_deref().unwrap_or(&self.reading)
    }

    /// True when `key` names this word by either its surface form or its
    /// reading. Words without a surface form are only reachable by reading.
    pub fn matches_key(&self, key: &str) -> bool {
        self.surface_form.as_deref() == Some(key) || self.reading == key
    }
}

/// A generated multiple-choice item. `choices` always holds exactly four
/// distinct strings, one of which equals `correct_answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub quiz_mode: QuizMode,
    /// The word this question was generated from, for review display and
    /// mastery bookkeeping.
    pub word: WordEntry,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}
