use std::collections::HashSet;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        DrillError,
        PartOfSpeech,
        QuizMode,
    },
    quiz::session::{
        GradeReport,
        QuizSession,
        WrongAnswer,
    },
};

/// One submitted session, in the shape the remote attempt-history table
/// stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub level: String,
    pub quiz_mode: QuizMode,
    pub question_count: usize,
    pub score: usize,
    pub wrong: Vec<WrongAnswer>,
    pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn from_graded(session: &QuizSession, report: &GradeReport) -> Self {
        let level = session
            .questions()
            .first()
            .map(|q| q.word.level.clone())
            .unwrap_or_default();
        AttemptRecord {
            level,
            quiz_mode: session.quiz_mode,
            question_count: report.total,
            score: report.score,
            wrong: report.wrong.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-word outcome of one submitted session, for statistics aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordResult {
    pub key: String,
    pub level: String,
    pub part_of_speech: PartOfSpeech,
    pub quiz_mode: QuizMode,
    pub correct: bool,
}

/// One `WordResult` per question in the session, in question order.
pub fn word_results(session: &QuizSession, report: &GradeReport) -> Vec<WordResult> {
    let wrong_indices: HashSet<usize> = report.wrong.iter().map(|w| w.index).collect();
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| WordResult {
            key: question.word.key().to_string(),
            level: question.word.level.clone(),
            part_of_speech: question.word.part_of_speech,
            quiz_mode: question.quiz_mode,
            correct: !wrong_indices.contains(&index),
        })
        .collect()
}

/// The remote store, reduced to the calls this core makes. Implementations
/// wrap the hosted database client and own retry policy.
pub trait AttemptStore {
    fn save_attempt(&mut self, record: &AttemptRecord) -> Result<(), DrillError>;
    fn save_word_results(&mut self, results: &[WordResult]) -> Result<(), DrillError>;
    fn load_attempts(&self) -> Result<Vec<AttemptRecord>, DrillError>;
}

/// In-memory store for tests and hosts running without a remote database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub attempts: Vec<AttemptRecord>,
    pub word_results: Vec<WordResult>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttemptStore for MemoryStore {
    fn save_attempt(&mut self, record: &AttemptRecord) -> Result<(), DrillError> {
        self.attempts.push(record.clone());
        Ok(())
    }

    fn save_word_results(&mut self, results: &[WordResult]) -> Result<(), DrillError> {
        self.word_results.extend_from_slice(results);
        Ok(())
    }

    fn load_attempts(&self) -> Result<Vec<AttemptRecord>, DrillError> {
        Ok(self.attempts.clone())
    }
}

/// Persist a graded session, degrading to a warning on failure. A broken
/// store must never keep the user from seeing their score or starting the
/// next quiz; returns whether everything was saved.
pub fn persist_attempt(
    store: &mut dyn AttemptStore,
    record: &AttemptRecord,
    results: &[WordResult],
) -> bool {
    let mut saved = true;
    if let Err(e) = store.save_attempt(record) {
        log::warn!("failed to save attempt record: {}", e);
        saved = false;
    }
    if let Err(e) = store.save_word_results(results) {
        log::warn!("failed to save per-word results: {}", e);
        saved = false;
    }
    saved
}
