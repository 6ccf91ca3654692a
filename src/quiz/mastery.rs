use std::collections::{
    HashMap,
    HashSet,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    QuizMode,
    WordEntry,
};

/// Word keys the user has answered correctly at least once, tracked
/// independently per quiz mode. Grows monotonically until the user resets a
/// mode. The host owns persistence between interactions; the JSON shape is
/// stable for that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasteryState {
    by_mode: HashMap<QuizMode, HashSet<String>>,
}

impl MasteryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a correct answer. Only grading calls this.
    pub fn record(&mut self, mode: QuizMode, word: &WordEntry) {
        self.by_mode.entry(mode).or_default().insert(word.key().to_string());
    }

    /// Matches on surface form OR reading, because words without a surface
    /// form are tracked by reading alone.
    pub fn is_mastered(&self, mode: QuizMode, word: &WordEntry) -> bool {
        self.by_mode.get(&mode).is_some_and(|keys| {
            word.surface_form.as_deref().is_some_and(|s| keys.contains(s))
                || keys.contains(word.reading.as_str())
        })
    }

    pub fn mastered_count(&self, mode: QuizMode) -> usize {
        self.by_mode.get(&mode).map_or(0, HashSet::len)
    }

    /// The user-facing "start over on this mode" action.
    pub fn clear(&mut self, mode: QuizMode) {
        self.by_mode.remove(&mode);
    }

    pub fn clear_all(&mut self) {
        self.by_mode.clear();
    }

    /// Candidates still worth quizzing in `mode`, in pool order.
    pub fn filter_unmastered<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a WordEntry>,
        mode: QuizMode,
    ) -> Vec<&'a WordEntry> {
        entries.into_iter().filter(|e| !self.is_mastered(mode, e)).collect()
    }
}
