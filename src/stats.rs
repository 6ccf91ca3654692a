use std::collections::{
    BTreeSet,
    HashMap,
};

use chrono::{
    Days,
    NaiveDate,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::QuizMode,
    record::AttemptRecord,
};

/// The word keys missed most often across attempt history, most-missed
/// first, ties broken lexicographically. Feeds the "retry weak words" quiz.
pub fn weak_words(attempts: &[AttemptRecord], top_n: usize) -> Vec<String> {
    let mut miss_counts: HashMap<String, usize> = HashMap::new();
    for attempt in attempts {
        for wrong in &attempt.wrong {
            let key = wrong.surface_form.clone().unwrap_or_else(|| wrong.reading.clone());
            *miss_counts.entry(key).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = miss_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked.into_iter().map(|(key, _)| key).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeAccuracy {
    pub answered: usize,
    pub correct: usize,
}

impl ModeAccuracy {
    pub fn percent(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64 * 100.0
        }
    }
}

/// Aggregate answered/correct totals per quiz mode, the admin-facing view
/// computed over attempt records.
pub fn per_mode_accuracy(attempts: &[AttemptRecord]) -> HashMap<QuizMode, ModeAccuracy> {
    let mut by_mode: HashMap<QuizMode, ModeAccuracy> = HashMap::new();
    for attempt in attempts {
        let entry = by_mode.entry(attempt.quiz_mode).or_default();
        entry.answered += attempt.question_count;
        entry.correct += attempt.score;
    }
    by_mode
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive days with at least one submitted quiz, ending today or,
    /// when nothing was submitted yet today, ending yesterday.
    pub days: u32,
    pub attended_today: bool,
}

/// Attendance streak over attempt history. A streak broken yesterday still
/// shows zero rather than the stale run before the gap.
pub fn attendance_streak(attempts: &[AttemptRecord], today: NaiveDate) -> Streak {
    let attended: BTreeSet<NaiveDate> =
        attempts.iter().map(|a| a.timestamp.date_naive()).collect();

    let attended_today = attended.contains(&today);
    let mut cursor = if attended_today {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) => yesterday,
            None => return Streak { days: 0, attended_today },
        }
    };

    let mut days = 0;
    while attended.contains(&cursor) {
        days += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    Streak { days, attended_today }
}
