use std::collections::HashSet;

use rand::{
    seq::{
        IndexedRandom,
        SliceRandom,
    },
    Rng,
};

use crate::core::{
    DrillError,
    Question,
    QuizMode,
    WordEntry,
};

pub const CHOICE_COUNT: usize = 4;
pub const DISTRACTOR_COUNT: usize = CHOICE_COUNT - 1;

/// Build one multiple-choice question for `word`.
///
/// `same_pos_pool` supplies reading and written-form distractors;
/// `meaning_pool` supplies gloss distractors and is deliberately the wider,
/// level-wide pool (glosses are less category-specific than readings). The
/// two may coincide.
pub fn generate_question(
    word: &WordEntry,
    mode: QuizMode,
    same_pos_pool: &[WordEntry],
    meaning_pool: &[WordEntry],
    rng: &mut impl Rng,
) -> Result<Question, DrillError> {
    let (prompt, correct_answer) = match mode {
        QuizMode::Reading => {
            (format!("How do you read 「{}」?", word.display_form()), word.reading.clone())
        }
        QuizMode::Meaning => {
            (format!("What does 「{}」 mean?", word.display_form()), word.meaning.clone())
        }
        QuizMode::GlossToWord => {
            let surface = word.surface_form.clone().ok_or_else(|| {
                DrillError::Custom(format!(
                    "'{}' has no written form, cannot quiz kr2jp on it",
                    word.reading
                ))
            })?;
            (format!("Which word means \"{}\"?", word.meaning), surface)
        }
    };

    let candidates: Vec<&str> = match mode {
        QuizMode::Reading => {
            distinct_values(same_pos_pool.iter().map(|e| e.reading.as_str()), &correct_answer)
        }
        QuizMode::Meaning => {
            distinct_values(meaning_pool.iter().map(|e| e.meaning.as_str()), &correct_answer)
        }
        QuizMode::GlossToWord => distinct_values(
            same_pos_pool.iter().filter_map(|e| e.surface_form.as_deref()),
            &correct_answer,
        ),
    };

    if candidates.len() < DISTRACTOR_COUNT {
        return Err(DrillError::InsufficientDistractors {
            word: word.display_form().to_string(),
            quiz_mode: mode,
            available: candidates.len(),
        });
    }

    let mut choices: Vec<String> = candidates
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .map(|s| s.to_string())
        .collect();
    choices.push(correct_answer.clone());
    choices.shuffle(rng);

    Ok(Question { prompt, choices, correct_answer, quiz_mode: mode, word: word.clone() })
}

/// Deduplicate candidate values in first-seen order, dropping the correct
/// answer and empties. First-seen order keeps sampling deterministic under a
/// seeded RNG.
fn distinct_values<'a>(
    values: impl Iterator<Item = &'a str>,
    correct_answer: &str,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for value in values {
        if value.is_empty() || value == correct_answer {
            continue;
        }
        if seen.insert(value) {
            distinct.push(value);
        }
    }
    distinct
}
