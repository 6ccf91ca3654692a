use rand::{
    seq::SliceRandom,
    Rng,
};
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use super::{
    generator::generate_question,
    mastery::MasteryState,
    MIN_QUIZ_SIZE,
};
use crate::{
    core::{
        DrillError,
        PartOfSpeech,
        Question,
        QuizMode,
        WordEntry,
    },
    pool::WordPool,
};

/// Which category pool a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosSelection {
    Single(PartOfSpeech),
    Mixed,
}

/// Per-category target counts for mixed quizzes. A named policy rather than
/// inline literals so the proportions are visible configuration.
#[derive(Debug, Clone)]
pub struct MixPolicy {
    targets: Vec<(PartOfSpeech, usize)>,
}

impl MixPolicy {
    pub fn new(targets: Vec<(PartOfSpeech, usize)>) -> Self {
        MixPolicy { targets }
    }

    pub fn targets(&self) -> &[(PartOfSpeech, usize)] {
        &self.targets
    }

    pub fn total(&self) -> usize {
        self.targets.iter().map(|(_, n)| n).sum()
    }
}

impl Default for MixPolicy {
    /// Verbs carry most of a level's vocabulary, so they get the bulk of a
    /// mixed quiz: 6 verbs, 2 i-adjectives, 2 na-adjectives.
    fn default() -> Self {
        MixPolicy::new(vec![
            (PartOfSpeech::Verb, 6),
            (PartOfSpeech::IAdjective, 2),
            (PartOfSpeech::NaAdjective, 2),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub quiz_size: usize,
    pub mix_policy: MixPolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig { quiz_size: MIN_QUIZ_SIZE, mix_policy: MixPolicy::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    InProgress,
    Submitted,
}

/// One active quiz. Created whole by a `QuizBuilder`, mutated only by answer
/// selection and submission, and superseded wholesale by the next quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub quiz_mode: QuizMode,
    pub pos_selection: PosSelection,
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
    phase: SessionPhase,
}

impl QuizSession {
    fn new(questions: Vec<Question>, quiz_mode: QuizMode, pos_selection: PosSelection) -> Self {
        let answers = vec![None; questions.len()];
        QuizSession {
            id: Uuid::new_v4(),
            quiz_mode,
            pos_selection,
            questions,
            answers,
            phase: SessionPhase::InProgress,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn select_answer(
        &mut self,
        index: usize,
        answer: impl Into<String>,
    ) -> Result<(), DrillError> {
        if self.phase == SessionPhase::Submitted {
            return Err(DrillError::SessionAlreadySubmitted);
        }
        if index >= self.answers.len() {
            return Err(DrillError::AnswerOutOfRange { index, len: self.answers.len() });
        }
        self.answers[index] = Some(answer.into());
        Ok(())
    }

    /// Grade the session against its stored answers. Unanswered questions
    /// count as wrong. Recomputes from scratch every call, and mastery keys
    /// are set-valued, so a second submit reproduces the same report.
    pub fn submit(&mut self, mastery: &mut MasteryState) -> GradeReport {
        let mut score = 0;
        let mut wrong = Vec::new();

        for (index, question) in self.questions.iter().enumerate() {
            let given = self.answers[index].as_deref();
            if given.is_some_and(|a| question.is_correct(a)) {
                score += 1;
                mastery.record(question.quiz_mode, &question.word);
            } else {
                wrong.push(WrongAnswer {
                    index,
                    prompt: question.prompt.clone(),
                    given: given.map(str::to_string),
                    correct_answer: question.correct_answer.clone(),
                    surface_form: question.word.surface_form.clone(),
                    reading: question.word.reading.clone(),
                    meaning: question.word.meaning.clone(),
                    quiz_mode: question.quiz_mode,
                });
            }
        }

        self.phase = SessionPhase::Submitted;
        GradeReport { score, total: self.questions.len(), wrong }
    }
}

/// Outcome of a grading pass. Fixed once computed; feeds the review display
/// and the attempt record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub score: usize,
    pub total: usize,
    pub wrong: Vec<WrongAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongAnswer {
    pub index: usize,
    pub prompt: String,
    /// `None` when the question was left unanswered.
    pub given: Option<String>,
    pub correct_answer: String,
    pub surface_form: Option<String>,
    pub reading: String,
    pub meaning: String,
    pub quiz_mode: QuizMode,
}

/// What a build produced. Mastery depletion is an expected state, not an
/// error: a shortfall carries an informational notice, and a fully mastered
/// pool is terminal until the user resets mastery or retries mistakes.
#[derive(Debug)]
pub enum BuildOutcome {
    Full(QuizSession),
    Short { session: QuizSession, requested: usize },
    Exhausted,
}

impl BuildOutcome {
    pub fn session(self) -> Option<QuizSession> {
        match self {
            BuildOutcome::Full(session) | BuildOutcome::Short { session, .. } => Some(session),
            BuildOutcome::Exhausted => None,
        }
    }
}

/// Assembles quizzes over a loaded word pool.
pub struct QuizBuilder<'a> {
    pool: &'a WordPool,
    config: QuizConfig,
}

impl<'a> QuizBuilder<'a> {
    pub fn new(pool: &'a WordPool) -> Self {
        QuizBuilder { pool, config: QuizConfig::default() }
    }

    pub fn with_config(pool: &'a WordPool, config: QuizConfig) -> Self {
        QuizBuilder { pool, config }
    }

    /// Build a fresh quiz: resolve the category pool, drop mastered words,
    /// sample without replacement, generate one question per sampled word.
    pub fn build_quiz(
        &self,
        quiz_mode: QuizMode,
        pos_selection: PosSelection,
        mastery: &MasteryState,
        rng: &mut impl Rng,
    ) -> Result<BuildOutcome, DrillError> {
        let quiz_size = self.config.quiz_size;
        let mut sampled = match pos_selection {
            PosSelection::Single(pos) => {
                let source = self.source_pool(pos, quiz_mode);
                if source.len() < quiz_size {
                    return Err(DrillError::PoolTooSmall {
                        part_of_speech: pos,
                        available: source.len(),
                        required: quiz_size,
                    });
                }
                let mut unmastered = mastery.filter_unmastered(source, quiz_mode);
                unmastered.shuffle(rng);
                unmastered.truncate(quiz_size);
                unmastered
            }
            PosSelection::Mixed => self.sample_mixed(quiz_mode, mastery, rng)?,
        };

        if sampled.is_empty() {
            return Ok(BuildOutcome::Exhausted);
        }
        sampled.shuffle(rng);

        let questions = self.generate_all(&sampled, quiz_mode, rng)?;
        let session = QuizSession::new(questions, quiz_mode, pos_selection);

        if session.len() < quiz_size {
            log::info!(
                "only {} unmastered words left, quiz reduced from {}",
                session.len(),
                quiz_size
            );
            Ok(BuildOutcome::Short { session, requested: quiz_size })
        } else {
            Ok(BuildOutcome::Full(session))
        }
    }

    /// Rebuild a quiz from an explicit word-key list (prior wrong answers, or
    /// an aggregated weak-word list). Keys match on surface form OR reading.
    pub fn build_from_keys(
        &self,
        keys: &[String],
        quiz_mode: QuizMode,
        rng: &mut impl Rng,
    ) -> Result<QuizSession, DrillError> {
        if keys.is_empty() {
            return Err(DrillError::EmptyWordList);
        }

        let mut matched: Vec<&WordEntry> = self
            .pool
            .all_entries()
            .iter()
            .filter(|e| keys.iter().any(|k| e.matches_key(k)))
            .filter(|e| quiz_mode != QuizMode::GlossToWord || e.surface_form.is_some())
            .collect();

        if matched.is_empty() {
            // Stale or foreign keys, distinct from mastery exhaustion.
            return Err(DrillError::NoMatchingWords);
        }
        matched.shuffle(rng);

        let questions = self.generate_all(&matched, quiz_mode, rng)?;
        Ok(QuizSession::new(questions, quiz_mode, PosSelection::Mixed))
    }

    /// Fixed proportional draws per category, topped up from whatever other
    /// categories still have when one runs short of its target.
    fn sample_mixed(
        &self,
        quiz_mode: QuizMode,
        mastery: &MasteryState,
        rng: &mut impl Rng,
    ) -> Result<Vec<&'a WordEntry>, DrillError> {
        let mut picked = Vec::new();
        let mut leftover = Vec::new();

        for (pos, target) in self.config.mix_policy.targets() {
            let source = self.source_pool(*pos, quiz_mode);
            if source.len() < *target {
                return Err(DrillError::PoolTooSmall {
                    part_of_speech: *pos,
                    available: source.len(),
                    required: *target,
                });
            }
            let mut unmastered = mastery.filter_unmastered(source, quiz_mode);
            unmastered.shuffle(rng);
            let take = (*target).min(unmastered.len());
            leftover.extend(unmastered.split_off(take));
            picked.extend(unmastered);
        }

        let deficit = self.config.quiz_size.saturating_sub(picked.len());
        if deficit > 0 && !leftover.is_empty() {
            leftover.shuffle(rng);
            leftover.truncate(deficit);
            picked.extend(leftover);
        }
        picked.truncate(self.config.quiz_size);
        Ok(picked)
    }

    fn generate_all(
        &self,
        words: &[&WordEntry],
        quiz_mode: QuizMode,
        rng: &mut impl Rng,
    ) -> Result<Vec<Question>, DrillError> {
        words
            .iter()
            .map(|word| {
                generate_question(
                    word,
                    quiz_mode,
                    self.pool.category(word.part_of_speech),
                    self.pool.all_entries(),
                    rng,
                )
            })
            .collect()
    }

    /// The candidate pool for one category, restricted to words with a
    /// written form when the quiz asks for one.
    fn source_pool(&self, pos: PartOfSpeech, quiz_mode: QuizMode) -> Vec<&'a WordEntry> {
        match quiz_mode {
            QuizMode::GlossToWord => self.pool.with_surface(pos),
            _ => self.pool.category(pos).iter().collect(),
        }
    }
}
