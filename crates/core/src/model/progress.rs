use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::{BadgeId, LessonId, ModuleId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("quiz score {0} is out of range (expected 0-100)")]
    ScoreOutOfRange(u8),
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Root aggregate of all learning state for one anonymous user.
///
/// This is the single document persisted under the progress storage key, so
/// field names serialize in the stored camelCase layout. Mutations go through
/// the methods below, which maintain the counters, the streak, and the
/// per-module invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub module_progress: BTreeMap<ModuleId, ModuleProgress>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub badges_earned: Vec<BadgeId>,
    #[serde(default)]
    pub case_studies: BTreeMap<ModuleId, CaseStudyProgress>,
    #[serde(default)]
    pub current_position: Option<CurrentPosition>,
    #[serde(default)]
    pub streak: Streak,
}

/// Global counters across all modules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub lessons_completed: u32,
    pub quizzes_passed: u32,
    pub time_spent_minutes: u32,
}

/// Last lesson the user touched, for resume-where-you-left-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPosition {
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
}

/// Consecutive-day activity streak, folded on every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current_days: u32,
    pub longest_days: u32,
    pub last_day: Option<NaiveDate>,
}

impl Streak {
    /// Folds an activity day into the streak.
    ///
    /// Same day is a no-op; the next calendar day extends the streak; any
    /// gap restarts it at 1.
    pub fn record_day(&mut self, day: NaiveDate) {
        match self.last_day {
            Some(last) if last == day => return,
            Some(last) if last.succ_opt() == Some(day) => {
                self.current_days += 1;
            }
            _ => {
                self.current_days = 1;
            }
        }
        self.longest_days = self.longest_days.max(self.current_days);
        self.last_day = Some(day);
    }
}

//
// ─── PER-MODULE STATE ──────────────────────────────────────────────────────────
//

/// Learning state for one module, created lazily on first lesson completion
/// or quiz attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub started: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lesson_progress: BTreeMap<LessonId, LessonProgress>,
    #[serde(default)]
    pub quiz_attempts: Vec<QuizAttempt>,
    #[serde(default)]
    pub best_quiz_score: u8,
    #[serde(default)]
    pub quiz_passed: bool,
    #[serde(default)]
    pub badge_earned: bool,
    #[serde(default)]
    pub time_spent_minutes: u32,
}

impl ModuleProgress {
    fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            started: true,
            started_at: Some(now),
            ..Self::default()
        }
    }

    /// Number of lessons completed within this module.
    #[must_use]
    pub fn completed_lessons(&self) -> u32 {
        u32::try_from(
            self.lesson_progress
                .values()
                .filter(|l| l.completed)
                .count(),
        )
        .unwrap_or(u32::MAX)
    }
}

/// Completion state for a single lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent_minutes: u32,
}

/// One quiz attempt. Immutable once appended; attempt numbers are assigned
/// sequentially per module starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub attempt_number: u32,
    pub score: u8,
    pub passed: bool,
    pub answers: Vec<QuizAnswer>,
    pub completed_at: DateTime<Utc>,
}

/// Per-question answer recorded with an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub selected_option: usize,
    pub correct: bool,
}

/// Free-text case-study work for one module, keyed by lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyProgress {
    #[serde(default)]
    pub responses: BTreeMap<LessonId, CaseStudyResponse>,
}

/// One saved case-study response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyResponse {
    pub response: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

//
// ─── MUTATIONS ─────────────────────────────────────────────────────────────────
//

impl UserProgress {
    /// Creates an empty progress document for the given user.
    #[must_use]
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            created_at: now,
            last_active: now,
            module_progress: BTreeMap::new(),
            totals: Totals::default(),
            badges_earned: Vec::new(),
            case_studies: BTreeMap::new(),
            current_position: None,
            streak: Streak::default(),
        }
    }

    /// Returns a fresh empty document preserving this user's id.
    #[must_use]
    pub fn reset(&self, now: DateTime<Utc>) -> Self {
        Self::new(self.user_id.clone(), now)
    }

    /// Marks a lesson complete and accumulates time spent.
    ///
    /// Re-completing a lesson refreshes its timestamp and time-spent value
    /// and still accumulates the new time into module and global totals, but
    /// the global lessons-completed counter only moves on the first
    /// transition to completed.
    pub fn complete_lesson(
        &mut self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        time_spent_minutes: u32,
        now: DateTime<Utc>,
    ) {
        self.touch(now);

        let module = self.ensure_module(module_id, now);
        let lesson = module.lesson_progress.entry(lesson_id.clone()).or_default();

        let first_completion = !lesson.completed;
        lesson.completed = true;
        lesson.completed_at = Some(now);
        lesson.time_spent_minutes = time_spent_minutes;

        module.time_spent_minutes += time_spent_minutes;
        self.totals.time_spent_minutes += time_spent_minutes;
        if first_completion {
            self.totals.lessons_completed += 1;
        }

        self.current_position = Some(CurrentPosition {
            module_id: module_id.clone(),
            lesson_id: lesson_id.clone(),
        });
    }

    /// Appends a quiz attempt and returns its attempt number.
    ///
    /// `best_quiz_score` only ever moves up. The global quizzes-passed
    /// counter increments exactly once per module, on the first passing
    /// attempt, tracked by the module's own `quiz_passed` flag rather than
    /// the badge-driven `completed` flag.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreOutOfRange` if `score` exceeds 100.
    pub fn record_quiz_attempt(
        &mut self,
        module_id: &ModuleId,
        score: u8,
        passed: bool,
        answers: Vec<QuizAnswer>,
        now: DateTime<Utc>,
    ) -> Result<u32, ProgressError> {
        if score > 100 {
            return Err(ProgressError::ScoreOutOfRange(score));
        }
        self.touch(now);

        let module = self.ensure_module(module_id, now);
        let attempt_number = u32::try_from(module.quiz_attempts.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        module.quiz_attempts.push(QuizAttempt {
            attempt_number,
            score,
            passed,
            answers,
            completed_at: now,
        });

        module.best_quiz_score = module.best_quiz_score.max(score);
        if passed && !module.quiz_passed {
            module.quiz_passed = true;
            self.totals.quizzes_passed += 1;
        }

        Ok(attempt_number)
    }

    /// Awards a badge and marks the module completed.
    ///
    /// Idempotent: awarding the same badge again changes nothing beyond
    /// `last_active`.
    pub fn award_badge(&mut self, module_id: &ModuleId, badge_id: &BadgeId, now: DateTime<Utc>) {
        self.touch(now);

        let module = self.ensure_module(module_id, now);
        module.badge_earned = true;
        if !module.completed {
            module.completed = true;
            module.completed_at = Some(now);
        }

        if !self.badges_earned.contains(badge_id) {
            self.badges_earned.push(badge_id.clone());
        }
    }

    /// Saves (or overwrites) a free-text case-study response.
    pub fn save_case_study_response(
        &mut self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        response: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.touch(now);

        let entry = self
            .case_studies
            .entry(module_id.clone())
            .or_default()
            .responses
            .entry(lesson_id.clone())
            .or_default();
        entry.response = response.into();
        entry.last_modified = Some(now);
    }

    /// Marks a case study complete, keeping whatever response text exists.
    pub fn complete_case_study(
        &mut self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        now: DateTime<Utc>,
    ) {
        self.touch(now);

        let entry = self
            .case_studies
            .entry(module_id.clone())
            .or_default()
            .responses
            .entry(lesson_id.clone())
            .or_default();
        entry.completed_at = Some(now);
    }

    /// Ids of modules the user has completed, in map order.
    #[must_use]
    pub fn completed_module_ids(&self) -> Vec<ModuleId> {
        self.module_progress
            .iter()
            .filter(|(_, m)| m.completed)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
        self.streak.record_day(now.date_naive());
    }

    fn ensure_module(&mut self, module_id: &ModuleId, now: DateTime<Utc>) -> &mut ModuleProgress {
        self.module_progress
            .entry(module_id.clone())
            .or_insert_with(|| ModuleProgress::started_at(now))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
