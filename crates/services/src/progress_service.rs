use std::sync::Arc;

use tracing::warn;

use course_core::model::{BadgeId, LessonId, ModuleId, QuizAnswer, UserId, UserProgress};
use storage::repository::{keys, ProgressStore};

use crate::error::ProgressServiceError;
use crate::Clock;

/// Orchestrates progress mutations over the document store.
///
/// Every operation is a read-modify-write of the single progress document;
/// the aggregate in `course-core` owns the state machine, this service owns
/// persistence and the never-fail read semantics.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    documents: Arc<dyn ProgressStore>,
}

/// Aggregate counts for the dashboard view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LearningStats {
    pub completed_modules: u32,
    pub completed_lessons: u32,
    pub quizzes_passed: u32,
    pub badges: u32,
    pub time_spent_minutes: u32,
    pub current_streak_days: u32,
    /// Share of all lessons completed, as a whole percentage.
    pub overall_progress: u8,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, documents: Arc<dyn ProgressStore>) -> Self {
        Self { clock, documents }
    }

    /// Returns the current progress document, creating one if needed.
    ///
    /// Absent storage yields a fresh document under a newly generated user
    /// id. A stored document that no longer parses is replaced with a fresh
    /// one; the prior state is not recoverable and no error is raised.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` only if the backend itself
    /// cannot be reached.
    pub async fn get_user_progress(&self) -> Result<UserProgress, ProgressServiceError> {
        match self.documents.read(keys::PROGRESS).await? {
            Some(raw) => match serde_json::from_str::<UserProgress>(&raw) {
                Ok(progress) => Ok(progress),
                Err(e) => {
                    warn!(error = %e, "stored progress document unreadable; replacing with a fresh one");
                    self.fresh_document().await
                }
            },
            None => self.fresh_document().await,
        }
    }

    /// Marks a lesson complete and returns the updated document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn complete_lesson(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        time_spent_minutes: u32,
    ) -> Result<UserProgress, ProgressServiceError> {
        let mut progress = self.get_user_progress().await?;
        progress.complete_lesson(module_id, lesson_id, time_spent_minutes, self.clock.now());
        self.save(&progress).await?;
        Ok(progress)
    }

    /// Appends a quiz attempt and returns its attempt number with the
    /// updated document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for an out-of-range score.
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn record_quiz_attempt(
        &self,
        module_id: &ModuleId,
        score: u8,
        passed: bool,
        answers: Vec<QuizAnswer>,
    ) -> Result<(UserProgress, u32), ProgressServiceError> {
        let mut progress = self.get_user_progress().await?;
        let attempt_number =
            progress.record_quiz_attempt(module_id, score, passed, answers, self.clock.now())?;
        self.save(&progress).await?;
        Ok((progress, attempt_number))
    }

    /// Awards a badge, marking the module completed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn award_badge(
        &self,
        module_id: &ModuleId,
        badge_id: &BadgeId,
    ) -> Result<UserProgress, ProgressServiceError> {
        let mut progress = self.get_user_progress().await?;
        progress.award_badge(module_id, badge_id, self.clock.now());
        self.save(&progress).await?;
        Ok(progress)
    }

    /// Saves a free-text case-study response.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn save_case_study_response(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        response: impl Into<String> + Send,
    ) -> Result<UserProgress, ProgressServiceError> {
        let mut progress = self.get_user_progress().await?;
        progress.save_case_study_response(module_id, lesson_id, response, self.clock.now());
        self.save(&progress).await?;
        Ok(progress)
    }

    /// Marks a case study complete.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn complete_case_study(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
    ) -> Result<UserProgress, ProgressServiceError> {
        let mut progress = self.get_user_progress().await?;
        progress.complete_case_study(module_id, lesson_id, self.clock.now());
        self.save(&progress).await?;
        Ok(progress)
    }

    /// Replaces the document with an empty one, keeping the user id.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn reset_progress(&self) -> Result<UserProgress, ProgressServiceError> {
        let progress = self.get_user_progress().await?;
        let fresh = progress.reset(self.clock.now());
        self.save(&fresh).await?;
        Ok(fresh)
    }

    /// Aggregates the document into dashboard counters.
    ///
    /// `overall_progress` is the whole-percentage share of `total_lessons`
    /// completed, clamped to 100.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend cannot be
    /// reached.
    pub async fn get_learning_stats(
        &self,
        total_modules: u32,
        total_lessons: u32,
    ) -> Result<LearningStats, ProgressServiceError> {
        let progress = self.get_user_progress().await?;

        let completed_modules = u32::try_from(
            progress
                .module_progress
                .values()
                .filter(|m| m.completed)
                .count(),
        )
        .unwrap_or(u32::MAX)
        .min(total_modules);
        let completed_lessons = progress.totals.lessons_completed;

        let overall_progress = if total_lessons == 0 {
            0
        } else {
            let percent = (u64::from(completed_lessons) * 100) / u64::from(total_lessons);
            u8::try_from(percent.min(100)).unwrap_or(100)
        };

        Ok(LearningStats {
            completed_modules,
            completed_lessons,
            quizzes_passed: progress.totals.quizzes_passed,
            badges: u32::try_from(progress.badges_earned.len()).unwrap_or(u32::MAX),
            time_spent_minutes: progress.totals.time_spent_minutes,
            current_streak_days: progress.streak.current_days,
            overall_progress,
        })
    }

    async fn fresh_document(&self) -> Result<UserProgress, ProgressServiceError> {
        let user_id = self.ensure_user_id().await?;
        let fresh = UserProgress::new(user_id, self.clock.now());
        self.save(&fresh).await?;
        Ok(fresh)
    }

    /// Reuses the persisted user id if one exists, otherwise generates and
    /// persists a new one.
    async fn ensure_user_id(&self) -> Result<UserId, ProgressServiceError> {
        if let Some(existing) = self.documents.read(keys::USER_ID).await? {
            return Ok(UserId::new(existing));
        }
        let user_id = UserId::generate();
        self.documents.write(keys::USER_ID, user_id.as_str()).await?;
        Ok(user_id)
    }

    async fn save(&self, progress: &UserProgress) -> Result<(), ProgressServiceError> {
        let raw = serde_json::to_string(progress)
            .map_err(|e| storage::repository::StorageError::Serialization(e.to_string()))?;
        self.documents.write(keys::PROGRESS, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::{fixed_clock, fixed_now};
    use storage::repository::MemoryStore;

    fn service() -> (ProgressService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            ProgressService::new(fixed_clock(), store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn first_read_synthesizes_and_persists_a_document() {
        let (service, store) = service();

        let progress = service.get_user_progress().await.unwrap();
        assert_eq!(progress.created_at, fixed_now());
        assert_eq!(progress.totals.lessons_completed, 0);

        // Both keys are now populated.
        assert!(store.read(keys::PROGRESS).await.unwrap().is_some());
        assert_eq!(
            store.read(keys::USER_ID).await.unwrap().as_deref(),
            Some(progress.user_id.as_str())
        );
    }

    #[tokio::test]
    async fn user_id_is_stable_across_reads() {
        let (service, _) = service();
        let first = service.get_user_progress().await.unwrap();
        let second = service.get_user_progress().await.unwrap();
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn corrupt_document_is_replaced_with_fresh_state() {
        let (service, store) = service();
        let original = service.get_user_progress().await.unwrap();

        store
            .write(keys::PROGRESS, "{not even close to json")
            .await
            .unwrap();

        let replaced = service.get_user_progress().await.unwrap();
        assert_eq!(replaced.totals.lessons_completed, 0);
        // The separately stored id survives the corruption.
        assert_eq!(replaced.user_id, original.user_id);
        // And the replacement is durable.
        let raw = store.read(keys::PROGRESS).await.unwrap().unwrap();
        assert!(serde_json::from_str::<UserProgress>(&raw).is_ok());
    }

    #[tokio::test]
    async fn reset_round_trips_with_same_user_id() {
        let (service, _) = service();
        let module = ModuleId::new("auth-fundamentals");
        service
            .complete_lesson(&module, &LessonId::new("what-is-identity"), 10)
            .await
            .unwrap();

        let before = service.get_user_progress().await.unwrap();
        let reset = service.reset_progress().await.unwrap();
        let after = service.get_user_progress().await.unwrap();

        assert_eq!(reset.user_id, before.user_id);
        assert_eq!(after.user_id, before.user_id);
        assert_eq!(after.totals.lessons_completed, 0);
        assert!(after.module_progress.is_empty());
    }

    #[tokio::test]
    async fn stats_scenario_five_of_five_lessons_is_full_progress() {
        let (service, _) = service();
        let module = ModuleId::new("auth-fundamentals");
        let lessons = [
            "what-is-identity",
            "authentication-vs-authorization",
            "passwords-and-beyond",
            "sessions-and-cookies",
            "multi-factor-authentication",
        ];
        for slug in lessons {
            service
                .complete_lesson(&module, &LessonId::new(slug), 10)
                .await
                .unwrap();
        }

        let stats = service.get_learning_stats(1, 5).await.unwrap();
        assert_eq!(stats.completed_lessons, 5);
        assert_eq!(stats.overall_progress, 100);
        assert_eq!(stats.completed_modules, 0);
        assert_eq!(stats.time_spent_minutes, 50);
    }

    #[tokio::test]
    async fn quiz_fail_then_pass_counts_one_pass() {
        let (service, _) = service();
        let module = ModuleId::new("oauth-deep-dive");

        let (_, first) = service
            .record_quiz_attempt(&module, 60, false, vec![])
            .await
            .unwrap();
        let (progress, second) = service
            .record_quiz_attempt(&module, 85, true, vec![])
            .await
            .unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(progress.module_progress[&module].best_quiz_score, 85);
        assert_eq!(progress.totals.quizzes_passed, 1);

        let stats = service.get_learning_stats(2, 9).await.unwrap();
        assert_eq!(stats.quizzes_passed, 1);
    }

    #[tokio::test]
    async fn invalid_score_surfaces_progress_error() {
        let (service, store) = service();
        let err = service
            .record_quiz_attempt(&ModuleId::new("m"), 130, true, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::Progress(_)));

        // The rejected attempt left no trace.
        let raw = store.read(keys::PROGRESS).await.unwrap().unwrap();
        let stored: UserProgress = serde_json::from_str(&raw).unwrap();
        assert!(stored.module_progress.is_empty());
    }

    #[tokio::test]
    async fn stats_handle_zero_totals() {
        let (service, _) = service();
        let stats = service.get_learning_stats(0, 0).await.unwrap();
        assert_eq!(stats.overall_progress, 0);
    }
}
