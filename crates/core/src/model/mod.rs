pub mod content;
mod ids;
mod progress;

pub use content::{Badge, ContentSource, Difficulty, Lesson, Module, Quiz, QuizQuestion};
pub use ids::{BadgeId, LessonId, ModuleId, Slug, UserId};

pub use progress::{
    CaseStudyProgress, CaseStudyResponse, CurrentPosition, LessonProgress, ModuleProgress,
    ProgressError, QuizAnswer, QuizAttempt, Streak, Totals, UserProgress,
};
