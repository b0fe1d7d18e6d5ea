use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::content::{Lesson, Quiz};
use crate::model::ids::{BadgeId, ModuleId, Slug};

//
// ─── MODULE TYPES ──────────────────────────────────────────────────────────────
//

/// Where a resolved module came from.
///
/// Resolved exactly once at load time; downstream code never branches on the
/// source again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Mdx,
    Legacy,
}

/// Course difficulty tier shown on module cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{label}")
    }
}

/// Achievement descriptor awarded when a module's quiz is passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    pub title: String,
    pub description: String,
}

/// A top-level course unit: ordered lessons plus a quiz.
///
/// `id` keys progress tracking; `slug` keys page routing. Metadata fields
/// mirror the per-module metadata file, including the password-gate marker
/// (the gate itself is a host concern).
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: ModuleId,
    pub slug: Slug,
    pub order: u32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_hours: f32,
    pub badge: Badge,
    pub learning_objectives: Vec<String>,
    pub prerequisites: Vec<Slug>,
    pub password_protected: bool,
    pub source: ContentSource,
    pub lessons: Vec<Lesson>,
    pub quiz: Quiz,
}

impl Module {
    /// Finds a lesson by its routing slug.
    #[must_use]
    pub fn lesson_by_slug(&self, slug: &Slug) -> Option<&Lesson> {
        self.lessons.iter().find(|l| &l.slug == slug)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_module() -> Module {
        Module {
            id: ModuleId::new("auth-fundamentals"),
            slug: Slug::new("auth-fundamentals"),
            order: 1,
            title: "Authentication Fundamentals".to_string(),
            description: "Identity basics".to_string(),
            difficulty: Difficulty::Beginner,
            estimated_hours: 2.0,
            badge: Badge {
                id: BadgeId::new("auth-fundamentals-badge"),
                title: "Identity Apprentice".to_string(),
                description: "Completed Authentication Fundamentals".to_string(),
            },
            learning_objectives: vec!["Explain authn vs authz".to_string()],
            prerequisites: vec![],
            password_protected: false,
            source: ContentSource::Legacy,
            lessons: vec![Lesson {
                id: crate::model::LessonId::new("what-is-identity"),
                slug: Slug::new("what-is-identity"),
                order: 1,
                title: "What is Identity?".to_string(),
                description: String::new(),
                duration_minutes: 10,
                key_takeaways: vec![],
                prerequisites: vec![],
                body: String::new(),
                html: String::new(),
            }],
            quiz: Quiz::default(),
        }
    }

    #[test]
    fn lesson_lookup_by_slug() {
        let module = build_module();
        let found = module.lesson_by_slug(&Slug::new("what-is-identity"));
        assert!(found.is_some());
        assert!(module.lesson_by_slug(&Slug::new("missing")).is_none());
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
    }
}
