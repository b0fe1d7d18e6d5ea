use crate::model::ids::{LessonId, Slug};

/// A single content unit within a module.
///
/// `body` is the raw markdown; `html` is rendered once at load time so page
/// code never touches the markdown pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub slug: Slug,
    pub order: u32,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub key_takeaways: Vec<String>,
    pub prerequisites: Vec<String>,
    pub body: String,
    pub html: String,
}
