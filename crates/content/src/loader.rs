use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use course_core::model::{
    Badge, ContentSource, Difficulty, Lesson, LessonId, Module, ModuleId, Quiz, QuizQuestion, Slug,
};

use crate::frontmatter;
use crate::markdown;

/// Filesystem-backed content source.
///
/// Layout under the root: one directory per module holding `metadata.json`,
/// `quiz.json`, and a `lessons/` directory of `.md`/`.mdx` files with YAML
/// frontmatter.
///
/// Loading never fails as a whole: a module with unusable metadata is
/// skipped, a missing quiz file degrades to the placeholder quiz, and an
/// unreadable lesson is filtered out. All of it is logged, none of it is
/// fatal.
pub struct FsContentSource {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleMetadata {
    id: String,
    slug: String,
    order: u32,
    title: String,
    #[serde(default)]
    description: String,
    difficulty: Difficulty,
    #[serde(default)]
    estimated_hours: f32,
    badge: Badge,
    #[serde(default)]
    learning_objectives: Vec<String>,
    #[serde(default)]
    prerequisites: Vec<Slug>,
    #[serde(default)]
    password_protected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizFile {
    passing_score: u8,
    #[serde(default)]
    questions: Vec<QuizQuestionFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizQuestionFile {
    id: String,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
    #[serde(default)]
    explanation: Option<String>,
}

impl FsContentSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Enumerates and loads every module directory under the root.
    #[must_use]
    pub fn load_modules(&self) -> Vec<Module> {
        let mut modules = Vec::new();
        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "content root not present; no mdx modules");
            return modules;
        }

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable content entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(module) = self.load_module(entry.path()) {
                modules.push(module);
            }
        }

        modules
    }

    fn load_module(&self, dir: &Path) -> Option<Module> {
        let metadata_path = dir.join("metadata.json");
        let raw = match fs::read_to_string(&metadata_path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %metadata_path.display(), error = %e, "module metadata unreadable; skipping module");
                return None;
            }
        };
        let metadata: ModuleMetadata = match serde_json::from_str(&raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %metadata_path.display(), error = %e, "module metadata invalid; skipping module");
                return None;
            }
        };

        let quiz = load_quiz(&dir.join("quiz.json"));
        let mut lessons = load_lessons(&dir.join("lessons"));
        lessons.sort_by_key(|l| l.order);

        Some(Module {
            id: ModuleId::new(metadata.id),
            slug: Slug::new(metadata.slug),
            order: metadata.order,
            title: metadata.title,
            description: metadata.description,
            difficulty: metadata.difficulty,
            estimated_hours: metadata.estimated_hours,
            badge: metadata.badge,
            learning_objectives: metadata.learning_objectives,
            prerequisites: metadata.prerequisites,
            password_protected: metadata.password_protected,
            source: ContentSource::Mdx,
            lessons,
            quiz,
        })
    }
}

fn load_quiz(path: &Path) -> Quiz {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            debug!(path = %path.display(), "no quiz file; using placeholder quiz");
            return Quiz::default();
        }
    };
    match serde_json::from_str::<QuizFile>(&raw) {
        Ok(file) => Quiz {
            passing_score: file.passing_score,
            questions: file
                .questions
                .into_iter()
                .map(|q| QuizQuestion {
                    id: q.id,
                    prompt: q.prompt,
                    options: q.options,
                    correct_option: q.correct_option,
                    explanation: q.explanation,
                })
                .collect(),
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "quiz file invalid; using placeholder quiz");
            Quiz::default()
        }
    }
}

fn load_lessons(dir: &Path) -> Vec<Lesson> {
    let mut lessons = Vec::new();
    if !dir.is_dir() {
        debug!(path = %dir.display(), "module has no lessons directory");
        return lessons;
    }

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable lesson entry");
                continue;
            }
        };
        let path = entry.path();
        let is_lesson_file = entry.file_type().is_file()
            && matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("md" | "mdx")
            );
        if !is_lesson_file {
            continue;
        }
        if let Some(lesson) = load_lesson(path) {
            lessons.push(lesson);
        }
    }

    lessons
}

fn load_lesson(path: &Path) -> Option<Lesson> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "lesson unreadable; filtered out");
            return None;
        }
    };
    let (fm, body) = match frontmatter::parse_lesson_file(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "lesson frontmatter invalid; filtered out");
            return None;
        }
    };

    let html = markdown::render(&body);
    Some(Lesson {
        id: LessonId::new(fm.slug.clone()),
        slug: Slug::new(fm.slug),
        order: fm.order,
        title: fm.title,
        description: fm.description,
        duration_minutes: fm.duration,
        key_takeaways: fm.key_takeaways,
        prerequisites: fm.prerequisites,
        body,
        html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const METADATA: &str = r#"{
        "id": "zero-trust",
        "slug": "zero-trust",
        "order": 3,
        "title": "Zero Trust Architecture",
        "description": "Never trust, always verify",
        "difficulty": "advanced",
        "estimatedHours": 3.5,
        "badge": {
            "id": "zero-trust-badge",
            "title": "Perimeter Breaker",
            "description": "Completed Zero Trust Architecture"
        },
        "learningObjectives": ["Describe policy enforcement points"],
        "prerequisites": ["auth-fundamentals"]
    }"#;

    const QUIZ: &str = r#"{
        "passingScore": 75,
        "questions": [
            {
                "id": "q1",
                "prompt": "Where does a zero-trust network place its perimeter?",
                "options": ["At the VPN", "Around every resource", "Nowhere"],
                "correctOption": 1
            }
        ]
    }"#;

    const LESSON: &str = "---\ntitle: Policy Engines\nslug: policy-engines\norder: 1\nduration: 8\n---\n# Policy Engines\n\nDecisions move to a central engine.\n";

    fn write_module(root: &Path) {
        let dir = root.join("zero-trust");
        fs::create_dir_all(dir.join("lessons")).unwrap();
        fs::write(dir.join("metadata.json"), METADATA).unwrap();
        fs::write(dir.join("quiz.json"), QUIZ).unwrap();
        fs::write(dir.join("lessons/01-policy-engines.mdx"), LESSON).unwrap();
    }

    #[test]
    fn loads_module_with_lessons_and_quiz() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path());

        let modules = FsContentSource::new(tmp.path()).load_modules();
        assert_eq!(modules.len(), 1);

        let module = &modules[0];
        assert_eq!(module.id, ModuleId::new("zero-trust"));
        assert_eq!(module.source, ContentSource::Mdx);
        assert_eq!(module.quiz.passing_score, 75);
        assert_eq!(module.lessons.len(), 1);
        assert_eq!(module.lessons[0].slug, Slug::new("policy-engines"));
        assert!(module.lessons[0].html.contains("<h1>Policy Engines</h1>"));
    }

    #[test]
    fn missing_quiz_degrades_to_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path());
        fs::remove_file(tmp.path().join("zero-trust/quiz.json")).unwrap();

        let modules = FsContentSource::new(tmp.path()).load_modules();
        assert_eq!(modules[0].quiz.passing_score, Quiz::DEFAULT_PASSING_SCORE);
        assert!(modules[0].quiz.questions.is_empty());
    }

    #[test]
    fn invalid_lesson_is_filtered_out() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path());
        fs::write(
            tmp.path().join("zero-trust/lessons/02-broken.mdx"),
            "no frontmatter here",
        )
        .unwrap();

        let modules = FsContentSource::new(tmp.path()).load_modules();
        assert_eq!(modules[0].lessons.len(), 1);
    }

    #[test]
    fn module_without_metadata_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path());
        fs::create_dir_all(tmp.path().join("orphan/lessons")).unwrap();

        let modules = FsContentSource::new(tmp.path()).load_modules();
        assert_eq!(modules.len(), 1);
    }

    #[test]
    fn absent_root_yields_no_modules() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = FsContentSource::new(tmp.path().join("does-not-exist")).load_modules();
        assert!(modules.is_empty());
    }

    #[test]
    fn lessons_sort_by_order_not_filename() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path());
        fs::write(
            tmp.path().join("zero-trust/lessons/00-later.mdx"),
            "---\ntitle: Microsegmentation\nslug: microsegmentation\norder: 2\n---\nbody",
        )
        .unwrap();

        let modules = FsContentSource::new(tmp.path()).load_modules();
        let slugs: Vec<&str> = modules[0].lessons.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(slugs, vec!["policy-engines", "microsegmentation"]);
    }
}
