use std::path::Path;

use content::legacy::legacy_modules;
use content::loader::FsContentSource;
use content::resolver::ContentResolver;
use course_core::model::{Lesson, Module, Quiz, Slug, UserProgress};

/// Page-facing access to resolved course content.
///
/// Content is resolved once at construction; everything here is an
/// in-memory lookup, so missing slugs surface as `None` rather than errors.
pub struct ContentService {
    resolver: ContentResolver,
}

impl ContentService {
    #[must_use]
    pub fn new(resolver: ContentResolver) -> Self {
        Self { resolver }
    }

    /// Resolves content from the filesystem root merged with the built-in
    /// modules.
    #[must_use]
    pub fn from_sources(content_root: &Path) -> Self {
        let mdx = FsContentSource::new(content_root).load_modules();
        Self::new(ContentResolver::resolve(mdx, legacy_modules()))
    }

    /// All modules in display order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        self.resolver.modules()
    }

    #[must_use]
    pub fn module_by_slug(&self, slug: &Slug) -> Option<&Module> {
        self.resolver.module_by_slug(slug)
    }

    #[must_use]
    pub fn lesson(&self, module_slug: &Slug, lesson_slug: &Slug) -> Option<&Lesson> {
        self.resolver.lesson(module_slug, lesson_slug)
    }

    /// Next lesson within the module; `None` after the final lesson, which
    /// hands the user over to the quiz.
    #[must_use]
    pub fn next_lesson(&self, module_slug: &Slug, lesson_slug: &Slug) -> Option<&Lesson> {
        self.resolver.next_lesson(module_slug, lesson_slug)
    }

    #[must_use]
    pub fn previous_lesson(&self, module_slug: &Slug, lesson_slug: &Slug) -> Option<&Lesson> {
        self.resolver.previous_lesson(module_slug, lesson_slug)
    }

    #[must_use]
    pub fn quiz_for_module(&self, slug: &Slug) -> Option<&Quiz> {
        self.resolver.module_by_slug(slug).map(|m| &m.quiz)
    }

    /// Whether the module's prerequisites are satisfied by the given
    /// progress document.
    #[must_use]
    pub fn is_module_unlocked(&self, slug: &Slug, progress: &UserProgress) -> bool {
        self.resolver
            .is_module_unlocked(slug, &progress.completed_module_ids())
    }

    /// Total number of modules, for stats denominators.
    #[must_use]
    pub fn total_modules(&self) -> u32 {
        u32::try_from(self.resolver.modules().len()).unwrap_or(u32::MAX)
    }

    /// Total number of lessons across all modules, for stats denominators.
    #[must_use]
    pub fn total_lessons(&self) -> u32 {
        u32::try_from(
            self.resolver
                .modules()
                .iter()
                .map(Module::lesson_count)
                .sum::<usize>(),
        )
        .unwrap_or(u32::MAX)
    }
}
