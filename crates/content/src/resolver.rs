use std::collections::HashSet;

use course_core::model::{Lesson, Module, ModuleId, Slug};

/// Unified, order-stable view over both content sources.
///
/// Built once at load time. Filesystem modules are enumerated before legacy
/// ones, so on a slug collision the filesystem entry wins and the legacy
/// entry is dropped. The merged list is sorted by `order` with a stable
/// sort: equal orders keep enumeration order.
pub struct ContentResolver {
    modules: Vec<Module>,
}

impl ContentResolver {
    /// Merges the two sources into a canonical module list.
    #[must_use]
    pub fn resolve(mdx_modules: Vec<Module>, legacy_modules: Vec<Module>) -> Self {
        let mut seen: HashSet<Slug> = HashSet::new();
        let mut merged: Vec<Module> = Vec::with_capacity(mdx_modules.len() + legacy_modules.len());

        for module in mdx_modules.into_iter().chain(legacy_modules) {
            if seen.insert(module.slug.clone()) {
                merged.push(module);
            }
        }

        merged.sort_by_key(|m| m.order);
        for module in &mut merged {
            module.lessons.sort_by_key(|l| l.order);
        }

        Self { modules: merged }
    }

    /// All modules in display order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn module_by_slug(&self, slug: &Slug) -> Option<&Module> {
        self.modules.iter().find(|m| &m.slug == slug)
    }

    #[must_use]
    pub fn module_by_id(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == id)
    }

    /// Looks up a lesson within a module by routing slugs.
    #[must_use]
    pub fn lesson(&self, module_slug: &Slug, lesson_slug: &Slug) -> Option<&Lesson> {
        self.module_by_slug(module_slug)?.lesson_by_slug(lesson_slug)
    }

    /// The lesson after the given one within the same module.
    ///
    /// Returns `None` for the final lesson: the module deliberately ends at
    /// its quiz rather than rolling into the next module.
    #[must_use]
    pub fn next_lesson(&self, module_slug: &Slug, lesson_slug: &Slug) -> Option<&Lesson> {
        let module = self.module_by_slug(module_slug)?;
        let index = module.lessons.iter().position(|l| &l.slug == lesson_slug)?;
        module.lessons.get(index + 1)
    }

    /// The lesson before the given one within the same module, if any.
    #[must_use]
    pub fn previous_lesson(&self, module_slug: &Slug, lesson_slug: &Slug) -> Option<&Lesson> {
        let module = self.module_by_slug(module_slug)?;
        let index = module.lessons.iter().position(|l| &l.slug == lesson_slug)?;
        index.checked_sub(1).and_then(|i| module.lessons.get(i))
    }

    /// Whether every prerequisite of the module has been completed.
    ///
    /// A prerequisite slug that resolves to no module is ignored rather
    /// than locking the module forever.
    #[must_use]
    pub fn is_module_unlocked(&self, slug: &Slug, completed: &[ModuleId]) -> bool {
        let Some(module) = self.module_by_slug(slug) else {
            return false;
        };
        module
            .prerequisites
            .iter()
            .filter_map(|prereq| self.module_by_slug(prereq))
            .all(|prereq| completed.contains(&prereq.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::legacy_modules;
    use course_core::model::{Badge, BadgeId, ContentSource, Difficulty, Quiz};

    fn bare_module(slug: &str, order: u32, source: ContentSource, title: &str) -> Module {
        Module {
            id: ModuleId::new(slug),
            slug: Slug::new(slug),
            order,
            title: title.to_string(),
            description: String::new(),
            difficulty: Difficulty::Beginner,
            estimated_hours: 1.0,
            badge: Badge {
                id: BadgeId::new(format!("{slug}-badge")),
                title: String::new(),
                description: String::new(),
            },
            learning_objectives: vec![],
            prerequisites: vec![],
            password_protected: false,
            source,
            lessons: vec![],
            quiz: Quiz::default(),
        }
    }

    #[test]
    fn mdx_wins_on_slug_collision() {
        let mdx = vec![bare_module(
            "auth-fundamentals",
            1,
            ContentSource::Mdx,
            "Auth Fundamentals (rewritten)",
        )];
        let resolver = ContentResolver::resolve(mdx, legacy_modules());

        let module = resolver
            .module_by_slug(&Slug::new("auth-fundamentals"))
            .unwrap();
        assert_eq!(module.source, ContentSource::Mdx);
        assert_eq!(module.title, "Auth Fundamentals (rewritten)");
        // The legacy sibling is still present.
        assert!(resolver.module_by_slug(&Slug::new("oauth-deep-dive")).is_some());
    }

    #[test]
    fn modules_sort_by_order_with_stable_ties() {
        let mdx = vec![bare_module("m-b", 2, ContentSource::Mdx, "B")];
        let legacy = vec![
            bare_module("m-c", 2, ContentSource::Legacy, "C"),
            bare_module("m-a", 1, ContentSource::Legacy, "A"),
        ];
        let resolver = ContentResolver::resolve(mdx, legacy);

        let slugs: Vec<&str> = resolver.modules().iter().map(|m| m.slug.as_str()).collect();
        // Equal order 2: the mdx entry was enumerated first and stays first.
        assert_eq!(slugs, vec!["m-a", "m-b", "m-c"]);
    }

    #[test]
    fn final_lesson_has_no_next() {
        let resolver = ContentResolver::resolve(vec![], legacy_modules());
        let module_slug = Slug::new("auth-fundamentals");

        let next = resolver.next_lesson(&module_slug, &Slug::new("multi-factor-authentication"));
        assert!(next.is_none());

        let next = resolver.next_lesson(&module_slug, &Slug::new("what-is-identity"));
        assert_eq!(
            next.unwrap().slug,
            Slug::new("authentication-vs-authorization")
        );
    }

    #[test]
    fn first_lesson_has_no_previous() {
        let resolver = ContentResolver::resolve(vec![], legacy_modules());
        let module_slug = Slug::new("auth-fundamentals");

        assert!(resolver
            .previous_lesson(&module_slug, &Slug::new("what-is-identity"))
            .is_none());
        assert_eq!(
            resolver
                .previous_lesson(&module_slug, &Slug::new("sessions-and-cookies"))
                .unwrap()
                .slug,
            Slug::new("passwords-and-beyond")
        );
    }

    #[test]
    fn unknown_slugs_resolve_to_none() {
        let resolver = ContentResolver::resolve(vec![], legacy_modules());
        assert!(resolver.module_by_slug(&Slug::new("missing")).is_none());
        assert!(resolver
            .lesson(&Slug::new("auth-fundamentals"), &Slug::new("missing"))
            .is_none());
        assert!(resolver
            .next_lesson(&Slug::new("missing"), &Slug::new("missing"))
            .is_none());
    }

    #[test]
    fn unlock_requires_completed_prerequisites() {
        let resolver = ContentResolver::resolve(vec![], legacy_modules());
        let oauth = Slug::new("oauth-deep-dive");

        assert!(!resolver.is_module_unlocked(&oauth, &[]));
        assert!(resolver.is_module_unlocked(&oauth, &[ModuleId::new("auth-fundamentals")]));
        // A module without prerequisites is always unlocked.
        assert!(resolver.is_module_unlocked(&Slug::new("auth-fundamentals"), &[]));
    }

    #[test]
    fn dangling_prerequisite_does_not_lock_module() {
        let mut module = bare_module("edge", 9, ContentSource::Legacy, "Edge");
        module.prerequisites = vec![Slug::new("never-published")];
        let resolver = ContentResolver::resolve(vec![], vec![module]);

        assert!(resolver.is_module_unlocked(&Slug::new("edge"), &[]));
    }
}
