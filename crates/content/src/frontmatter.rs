use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrontmatterError {
    #[error("lesson file has no frontmatter block")]
    Missing,

    #[error("unclosed frontmatter delimiter")]
    Unclosed,

    #[error("invalid frontmatter: {0}")]
    Invalid(String),
}

/// Per-lesson frontmatter as written in the `.mdx` files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonFrontmatter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    /// Estimated reading time in minutes.
    #[serde(default)]
    pub duration: u32,
    pub order: u32,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

/// Splits a lesson file into parsed frontmatter and the markdown body.
///
/// Only the `---` delimiter is recognized; a file without an opening
/// delimiter has no frontmatter and is rejected rather than guessed at.
///
/// # Errors
///
/// Returns `FrontmatterError` if the block is missing, unclosed, or not
/// valid YAML for [`LessonFrontmatter`].
pub fn parse_lesson_file(content: &str) -> Result<(LessonFrontmatter, String), FrontmatterError> {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return Err(FrontmatterError::Missing);
    };

    let Some((yaml, body)) = rest.split_once("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let frontmatter: LessonFrontmatter =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::Invalid(e.to_string()))?;

    // Drop the delimiter's trailing newline so the body starts at its first
    // real line.
    let body = body.strip_prefix('\n').unwrap_or(body);
    Ok((frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LESSON: &str = r"---
title: Token Introspection
description: How resource servers validate opaque tokens
slug: token-introspection
duration: 12
order: 3
keyTakeaways:
  - Introspection trades latency for revocation accuracy
---
# Token Introspection

Opaque tokens mean the resource server must ask the issuer.
";

    #[test]
    fn parses_frontmatter_and_body() {
        let (fm, body) = parse_lesson_file(LESSON).unwrap();
        assert_eq!(fm.title, "Token Introspection");
        assert_eq!(fm.slug, "token-introspection");
        assert_eq!(fm.duration, 12);
        assert_eq!(fm.order, 3);
        assert_eq!(fm.key_takeaways.len(), 1);
        assert!(body.starts_with("# Token Introspection"));
    }

    #[test]
    fn missing_frontmatter_is_rejected() {
        let err = parse_lesson_file("# Just a heading\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Missing));
    }

    #[test]
    fn unclosed_frontmatter_is_rejected() {
        let err = parse_lesson_file("---\ntitle: Oops\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unclosed));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = parse_lesson_file("---\ntitle: [unbalanced\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontmatterError::Invalid(_)));
    }

    #[test]
    fn missing_optional_fields_default() {
        let (fm, _) = parse_lesson_file("---\ntitle: T\nslug: t\norder: 1\n---\nbody").unwrap();
        assert_eq!(fm.duration, 0);
        assert!(fm.key_takeaways.is_empty());
        assert!(fm.description.is_empty());
    }
}
