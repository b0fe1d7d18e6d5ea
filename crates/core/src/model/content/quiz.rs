use serde::{Deserialize, Serialize};

/// End-of-module quiz.
///
/// A module whose quiz file is missing still gets a usable quiz: no
/// questions and the default passing score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub passing_score: u8,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Placeholder passing score (percent) used when no quiz file exists.
    pub const DEFAULT_PASSING_SCORE: u8 = 80;

    /// Whether the given percentage score passes this quiz.
    #[must_use]
    pub fn is_passing(&self, score: u8) -> bool {
        score >= self.passing_score
    }
}

impl Default for Quiz {
    fn default() -> Self {
        Self {
            passing_score: Self::DEFAULT_PASSING_SCORE,
            questions: Vec::new(),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// Whether the selected option index answers this question correctly.
    #[must_use]
    pub fn is_correct(&self, selected_option: usize) -> bool {
        selected_option == self.correct_option
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quiz_uses_placeholder_passing_score() {
        let quiz = Quiz::default();
        assert_eq!(quiz.passing_score, 80);
        assert!(quiz.questions.is_empty());
    }

    #[test]
    fn passing_is_inclusive_of_threshold() {
        let quiz = Quiz {
            passing_score: 80,
            questions: Vec::new(),
        };
        assert!(quiz.is_passing(80));
        assert!(quiz.is_passing(100));
        assert!(!quiz.is_passing(79));
    }

    #[test]
    fn question_grades_selected_option() {
        let q = QuizQuestion {
            id: "q1".to_string(),
            prompt: "Which grant suits a SPA?".to_string(),
            options: vec![
                "Implicit".to_string(),
                "Authorization code with PKCE".to_string(),
            ],
            correct_option: 1,
            explanation: None,
        };
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }
}
