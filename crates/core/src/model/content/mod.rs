pub mod lesson;
pub mod module;
pub mod quiz;

pub use lesson::Lesson;
pub use module::{Badge, ContentSource, Difficulty, Module};
pub use quiz::{Quiz, QuizQuestion};
