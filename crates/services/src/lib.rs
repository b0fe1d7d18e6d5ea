#![forbid(unsafe_code)]

pub mod app_services;
pub mod content_service;
pub mod error;
pub mod progress_service;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use content_service::ContentService;
pub use error::{AppServicesError, ProgressServiceError};
pub use progress_service::{LearningStats, ProgressService};
