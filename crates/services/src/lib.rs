#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod statistics_service;
pub mod study;
pub mod user_service;

pub use vocab_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, SessionError, UserServiceError};
pub use statistics_service::{StatisticsReport, StatisticsService};
pub use study::{GestureStep, StepResult, StudyLoopService, StudySession, StudySource};
pub use user_service::{INACTIVE_AFTER_DAYS, LoginOutcome, UserService};
