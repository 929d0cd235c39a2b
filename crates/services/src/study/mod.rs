mod session;
mod workflow;

pub use crate::error::SessionError;
pub use session::{StudySession, StudySource};
pub use workflow::{GestureStep, StepResult, StudyLoopService};
