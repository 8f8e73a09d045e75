pub mod execution;
pub mod executor;

pub use execution::{ExpandOutcome, TaskCompletion, TaskRequest, execute_request, resolve_children};
pub use executor::TaskExecutor;
