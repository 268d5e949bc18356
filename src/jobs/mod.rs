pub mod coordinator;
pub mod registry;

pub use coordinator::{JobCoordinator, JobError};
pub use registry::JobRegistry;
