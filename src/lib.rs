pub mod config;
pub mod crawler;
pub mod domain_resolver;
pub mod jobs;
pub mod models;

pub use config::{load_config, Config};
pub use domain_resolver::DomainResolver;
pub use jobs::{JobCoordinator, JobError};
pub use models::{JobEvent, ResolvedWebsite, SiteResult};
