//! Settings file, logging and validation policy.

pub mod logging;
pub mod settings;
pub mod validation;

pub use logging::LoggingConfig;
pub use settings::{Settings, ShowConfig};
pub use validation::ValidationPolicy;
