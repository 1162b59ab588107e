//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TwilioAdapter};
pub use test_dependencies::MockSmsService;
pub use traits::*;
