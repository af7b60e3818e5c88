//! Branding configuration and the per-site branding workflow.

pub mod applicator;
pub mod config;
pub mod fallback;

pub use applicator::BrandingApplicator;
pub use config::BrandingConfig;
pub use fallback::{FallbackFailure, first_success};
