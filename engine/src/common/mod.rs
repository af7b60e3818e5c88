pub mod errors;
pub mod retry;
#[cfg(test)]
pub(crate) mod test_log;

pub use errors::{AuthError, BrandingError, InputError, SiteApiError};
pub use retry::{RetryPolicy, Retryable, execute_with_retry};
