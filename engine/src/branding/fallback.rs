use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A named way of performing an operation, not yet started.
pub type Candidate<'a, T, E> = (
    &'static str,
    Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>,
);

/// Wraps a future as a [`Candidate`] for [`first_success`].
pub fn candidate<'a, T, E>(
    method: &'static str,
    attempt: impl Future<Output = Result<T, E>> + Send + 'a,
) -> Candidate<'a, T, E> {
    (method, Box::pin(attempt))
}

/// Every candidate failed. Failures are kept in the order they were tried.
#[derive(Debug)]
pub struct FallbackFailure<E> {
    pub failures: Vec<(&'static str, E)>,
}

impl<E> FallbackFailure<E> {
    /// The error from the last method tried.
    pub fn last(&self) -> Option<&E> {
        self.failures.last().map(|(_, error)| error)
    }
}

impl<E: fmt::Display> fmt::Display for FallbackFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.last() {
            Some((method, error)) => write!(
                f,
                "all {} methods failed, last ({method}): {error}",
                self.failures.len()
            ),
            None => write!(f, "no methods to try"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for FallbackFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last().map(|error| error as &(dyn std::error::Error + 'static))
    }
}

/// Tries each candidate in order and stops at the first success.
///
/// Candidates are lazy futures, so later methods never run once an earlier
/// one succeeds.
pub async fn first_success<T, E: fmt::Display>(
    operation: &str,
    candidates: Vec<Candidate<'_, T, E>>,
) -> Result<T, FallbackFailure<E>> {
    let mut failures = Vec::new();

    for (method, attempt) in candidates {
        match attempt.await {
            Ok(value) => {
                if !failures.is_empty() {
                    log::info!("{operation} succeeded using the {method} method");
                }
                return Ok(value);
            }
            Err(error) => {
                log::warn!("{operation} via the {method} method failed: {error}");
                failures.push((method, error));
            }
        }
    }

    Err(FallbackFailure { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let legacy_calls = AtomicU32::new(0);
        let legacy_calls_ref = &legacy_calls;

        let result = first_success(
            "set_logo",
            vec![
                candidate("primary", async { Ok::<_, String>(1) }),
                candidate("legacy", async move {
                    legacy_calls_ref.fetch_add(1, Ordering::SeqCst);
                    Ok(2)
                }),
            ],
        )
        .await;

        assert_eq!(assert_ok!(result), 1);
        assert_eq!(legacy_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_to_next_method() {
        let result = first_success(
            "apply_theme",
            vec![
                candidate("primary", async { Err::<u32, _>("boom".to_string()) }),
                candidate("direct", async { Ok(7) }),
            ],
        )
        .await;

        assert_eq!(assert_ok!(result), 7);
    }

    #[tokio::test]
    async fn test_surfaces_last_error_when_all_fail() {
        let result = first_success(
            "set_logo",
            vec![
                candidate("primary", async { Err::<(), _>("first".to_string()) }),
                candidate("legacy", async { Err::<(), _>("second".to_string()) }),
            ],
        )
        .await;

        let failure = assert_err!(result);
        assert_eq!(failure.failures.len(), 2);
        assert_eq!(failure.last(), Some(&"second".to_string()));
        assert!(failure.to_string().contains("last (legacy): second"));
    }

    #[tokio::test]
    async fn test_empty_candidate_list() {
        let result = first_success::<(), String>("noop", Vec::new()).await;
        let failure = assert_err!(result);
        assert!(failure.last().is_none());
    }
}
