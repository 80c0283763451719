//! Collision-free name selection
//!
//! Given a desired name and an existence check, pick the first of
//! `name.ext`, `name (1).ext`, `name (2).ext`, ... that does not exist yet.
//! The check and the later write are separate storage calls, so two requests
//! racing for the same name can both pick it; the local backend detects that
//! at publish time, the bucket backend does not.

use std::future::Future;

use sheetvault_core::constants::MAX_NAME_ATTEMPTS;
use sheetvault_core::naming::{candidate_name, split_extension};
use sheetvault_core::AppError;
use sheetvault_storage::StorageError;

/// Resolve `desired` to a name for which `exists` returns false.
///
/// Returns `desired` unchanged when it is free. Gives up with
/// [`AppError::ResourceExhausted`] after [`MAX_NAME_ATTEMPTS`] candidates.
pub async fn resolve_unique_name<F, Fut>(desired: &str, exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, StorageError>>,
{
    resolve_with_limit(desired, exists, MAX_NAME_ATTEMPTS).await
}

async fn resolve_with_limit<F, Fut>(
    desired: &str,
    mut exists: F,
    max_attempts: u32,
) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, StorageError>>,
{
    let (stem, extension) = split_extension(desired);
    let mut candidate = desired.to_string();

    for counter in 1..=max_attempts {
        if !exists(candidate.clone()).await? {
            if counter > 1 {
                tracing::debug!(desired = %desired, resolved = %candidate, "Resolved name collision");
            }
            return Ok(candidate);
        }
        candidate = candidate_name(stem, extension, counter);
    }

    tracing::warn!(desired = %desired, attempts = max_attempts, "No free name found");
    Err(AppError::ResourceExhausted {
        name: desired.to_string(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn exists_in(
        names: &HashSet<String>,
    ) -> impl FnMut(String) -> std::future::Ready<Result<bool, StorageError>> + '_ {
        move |candidate| std::future::ready(Ok(names.contains(&candidate)))
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_free_name_is_returned_unchanged() {
        let existing = set(&["other.xlsx"]);
        let name = resolve_unique_name("report.xlsx", exists_in(&existing)).await.unwrap();
        assert_eq!(name, "report.xlsx");
    }

    #[tokio::test]
    async fn test_collisions_get_numbered_suffixes() {
        let existing = set(&["report.xlsx"]);
        let name = resolve_unique_name("report.xlsx", exists_in(&existing)).await.unwrap();
        assert_eq!(name, "report (1).xlsx");

        let existing = set(&["report.xlsx", "report (1).xlsx"]);
        let name = resolve_unique_name("report.xlsx", exists_in(&existing)).await.unwrap();
        assert_eq!(name, "report (2).xlsx");
    }

    #[tokio::test]
    async fn test_gaps_are_reused() {
        let existing = set(&["report.xlsx", "report (2).xlsx"]);
        let name = resolve_unique_name("report.xlsx", exists_in(&existing)).await.unwrap();
        assert_eq!(name, "report (1).xlsx");
    }

    #[tokio::test]
    async fn test_name_without_extension() {
        let existing = set(&["name", "name (1)"]);
        let name = resolve_unique_name("name", exists_in(&existing)).await.unwrap();
        assert_eq!(name, "name (2)");
    }

    #[tokio::test]
    async fn test_result_is_never_an_existing_name() {
        let existing = set(&[
            "a.xls",
            "a (1).xls",
            "a (2).xls",
            "a (4).xls",
            "b.xlsx",
            "a (3).xls",
        ]);
        for desired in ["a.xls", "b.xlsx", "c.xlsm", "a (1).xls"] {
            let name = resolve_unique_name(desired, exists_in(&existing)).await.unwrap();
            assert!(!existing.contains(&name), "{} collides", name);
            if !existing.contains(desired) {
                assert_eq!(name, desired);
            }
        }
    }

    #[tokio::test]
    async fn test_suffix_applies_to_existing_suffixed_name() {
        let existing = set(&["a (1).xls"]);
        let name = resolve_unique_name("a (1).xls", exists_in(&existing)).await.unwrap();
        assert_eq!(name, "a (1) (1).xls");
    }

    #[tokio::test]
    async fn test_exhaustion_after_limit() {
        let calls = AtomicU32::new(0);
        let result = resolve_with_limit(
            "report.xlsx",
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok(true))
            },
            5,
        )
        .await;

        assert!(matches!(result, Err(AppError::ResourceExhausted { attempts: 5, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_exists_failure_propagates() {
        let result = resolve_unique_name("report.xlsx", |_| {
            std::future::ready(Err(StorageError::BackendError("timeout".to_string())))
        })
        .await;

        assert!(matches!(result, Err(AppError::StorageFailure(_))));
    }
}
