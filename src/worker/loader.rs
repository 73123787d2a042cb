//! Bounded, prioritised detail loading.
//!
//! Requests are split into the failing group and the passing group. Each
//! group runs as a stream of provider calls with at most `batch_size` in
//! flight; the passing group starts only once the failing group has drained.
//! Every completion is handed to the caller immediately, in completion order.

use super::liveness::LivenessToken;
use super::messages::{partition, DetailOutcome, DetailRequest};
use crate::provider::{JobProvider, OwnerContext};
use futures_util::stream::{self, StreamExt};

/// Counters for one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub delivered: usize,
    pub failed: usize,
    /// Completions dropped because the token was revoked.
    pub discarded: usize,
}

/// Fetches details for `requests`, failing rows first.
///
/// `on_complete` runs once per completed fetch while `token` is live. After
/// the token is revoked, outstanding completions are discarded and the
/// remaining groups are not started.
pub async fn load_details<P, F>(
    provider: &P,
    owner: &OwnerContext,
    requests: Vec<DetailRequest>,
    batch_size: usize,
    token: &LivenessToken,
    mut on_complete: F,
) -> LoadSummary
where
    P: JobProvider + ?Sized,
    F: FnMut(DetailOutcome),
{
    let (failing, passing) = partition(requests);
    let batch_size = batch_size.max(1);
    let mut summary = LoadSummary::default();

    tracing::debug!(
        failing = failing.len(),
        passing = passing.len(),
        batch_size,
        "detail load started"
    );

    for (group, requests) in [("failing", failing), ("passing", passing)] {
        if requests.is_empty() {
            continue;
        }
        if !token.is_live() {
            summary.discarded += requests.len();
            tracing::debug!(group, skipped = requests.len(), "detail group skipped after teardown");
            continue;
        }

        tracing::debug!(group, count = requests.len(), "detail group started");
        let mut completions = stream::iter(requests.into_iter().map(|request| async move {
            let result = provider.fetch_row_detail(owner, &request).await;
            DetailOutcome {
                row_id: request.row_id,
                result,
            }
        }))
        .buffer_unordered(batch_size);

        while let Some(outcome) = completions.next().await {
            if !token.is_live() {
                summary.discarded += 1;
                tracing::debug!(row_id = %outcome.row_id, "late detail discarded");
                continue;
            }
            if outcome.result.is_err() {
                summary.failed += 1;
            }
            summary.delivered += 1;
            on_complete(outcome);
        }
    }

    tracing::debug!(
        delivered = summary.delivered,
        failed = summary.failed,
        discarded = summary.discarded,
        "detail load finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GridError, JobDetail, JobInfo, Result, RowId};
    use crate::worker::Priority;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl JobProvider for CountingProvider {
        async fn fetch_rows(&self, _owner: &OwnerContext) -> Result<Vec<JobInfo>> {
            Ok(Vec::new())
        }

        async fn fetch_row_detail(&self, _owner: &OwnerContext, request: &DetailRequest) -> Result<JobDetail> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if request.row_id.as_str() == "broken" {
                return Err(GridError::DetailFetchFailed {
                    row_id: request.row_id.to_string(),
                    message: "timeout".to_string(),
                });
            }
            Ok(JobDetail::default())
        }
    }

    fn request(id: &str, priority: Priority) -> DetailRequest {
        DetailRequest {
            row_id: RowId::new(id),
            label: id.to_string(),
            group_key: "master".to_string(),
            priority,
        }
    }

    fn owner() -> OwnerContext {
        OwnerContext::new("conn://local", "local")
    }

    #[tokio::test]
    async fn failing_group_completes_before_passing_group() {
        let provider = CountingProvider::default();
        let requests = vec![
            request("p1", Priority::Passing),
            request("f1", Priority::Failing),
            request("p2", Priority::Passing),
            request("f2", Priority::Failing),
        ];
        let mut seen = Vec::new();
        let summary = load_details(&provider, &owner(), requests, 2, &LivenessToken::new(), |outcome| {
            seen.push(outcome.row_id.to_string());
        })
        .await;

        assert_eq!(summary.delivered, 4);
        let first_passing = seen.iter().position(|id| id.starts_with('p')).unwrap();
        assert!(seen[..first_passing].iter().all(|id| id.starts_with('f')));
        assert_eq!(first_passing, 2);
    }

    #[tokio::test]
    async fn failures_are_delivered_not_raised() {
        let provider = CountingProvider::default();
        let mut outcomes = Vec::new();
        let summary = load_details(
            &provider,
            &owner(),
            vec![request("broken", Priority::Failing)],
            4,
            &LivenessToken::new(),
            |outcome| outcomes.push(outcome),
        )
        .await;

        assert_eq!(summary.failed, 1);
        assert!(outcomes[0].result.is_err());
    }

    #[tokio::test]
    async fn revoked_token_discards_everything() {
        let provider = CountingProvider::default();
        let token = LivenessToken::new();
        token.revoke();
        let mut delivered = 0;
        let summary = load_details(
            &provider,
            &owner(),
            vec![request("a", Priority::Failing), request("b", Priority::Passing)],
            4,
            &token,
            |_| delivered += 1,
        )
        .await;

        assert_eq!(delivered, 0);
        assert_eq!(summary.discarded, 2);
        assert_eq!(provider.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn revocation_mid_group_stops_delivery() {
        let provider = CountingProvider::default();
        let token = LivenessToken::new();
        let revoker = token.clone();
        let mut delivered = 0;
        let summary = load_details(
            &provider,
            &owner(),
            vec![request("a", Priority::Failing), request("b", Priority::Failing)],
            1,
            &token,
            |_| {
                delivered += 1;
                revoker.revoke();
            },
        )
        .await;

        assert_eq!(delivered, 1);
        assert_eq!(summary.discarded, 1);
    }
}
