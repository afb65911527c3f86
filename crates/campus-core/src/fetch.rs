// ── Fetch state ──
//
// `Resource<T>` is the `{data, loading, error, refetch}` holder every view
// is built on. State is published through a `watch` channel so front ends
// can render snapshots or await changes. Each fetch runs under a child
// cancellation token of the owning view and carries a generation number;
// starting a new fetch cancels the previous one and only the newest
// generation may write state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use futures::Stream;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

type Loader<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, CoreError>> + Send + Sync>;

/// Point-in-time view of a [`Resource`].
#[derive(Debug)]
pub struct FetchState<T> {
    pub data: Arc<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// How a fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Data stored, error cleared.
    Applied,
    /// Error message stored, data left as it was.
    Failed,
    /// A newer fetch started while this one was in flight.
    Superseded,
    /// The owner went away or the fetch was cancelled explicitly.
    Cancelled,
    /// No loader configured; nothing to do.
    Idle,
}

/// Async data holder with loading/error tracking.
pub struct Resource<T> {
    state: watch::Sender<FetchState<T>>,
    loader: Option<Loader<T>>,
    generation: AtomicU64,
    owner: CancellationToken,
    inflight: ArcSwap<CancellationToken>,
}

impl<T: Send + Sync + 'static> Resource<T> {
    /// A resource that fetches through `loader`. Starts in the loading state.
    pub fn new<F, Fut>(initial: T, owner: CancellationToken, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let loader: Loader<T> = Arc::new(move || -> BoxFuture<'static, Result<T, CoreError>> {
            Box::pin(loader())
        });
        Self::build(initial, owner, Some(loader), true)
    }

    /// A resource without a fixed loader; data arrives through [`load`](Self::load).
    pub fn idle(initial: T, owner: CancellationToken) -> Self {
        Self::build(initial, owner, None, false)
    }

    fn build(initial: T, owner: CancellationToken, loader: Option<Loader<T>>, loading: bool) -> Self {
        let (state, _) = watch::channel(FetchState {
            data: Arc::new(initial),
            loading,
            error: None,
        });
        let inflight = ArcSwap::from_pointee(owner.child_token());
        Self {
            state,
            loader,
            generation: AtomicU64::new(0),
            owner,
            inflight,
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Re-run the configured loader.
    pub async fn refetch(&self) -> FetchOutcome {
        match &self.loader {
            Some(loader) => self.load(loader()).await,
            None => {
                self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
                FetchOutcome::Idle
            }
        }
    }

    /// Run `fut` as the newest fetch for this resource.
    pub async fn load<Fut>(&self, fut: Fut) -> FetchOutcome
    where
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = self.owner.child_token();
        let previous = self.inflight.swap(Arc::new(token.clone()));
        previous.cancel();

        if token.is_cancelled() {
            self.settle_cancelled(generation);
            return FetchOutcome::Cancelled;
        }
        self.state.send_modify(|s| s.loading = true);

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(generation, "fetch cancelled");
                self.settle_cancelled(generation);
                return FetchOutcome::Cancelled;
            }
            result = fut => result,
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded fetch");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(data) => {
                self.state.send_modify(|s| {
                    s.data = Arc::new(data);
                    s.loading = false;
                    s.error = None;
                });
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "fetch failed");
                let message = err.user_message();
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Cancel the in-flight fetch, if any. Data and error are left as they were.
    pub fn cancel(&self) {
        self.inflight.load().cancel();
    }

    /// Drop the loading flag of a cancelled fetch unless a newer one owns it.
    fn settle_cancelled(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.state
                .send_if_modified(|s| std::mem::replace(&mut s.loading, false));
        }
    }

    /// Replace the data directly without a fetch.
    pub fn set_data(&self, data: T) {
        self.state.send_modify(|s| s.data = Arc::new(data));
    }

    // ── Reading ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Arc<T> {
        Arc::clone(&self.state.borrow().data)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Stream of snapshots, starting with the current one.
    pub fn stream(&self) -> ResourceStream<T> {
        ResourceStream {
            inner: WatchStream::new(self.state.subscribe()),
        }
    }
}

impl<T> Drop for Resource<T> {
    fn drop(&mut self) {
        self.inflight.load().cancel();
    }
}

/// `Stream` adapter over a resource's `watch` channel.
pub struct ResourceStream<T> {
    inner: WatchStream<FetchState<T>>,
}

impl<T: Send + Sync + 'static> Stream for ResourceStream<T> {
    type Item = FetchState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn starts_loading_and_applies_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let res = Resource::new(Vec::<u32>::new(), CancellationToken::new(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(vec![u32::try_from(n).unwrap_or(0), 7]) }
        });

        assert!(res.is_loading());
        assert_eq!(res.refetch().await, FetchOutcome::Applied);
        let snap = res.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.error, None);
        assert_eq!(*snap.data, vec![0, 7]);

        res.refetch().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_keeps_initial_data_and_sets_message() {
        let res = Resource::new(vec![1_u8], CancellationToken::new(), || async {
            Err(CoreError::Rejected {
                status: 403,
                message: "This action is unauthorized.".into(),
            })
        });

        assert_eq!(res.refetch().await, FetchOutcome::Failed);
        let snap = res.snapshot();
        assert!(!snap.loading);
        assert_eq!(*snap.data, vec![1]);
        assert_eq!(snap.error.as_deref(), Some("This action is unauthorized."));
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let res: Resource<u8> = Resource::idle(0, CancellationToken::new());
        res.load(async { Err(CoreError::Internal("boom".into())) }).await;
        assert_eq!(res.error().as_deref(), Some(crate::error::FALLBACK_MESSAGE));

        res.load(async { Ok(5) }).await;
        assert_eq!(res.error(), None);
        assert_eq!(*res.data(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_fetch_supersedes_older_one() {
        let res: Resource<&'static str> = Resource::idle("", CancellationToken::new());

        let slow = res.load(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("slow")
        });
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            res.load(async { Ok("fast") }).await
        };

        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);
        assert_eq!(slow_outcome, FetchOutcome::Cancelled);
        assert_eq!(fast_outcome, FetchOutcome::Applied);
        assert_eq!(*res.data(), "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn owner_cancellation_discards_result() {
        let owner = CancellationToken::new();
        let res: Resource<u32> = Resource::idle(1, owner.clone());

        let pending = res.load(async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(99)
        });
        let cancel = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            owner.cancel();
        };

        let (outcome, ()) = tokio::join!(pending, cancel);
        assert_eq!(outcome, FetchOutcome::Cancelled);
        assert_eq!(*res.data(), 1);
        assert!(!res.is_loading());

        // Later fetches on a dead owner never run.
        assert_eq!(res.load(async { Ok(5) }).await, FetchOutcome::Cancelled);
        assert_eq!(*res.data(), 1);
    }

    #[tokio::test]
    async fn dead_owner_does_not_report_loading() {
        let owner = CancellationToken::new();
        let res = Resource::new(0_u8, owner.clone(), || async { Ok(1) });
        assert!(res.is_loading());

        owner.cancel();
        assert_eq!(res.refetch().await, FetchOutcome::Cancelled);
        assert!(!res.is_loading());
        assert_eq!(*res.data(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_leaves_loading_to_the_newer_one() {
        let res: Resource<u8> = Resource::idle(0, CancellationToken::new());

        let slow = res.load(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        });
        let newer = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            res.load(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(2)
            })
            .await
        };
        let observe = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            res.is_loading()
        };

        let (slow_outcome, newer_outcome, loading_midway) = tokio::join!(slow, newer, observe);
        assert_eq!(slow_outcome, FetchOutcome::Cancelled);
        assert_eq!(newer_outcome, FetchOutcome::Applied);
        assert!(loading_midway);
        assert!(!res.is_loading());
    }

    #[tokio::test]
    async fn idle_refetch_clears_loading() {
        let res = Resource::idle(0_u8, CancellationToken::new());
        assert!(!res.is_loading());
        assert_eq!(res.refetch().await, FetchOutcome::Idle);
    }

    #[tokio::test]
    async fn stream_yields_current_snapshot() {
        let res = Resource::idle(3_u8, CancellationToken::new());
        let mut stream = res.stream();
        let first = stream.next().await.unwrap();
        assert_eq!(*first.data, 3);
    }
}
