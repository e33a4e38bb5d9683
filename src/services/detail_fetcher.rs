use std::{collections::HashSet, sync::Arc};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AppError, AppResult},
    models::{FilmDetail, FilmId},
    services::catalog::CatalogClient,
};

/// Fetches film details for a list of ids, in the caller's order
///
/// One lookup is issued per distinct id, concurrently, with at most
/// `max_in_flight` requests outstanding. A failed lookup only removes that
/// film from the result; the batch itself never fails. The result is
/// produced once, after every lookup has finished.
#[derive(Clone)]
pub struct DetailFetcher {
    client: Arc<dyn CatalogClient>,
    max_in_flight: usize,
}

impl DetailFetcher {
    pub fn new(client: Arc<dyn CatalogClient>, max_in_flight: usize) -> Self {
        Self {
            client,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Fetches details for `ids`, omitting films whose lookup failed
    pub async fn fetch_all(&self, ids: &[FilmId]) -> Vec<FilmDetail> {
        // The token is local and never fires
        match self.fetch_all_until(ids, &CancellationToken::new()).await {
            Ok(films) => films,
            Err(e) => {
                tracing::error!(error = %e, "Detail batch ended without a result");
                Vec::new()
            }
        }
    }

    /// Same as [`fetch_all`](Self::fetch_all), but stops early when `cancel` fires
    ///
    /// Returns [`AppError::Cancelled`] if any lookup was abandoned. Dropping
    /// the returned future also cancels every lookup it spawned.
    pub async fn fetch_all_until(
        &self,
        ids: &[FilmId],
        cancel: &CancellationToken,
    ) -> AppResult<Vec<FilmDetail>> {
        let ids = distinct_in_order(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        tracing::info!(
            film_count = ids.len(),
            max_in_flight = self.max_in_flight,
            catalog = self.client.name(),
            "Fetching film details batch"
        );

        let batch = cancel.child_token();
        let _abort_on_drop = batch.clone().drop_guard();
        let permits = Arc::new(Semaphore::new(self.max_in_flight));

        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            let client = Arc::clone(&self.client);
            let permits = Arc::clone(&permits);
            let token = batch.clone();

            let task = tokio::spawn(async move {
                tokio::select! {
                    biased;

                    () = token.cancelled() => None,

                    outcome = async {
                        let _permit = permits
                            .acquire_owned()
                            .await
                            .map_err(|e| AppError::Internal(e.to_string()))?;
                        client.fetch_film(id).await
                    } => Some(outcome),
                }
            });
            tasks.push((id, task));
        }

        // Joining in spawn order is the barrier and the ordering step at once
        let mut films = Vec::with_capacity(tasks.len());
        let mut failures = 0usize;
        let mut abandoned = 0usize;

        for (id, task) in tasks {
            match task.await {
                Ok(Some(Ok(film))) => films.push(film),
                Ok(Some(Err(e))) => {
                    tracing::warn!(film_id = %id, error = %e, "Film detail fetch failed");
                    failures += 1;
                }
                Ok(None) => abandoned += 1,
                Err(e) => {
                    tracing::error!(film_id = %id, error = %e, "Task join error");
                    failures += 1;
                }
            }
        }

        if abandoned > 0 {
            tracing::info!(
                completed = films.len(),
                abandoned,
                "Film details batch cancelled"
            );
            return Err(AppError::Cancelled);
        }

        if failures > 0 {
            tracing::warn!(
                success_count = films.len(),
                error_count = failures,
                "Partial film details fetch failure"
            );
        }

        tracing::info!(fetched = films.len(), "Film details batch fetched");

        Ok(films)
    }
}

/// Drops repeated ids, keeping each at its first position
fn distinct_in_order(ids: &[FilmId]) -> Vec<FilmId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Collection, CollectionPage, FilmSummary, KeywordSearchPage, MediaType,
    };
    use crate::services::catalog::MockCatalogClient;
    use chrono::Month;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
        time::{Duration, Instant},
    };

    fn film(id: u64) -> FilmDetail {
        FilmDetail {
            id: FilmId(id),
            name: format!("Film {}", id),
            poster_url: None,
            poster_preview_url: None,
            year: Some(2000),
            duration_minutes: Some(90),
            description: None,
            rating_kinopoisk: None,
            rating_imdb: None,
            genres: vec![],
            countries: vec![],
            media_type: MediaType::Film,
        }
    }

    fn ids(raw: &[u64]) -> Vec<FilmId> {
        raw.iter().copied().map(FilmId).collect()
    }

    fn output_ids(films: &[FilmDetail]) -> Vec<u64> {
        films.iter().map(|f| f.id.0).collect()
    }

    /// Catalog stub with per-id delays and failures that records concurrency
    #[derive(Default)]
    struct StubCatalog {
        delays: HashMap<u64, Duration>,
        failing: HashSet<u64>,
        panicking: HashSet<u64>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_seen_in_flight: AtomicUsize,
        completed: AtomicUsize,
        abandoned: AtomicUsize,
    }

    /// Counts a fetch as abandoned when its future is dropped before finishing
    struct InFlight<'a> {
        stub: &'a StubCatalog,
        finished: bool,
    }

    impl Drop for InFlight<'_> {
        fn drop(&mut self) {
            self.stub.in_flight.fetch_sub(1, Ordering::SeqCst);
            if !self.finished {
                self.stub.abandoned.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    impl StubCatalog {
        fn delay(mut self, id: u64, millis: u64) -> Self {
            self.delays.insert(id, Duration::from_millis(millis));
            self
        }

        fn failing(mut self, id: u64) -> Self {
            self.failing.insert(id);
            self
        }

        fn panicking(mut self, id: u64) -> Self {
            self.panicking.insert(id);
            self
        }
    }

    #[async_trait::async_trait]
    impl CatalogClient for StubCatalog {
        async fn fetch_film(&self, id: FilmId) -> AppResult<FilmDetail> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panicking.contains(&id.0) {
                panic!("catalog stub panicked on film {}", id);
            }
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen_in_flight.fetch_max(now, Ordering::SeqCst);
            let mut guard = InFlight {
                stub: self,
                finished: false,
            };

            let delay = self
                .delays
                .get(&id.0)
                .copied()
                .unwrap_or(Duration::from_millis(5));
            tokio::time::sleep(delay).await;

            guard.finished = true;
            drop(guard);
            self.completed.fetch_add(1, Ordering::SeqCst);

            if self.failing.contains(&id.0) {
                Err(AppError::ExternalApi("timeout".to_string()))
            } else {
                Ok(film(id.0))
            }
        }

        async fn fetch_collection(&self, _: Collection, _: u32) -> AppResult<CollectionPage> {
            unimplemented!()
        }

        async fn fetch_premieres(&self, _: i32, _: Month) -> AppResult<Vec<FilmSummary>> {
            unimplemented!()
        }

        async fn search_by_keyword(&self, _: &str, _: u32) -> AppResult<KeywordSearchPage> {
            unimplemented!()
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn fetcher(stub: StubCatalog, max_in_flight: usize) -> (Arc<StubCatalog>, DetailFetcher) {
        let stub = Arc::new(stub);
        let fetcher = DetailFetcher::new(stub.clone(), max_in_flight);
        (stub, fetcher)
    }

    #[tokio::test]
    async fn test_all_success_preserves_input_order() {
        // Later ids finish first
        let stub = StubCatalog::default()
            .delay(10, 60)
            .delay(20, 30)
            .delay(30, 1);
        let (_, fetcher) = fetcher(stub, 8);

        let films = fetcher.fetch_all(&ids(&[10, 20, 30])).await;

        assert_eq!(output_ids(&films), vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_single_failure_is_omitted() {
        let stub = StubCatalog::default()
            .failing(502)
            .delay(501, 40)
            .delay(503, 1);
        let (stub, fetcher) = fetcher(stub, 8);

        let films = fetcher.fetch_all(&ids(&[501, 502, 503])).await;

        assert_eq!(films, vec![film(501), film(503)]);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_result() {
        let stub = StubCatalog::default().failing(1).failing(2);
        let (_, fetcher) = fetcher(stub, 8);

        let films = fetcher.fetch_all(&ids(&[1, 2])).await;

        assert!(films.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_film().times(0);
        mock.expect_name().return_const("mock");

        let fetcher = DetailFetcher::new(Arc::new(mock), 4);
        let films = fetcher.fetch_all(&[]).await;

        assert!(films.is_empty());
    }

    #[tokio::test]
    async fn test_waits_for_slowest_fetch() {
        let stub = StubCatalog::default().delay(2, 150);
        let (stub, fetcher) = fetcher(stub, 8);

        let started = Instant::now();
        let films = fetcher.fetch_all(&ids(&[1, 2, 3])).await;

        assert!(started.elapsed() >= Duration::from_millis(150));
        assert_eq!(stub.completed.load(Ordering::SeqCst), 3);
        assert_eq!(stub.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(output_ids(&films), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_structurally_equal() {
        let stub = StubCatalog::default().failing(7).delay(3, 20);
        let (_, fetcher) = fetcher(stub, 2);
        let input = ids(&[3, 7, 11, 5]);

        let first = fetcher.fetch_all(&input).await;
        let second = fetcher.fetch_all(&input).await;

        assert_eq!(first, second);
        assert_eq!(output_ids(&first), vec![3, 11, 5]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let mut stub = StubCatalog::default();
        for id in 1..=12 {
            stub = stub.delay(id, 20);
        }
        let (stub, fetcher) = fetcher(stub, 3);

        let input: Vec<u64> = (1..=12).collect();
        let films = fetcher.fetch_all(&ids(&input)).await;

        assert_eq!(films.len(), 12);
        assert!(stub.max_seen_in_flight.load(Ordering::SeqCst) <= 3);
        assert!(stub.max_seen_in_flight.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_panicking_fetch_is_omitted() {
        let stub = StubCatalog::default()
            .panicking(20)
            .delay(10, 30)
            .delay(30, 1);
        let (stub, fetcher) = fetcher(stub, 8);

        let films = fetcher
            .fetch_all_until(&ids(&[10, 20, 30]), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(output_ids(&films), vec![10, 30]);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
        assert_eq!(stub.abandoned.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_treated_as_one() {
        let (stub, fetcher) = fetcher(StubCatalog::default(), 0);
        assert_eq!(fetcher.max_in_flight, 1);

        let films = fetcher.fetch_all(&ids(&[1, 2, 3])).await;

        assert_eq!(films.len(), 3);
        assert_eq!(stub.max_seen_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_fetched_once_at_first_position() {
        let mut mock = MockCatalogClient::new();
        mock.expect_name().return_const("mock");
        mock.expect_fetch_film()
            .withf(|id| *id == FilmId(4))
            .times(1)
            .returning(|id| Ok(film(id.0)));
        mock.expect_fetch_film()
            .withf(|id| *id == FilmId(9))
            .times(1)
            .returning(|id| Ok(film(id.0)));

        let fetcher = DetailFetcher::new(Arc::new(mock), 4);
        let films = fetcher.fetch_all(&ids(&[4, 9, 4, 9, 4])).await;

        assert_eq!(output_ids(&films), vec![4, 9]);
    }

    #[tokio::test]
    async fn test_cancellation_returns_promptly() {
        let stub = StubCatalog::default().delay(1, 5_000);
        let (stub, fetcher) = fetcher(stub, 4);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result = fetcher.fetch_all_until(&ids(&[1, 2]), &cancel).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(stub.completed.load(Ordering::SeqCst), 1);
        assert_eq!(stub.abandoned.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_makes_no_calls() {
        let (stub, fetcher) = fetcher(StubCatalog::default(), 4);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fetcher.fetch_all_until(&ids(&[1]), &cancel).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropping_batch_cancels_pending_fetches() {
        let stub = StubCatalog::default().delay(1, 5_000);
        let (stub, fetcher) = fetcher(stub, 4);

        let input = ids(&[1]);
        let batch = fetcher.fetch_all(&input);
        let timed_out = tokio::time::timeout(Duration::from_millis(30), batch).await;
        assert!(timed_out.is_err());

        // Give the cancelled task a moment to unwind
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(stub.abandoned.load(Ordering::SeqCst), 1);
        assert_eq!(stub.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(stub.completed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_distinct_in_order() {
        assert_eq!(
            distinct_in_order(&ids(&[3, 1, 3, 2, 1])),
            ids(&[3, 1, 2])
        );
        assert!(distinct_in_order(&[]).is_empty());
    }
}
