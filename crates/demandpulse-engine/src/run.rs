//! The aggregation run: fetch, score, and collect per-product results.

use chrono::NaiveDate;

use demandpulse_core::query::normalize_entry;
use demandpulse_core::{CancelToken, MaxPosts, PostQuery, ProductResult, ScoredPost};
use demandpulse_sentiment::{score_post, SentenceScorer};
use demandpulse_source::{BatchControl, PostSource};

use crate::error::EngineError;
use crate::log::LogBuffer;

/// Once this many posts have been downloaded for a product, further progress
/// updates replace the last log line instead of appending new ones.
const PROGRESS_APPEND_LIMIT: usize = 100;

/// Parameters for one run, as entered by the user.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Products to query, processed strictly in this order.
    pub products: Vec<String>,
    pub location: String,
    pub country: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub max_posts: MaxPosts,
}

/// Shared mutable state of a run: the cancellation flag and the progress log.
///
/// The run writes; the view-refresh path reads. Nothing else is shared.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub cancel: CancelToken,
    pub log: LogBuffer,
}

impl RunState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Runs the pipeline for every requested product, in order.
///
/// For each product: fetch posts in batches (checking the cancellation token
/// at every batch boundary), score each post, and append a [`ProductResult`]
/// with the rounded net score. Interruption yields complete results for
/// finished products, a partial table for the in-flight product, and nothing
/// after it — a product either completes fully or its partial posts are
/// whatever arrived before the stop was observed.
///
/// Fetch errors are logged and recovered locally; the partial posts collected
/// before the failure still count. They never abort the run.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] — before any fetch starts — if
/// location or country is empty, a product name is empty, or the date range
/// is inverted.
pub async fn run_query(
    request: &RunRequest,
    source: &dyn PostSource,
    scorer: &dyn SentenceScorer,
    state: &RunState,
) -> Result<Vec<ProductResult>, EngineError> {
    let log = &state.log;

    let location = normalize_entry(&request.location);
    let country = normalize_entry(&request.country);
    if location.is_empty() {
        log.push("Location cannot be empty");
        return Err(EngineError::Validation("location cannot be empty".into()));
    }
    if country.is_empty() {
        log.push("Country cannot be empty");
        return Err(EngineError::Validation("country cannot be empty".into()));
    }

    // Build every query up front so bad parameters fail before the first fetch.
    let mut queries = Vec::with_capacity(request.products.len());
    for product in &request.products {
        let query = PostQuery::new(
            product,
            &location,
            &country,
            request.since,
            request.until,
            request.max_posts,
        )
        .map_err(|e| {
            log.push(e.to_string());
            EngineError::Validation(e.to_string())
        })?;
        queries.push(query);
    }

    log.push("Performing Queries");

    let mut results: Vec<ProductResult> = Vec::new();

    for (product, query) in request.products.iter().zip(&queries) {
        if state.cancel.is_cancelled() {
            break;
        }

        tracing::info!(product, query = query.query.as_str(), "downloading posts");
        log.push(format!("Downloading posts for {product} ..."));

        let mut downloaded = 0usize;
        let cancel = state.cancel.clone();
        let progress_log = log.clone();
        let mut on_batch = move |batch: &[demandpulse_core::Post]| {
            downloaded += batch.len();
            let line = format!("\tDownloaded {downloaded}");
            if downloaded < PROGRESS_APPEND_LIMIT {
                progress_log.push(line);
            } else {
                progress_log.replace_last(line);
            }
            if cancel.is_cancelled() {
                BatchControl::Stop
            } else {
                BatchControl::Continue
            }
        };

        let outcome = source.fetch(query, &mut on_batch).await;
        let stopped = outcome.is_stopped();

        if let Some(err) = outcome.error() {
            tracing::warn!(product, error = %err, "fetch failed — keeping partial result");
            log.push(format!("Fetch failed for {product}: {err}"));
        }

        let scored: Vec<ScoredPost> = outcome
            .posts
            .into_iter()
            .map(|post| {
                let score = score_post(scorer, &post);
                ScoredPost { post, score }
            })
            .collect();

        results.push(ProductResult::from_posts(product.clone(), scored));

        if stopped {
            break;
        }
    }

    if !state.cancel.is_cancelled() {
        let net_scores: Vec<f64> = results.iter().map(|r| r.net_score).collect();
        log.push(format!("Net scores: {net_scores:?}"));
        log.push("Done");
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use demandpulse_core::Post;
    use demandpulse_source::{BatchHandler, FetchOutcome, FetchStatus, SourceError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Constant-compound scorer so expected arithmetic stays exact.
    struct HalfScorer;

    impl SentenceScorer for HalfScorer {
        fn compound(&self, _sentence: &str) -> f64 {
            0.5
        }
    }

    fn make_post(id: &str, replies: u32, retweets: u32, favorites: u32) -> Post {
        Post {
            id: id.to_string(),
            posted_at: Utc.with_ymd_and_hms(2020, 5, 3, 10, 0, 0).unwrap(),
            username: "buyer".to_string(),
            in_reply_to: None,
            replies,
            retweets,
            favorites,
            text: "Great phone.".to_string(),
            geo: None,
            mentions: vec![],
            hashtags: vec![],
            permalink: format!("https://example.com/status/{id}"),
        }
    }

    /// Delivers canned batches per fetch call, counting invocations.
    /// Optionally cancels a token after delivering a given batch, emulating
    /// an interrupt arriving while a fetch is in flight.
    struct MockSource {
        batches: Vec<Vec<Post>>,
        fetch_calls: AtomicUsize,
        cancel_after_batch: Option<(CancelToken, usize)>,
        fail_at_end: bool,
    }

    impl MockSource {
        fn new(batches: Vec<Vec<Post>>) -> Self {
            Self {
                batches,
                fetch_calls: AtomicUsize::new(0),
                cancel_after_batch: None,
                fail_at_end: false,
            }
        }

        fn calls(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PostSource for MockSource {
        async fn fetch(&self, _query: &PostQuery, on_batch: BatchHandler<'_>) -> FetchOutcome {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let mut posts = Vec::new();
            let mut batches = 0usize;
            for (i, batch) in self.batches.iter().enumerate() {
                posts.extend(batch.iter().cloned());
                batches += 1;
                if let Some((token, after)) = &self.cancel_after_batch {
                    if i == *after {
                        token.cancel();
                    }
                }
                if on_batch(batch) == BatchControl::Stop {
                    return FetchOutcome {
                        posts,
                        batches,
                        status: FetchStatus::Stopped,
                    };
                }
            }
            let status = if self.fail_at_end {
                FetchStatus::Failed(SourceError::UnexpectedStatus {
                    status: 500,
                    url: "https://search.example.com".to_string(),
                })
            } else {
                FetchStatus::Complete
            };
            FetchOutcome {
                posts,
                batches,
                status,
            }
        }
    }

    fn request(products: &[&str]) -> RunRequest {
        RunRequest {
            products: products.iter().map(|p| (*p).to_string()).collect(),
            location: "Delhi".to_string(),
            country: "India".to_string(),
            since: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            until: NaiveDate::from_ymd_opt(2020, 5, 11).unwrap(),
            max_posts: MaxPosts::Unlimited,
        }
    }

    #[tokio::test]
    async fn one_result_per_product_in_request_order() {
        let source = MockSource::new(vec![vec![make_post("1", 0, 0, 0)]]);
        let state = RunState::new();
        let results = run_query(&request(&["Alpha", "Beta", "Gamma"]), &source, &HalfScorer, &state)
            .await
            .unwrap();

        let products: Vec<_> = results.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn net_score_is_rounded_sum_of_post_scores() {
        // One sentence at 0.5 compound; weights 1 and 8 → scores 0.5 and 4.0.
        let source = MockSource::new(vec![vec![
            make_post("1", 0, 0, 0),
            make_post("2", 0, 5, 2),
        ]]);
        let state = RunState::new();
        let results = run_query(&request(&["Alpha"]), &source, &HalfScorer, &state)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].posts.len(), 2);
        assert_eq!(results[0].posts[0].score, 0.5);
        assert_eq!(results[0].posts[1].score, 4.0);
        assert_eq!(results[0].net_score, 4.5);
        assert_eq!(results[0].recompute_net_score(), results[0].net_score);
    }

    #[tokio::test]
    async fn empty_location_fails_fast_without_fetching() {
        let source = MockSource::new(vec![]);
        let state = RunState::new();
        let mut req = request(&["Alpha"]);
        req.location = "   ".to_string();

        let err = run_query(&req, &source, &HalfScorer, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(source.calls(), 0);
        assert!(state
            .log
            .lines()
            .iter()
            .any(|l| l.contains("Location cannot be empty")));
    }

    #[tokio::test]
    async fn empty_country_fails_fast_without_fetching() {
        let source = MockSource::new(vec![]);
        let state = RunState::new();
        let mut req = request(&["Alpha"]);
        req.country = String::new();

        let err = run_query(&req, &source, &HalfScorer, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn empty_product_name_fails_fast_without_fetching() {
        let source = MockSource::new(vec![]);
        let state = RunState::new();
        let err = run_query(&request(&["Alpha", " "]), &source, &HalfScorer, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn cancellation_before_start_returns_empty_without_fetching() {
        let source = MockSource::new(vec![vec![make_post("1", 0, 0, 0)]]);
        let state = RunState::new();
        state.cancel.cancel();

        let results = run_query(&request(&["Alpha", "Beta"]), &source, &HalfScorer, &state)
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn interrupt_mid_fetch_keeps_partial_and_skips_rest() {
        let state = RunState::new();
        let mut source = MockSource::new(vec![
            vec![make_post("1", 0, 0, 0), make_post("2", 0, 0, 0)],
            vec![make_post("3", 0, 0, 0)],
        ]);
        // Interrupt arrives after the first batch of whichever product is
        // in flight; products are ["Alpha", "Beta"], so Alpha gets a partial.
        source.cancel_after_batch = Some((state.cancel.clone(), 0));

        let results = run_query(&request(&["Alpha", "Beta"]), &source, &HalfScorer, &state)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product, "Alpha");
        assert_eq!(results[0].posts.len(), 2, "only the first batch");
        assert_eq!(source.calls(), 1, "Beta must never be fetched");
    }

    #[tokio::test]
    async fn fetch_failure_is_recovered_with_partial_result() {
        let mut source = MockSource::new(vec![vec![make_post("1", 0, 0, 0)]]);
        source.fail_at_end = true;
        let state = RunState::new();

        let results = run_query(&request(&["Alpha", "Beta"]), &source, &HalfScorer, &state)
            .await
            .unwrap();

        // Both products processed; the failure is logged, not raised.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].posts.len(), 1);
        assert!(state
            .log
            .lines()
            .iter()
            .any(|l| l.starts_with("Fetch failed for Alpha")));
        assert!(state.log.lines().iter().any(|l| l == "Done"));
    }

    #[tokio::test]
    async fn normal_completion_logs_net_scores_and_done() {
        let source = MockSource::new(vec![vec![make_post("1", 0, 0, 0)]]);
        let state = RunState::new();
        run_query(&request(&["Alpha"]), &source, &HalfScorer, &state)
            .await
            .unwrap();

        let lines = state.log.lines();
        assert!(lines.iter().any(|l| l == "Performing Queries"));
        assert!(lines.iter().any(|l| l.starts_with("Net scores:")));
        assert_eq!(lines.last().map(String::as_str), Some("Done"));
    }

    #[tokio::test]
    async fn progress_lines_append_below_threshold() {
        let source = MockSource::new(vec![
            vec![make_post("1", 0, 0, 0)],
            vec![make_post("2", 0, 0, 0)],
        ]);
        let state = RunState::new();
        run_query(&request(&["Alpha"]), &source, &HalfScorer, &state)
            .await
            .unwrap();

        let lines = state.log.lines();
        assert!(lines.iter().any(|l| l == "\tDownloaded 1"));
        assert!(lines.iter().any(|l| l == "\tDownloaded 2"));
    }
}
