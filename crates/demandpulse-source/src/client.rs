//! HTTP client for the post-search service's `/v1/posts/search` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use demandpulse_core::{Post, PostQuery};

use crate::error::SourceError;
use crate::retry::retry_with_backoff;
use crate::source::{BatchHandler, PostSource};
use crate::types::{BatchControl, FetchOutcome, FetchStatus, SearchPage};

/// Maximum number of pages to fetch before giving up on a query.
/// Prevents infinite loops on cycling cursors.
pub(crate) const MAX_PAGES: usize = 500;

/// HTTP-backed [`PostSource`].
///
/// Pages through search results via the `cursor` query parameter, delivering
/// each page as one batch. Rate limits (429) and network failures are retried
/// with exponential backoff; other errors end the fetch with whatever was
/// accumulated.
pub struct HttpPostSource {
    client: Client,
    base_url: String,
    /// Posts requested per page.
    page_size: u32,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl HttpPostSource {
    /// Creates a source client with configured timeout, `User-Agent`, page
    /// size, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        page_size: u32,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            page_size,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a source client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &demandpulse_core::AppConfig) -> Result<Self, SourceError> {
        Self::new(
            &config.source_base_url,
            config.source_request_timeout_secs,
            &config.source_user_agent,
            config.source_page_size,
            config.source_max_retries,
            config.source_retry_backoff_base_secs,
        )
    }

    fn search_url(&self, query: &PostQuery, limit: u32, cursor: Option<&str>) -> String {
        let enc = |s: &str| utf8_percent_encode(s, NON_ALPHANUMERIC).to_string();
        let mut url = format!(
            "{}/v1/posts/search?q={}&near={}&since={}&until={}&lang={}&limit={limit}",
            self.base_url,
            enc(&query.query),
            enc(&query.near),
            query.since,
            query.until,
            enc(&query.lang),
        );
        if let Some(cursor) = cursor {
            url.push_str("&cursor=");
            url.push_str(&enc(cursor));
        }
        url
    }

    /// Fetches one page of search results, with automatic retry on transient
    /// errors.
    async fn fetch_page(&self, url: &str) -> Result<SearchPage, SourceError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status.as_u16() == 429 {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(SourceError::RateLimited { retry_after_secs });
                }
                if status.as_u16() == 404 {
                    return Err(SourceError::NotFound { url: url.clone() });
                }
                if !status.is_success() {
                    return Err(SourceError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.clone(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<SearchPage>(&body).map_err(|e| SourceError::Deserialize {
                    context: url.clone(),
                    source: e,
                })
            }
        })
        .await
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch(&self, query: &PostQuery, on_batch: BatchHandler<'_>) -> FetchOutcome {
        let cap = query.max_posts.as_limit();
        let mut posts: Vec<Post> = Vec::new();
        let mut batches = 0usize;
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            pages += 1;
            if pages > MAX_PAGES {
                return FetchOutcome {
                    posts,
                    batches,
                    status: FetchStatus::Failed(SourceError::PageLimit {
                        query: query.query.clone(),
                        max_pages: MAX_PAGES,
                    }),
                };
            }

            // Saturating in case the service over-delivers on a page.
            let remaining =
                cap.map(|cap| cap.saturating_sub(u32::try_from(posts.len()).unwrap_or(u32::MAX)));
            let limit = match remaining {
                Some(0) => break,
                Some(r) => self.page_size.min(r),
                None => self.page_size,
            };

            let url = self.search_url(query, limit, cursor.as_deref());
            let page = match self.fetch_page(&url).await {
                Ok(page) => page,
                Err(e) => {
                    return FetchOutcome {
                        posts,
                        batches,
                        status: FetchStatus::Failed(e),
                    };
                }
            };

            let batch: Vec<Post> = page.posts.into_iter().map(Post::from).collect();
            if !batch.is_empty() {
                batches += 1;
                posts.extend(batch.iter().cloned());
                if on_batch(&batch) == BatchControl::Stop {
                    return FetchOutcome {
                        posts,
                        batches,
                        status: FetchStatus::Stopped,
                    };
                }
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
            if cap.is_some_and(|cap| posts.len() >= cap as usize) {
                break;
            }
        }

        FetchOutcome {
            posts,
            batches,
            status: FetchStatus::Complete,
        }
    }
}
