//! Pure USAJobs Search REST API client.
//!
//! A minimal client for `data.usajobs.gov`. Supports fetching a single page of
//! search results and walking every page for a query.
//!
//! # Example
//!
//! ```rust,ignore
//! use usajobs_client::{SearchQuery, UsaJobsClient};
//!
//! let client = UsaJobsClient::new("your-api-key".into())?;
//!
//! let items = client.search_all(&SearchQuery::for_series("2210")).await?;
//! for item in &items {
//!     println!("{}", item.descriptor.position_title.as_deref().unwrap_or("(untitled)"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, UsaJobsError};
pub use types::{
    parse_api_date, JobCategory, PositionDescriptor, SearchQuery, SearchResponse, SearchResult,
    SearchResultItem,
};

use std::time::Duration;

const BASE_URL: &str = "https://data.usajobs.gov/api/Search";
const HOST: &str = "data.usajobs.gov";

pub struct UsaJobsClient {
    client: reqwest::Client,
    api_key: String,
    user_agent: Option<String>,
    base_url: String,
}

impl UsaJobsClient {
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(UsaJobsError::Config("USAJobs API key is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_key,
            user_agent: None,
            base_url: BASE_URL.to_string(),
        })
    }

    /// USAJobs asks callers to identify themselves with an email address.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Point the client at a different endpoint (staging, local fixture server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch one page (1-based) of results.
    pub async fn search_page(&self, query: &SearchQuery, page: u32) -> Result<SearchResult> {
        let mut request = self
            .client
            .get(&self.base_url)
            .header("Host", HOST)
            .header("Authorization-Key", &self.api_key)
            .query(query)
            .query(&[("Page", page)]);

        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UsaJobsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.search_result)
    }

    /// Walk every page until the API returns an empty page or the reported
    /// total has been collected.
    pub async fn search_all(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>> {
        tracing::info!(series = %query.job_category_code, "Fetching USAJobs announcements");

        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = self.search_page(query, page).await?;
            if result.items.is_empty() {
                break;
            }

            let page_len = result.items.len();
            all_items.extend(result.items);
            tracing::debug!(page, count = page_len, total = all_items.len(), "Fetched page");

            if is_last_page(all_items.len(), result.count_all) {
                break;
            }
            page += 1;
        }

        tracing::info!(count = all_items.len(), "Fetched USAJobs announcements");
        Ok(all_items)
    }
}

fn is_last_page(collected: usize, count_all: u64) -> bool {
    collected as u64 >= count_all
}
