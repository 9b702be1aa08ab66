use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query parameters for the Search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    #[serde(rename = "JobCategoryCode")]
    pub job_category_code: String,
    #[serde(rename = "ResultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "Fields")]
    pub fields: String,
}

impl SearchQuery {
    /// Full-detail query for a single occupational series (e.g. "2210").
    pub fn for_series(series: impl Into<String>) -> Self {
        Self {
            job_category_code: series.into(),
            results_per_page: 500,
            fields: "full".to_string(),
        }
    }

    pub fn with_results_per_page(mut self, per_page: u32) -> Self {
        self.results_per_page = per_page;
        self
    }
}

/// Top-level Search response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "SearchResult", default)]
    pub search_result: SearchResult,
}

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "SearchResultCount", default)]
    pub count: u64,
    #[serde(rename = "SearchResultCountAll", default)]
    pub count_all: u64,
    #[serde(rename = "SearchResultItems", default)]
    pub items: Vec<SearchResultItem>,
}

/// A single job announcement as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "MatchedObjectId", default)]
    pub matched_object_id: Option<String>,
    #[serde(rename = "MatchedObjectDescriptor", default)]
    pub descriptor: PositionDescriptor,
}

/// Announcement details. Every field is optional: the API omits fields freely
/// and callers decide which ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionDescriptor {
    #[serde(rename = "PositionID", default)]
    pub position_id: Option<String>,
    #[serde(rename = "PositionTitle", default)]
    pub position_title: Option<String>,
    #[serde(rename = "PositionURI", default)]
    pub position_uri: Option<String>,
    #[serde(rename = "PositionStartDate", default)]
    pub position_start_date: Option<String>,
    #[serde(rename = "PublicationStartDate", default)]
    pub publication_start_date: Option<String>,
    #[serde(rename = "OrganizationName", default)]
    pub organization_name: Option<String>,
    #[serde(rename = "DepartmentName", default)]
    pub department_name: Option<String>,
    #[serde(rename = "JobCategory", default)]
    pub job_category: Vec<JobCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCategory {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
}

impl PositionDescriptor {
    /// Posting date, preferring `PositionStartDate` over `PublicationStartDate`.
    ///
    /// Timestamps such as `2025-10-03T00:00:00.0000` are cut at the `T`.
    pub fn posted_date(&self) -> Option<NaiveDate> {
        [&self.position_start_date, &self.publication_start_date]
            .into_iter()
            .flatten()
            .find_map(|raw| parse_api_date(raw))
    }

    /// First series code listed under `JobCategory`.
    pub fn series_code(&self) -> Option<&str> {
        self.job_category
            .iter()
            .find_map(|c| c.code.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Public announcement link with the explicit `:443` port removed.
    pub fn public_link(&self) -> Option<String> {
        self.position_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .map(|uri| uri.replace(":443", ""))
    }
}

/// Parse the date portion of a USAJobs timestamp.
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next()?.trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
