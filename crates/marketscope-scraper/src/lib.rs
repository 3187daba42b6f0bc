//! Page retrieval and text extraction for market analysis.

pub mod error;
pub mod fetcher;
pub mod html;
pub mod keywords;

pub use error::FetchError;
pub use fetcher::{parse_http_url, ContentFetcher, PageContent};
pub use keywords::{keyword_hits, COMPETITOR_KEYWORDS, USER_RESEARCH_KEYWORDS};
