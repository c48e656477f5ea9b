//! pagefetch: single-shot HTTP fetching and extraction of JSON records
//! embedded in server-rendered pages.

pub mod extract;
pub mod fetcher;
pub mod transform;
pub mod types;

pub use extract::{extract_record, ExtractorConfig};
pub use fetcher::{merge_headers, Fetcher, ReqwestFetcher};
pub use transform::{apply, compact, filter_record, transform};
pub use types::*;
