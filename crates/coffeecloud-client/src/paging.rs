//! Offset/limit pagination over CoffeeCloud listings
//!
//! Listings are requested page by page with a fixed page size. Records are
//! deduplicated by their natural key; the first occurrence wins and fetch order
//! is preserved.

use std::collections::HashSet;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Result;

/// Fixed number of records requested per page
pub const PAGE_SIZE: u64 = 100;

/// Field the error and health listings are sorted by
const SORT_FIELD: &str = "timestamp";

/// Record identity used for deduplication and joins
pub trait NaturalKey {
    fn natural_key(&self) -> String;
}

/// Body of a paged listing request
#[derive(Clone, Debug, Serialize)]
pub struct PageRequest {
    pub count: bool,
    pub criteria: Map<String, Value>,
    pub limit: u64,
    pub offset: u64,
    pub sort: Map<String, Value>,
}

impl PageRequest {
    /// Request the page starting at `offset`
    pub fn at(offset: u64) -> Self {
        Self {
            count: true,
            criteria: Map::new(),
            limit: PAGE_SIZE,
            offset,
            sort: Map::new(),
        }
    }

    /// Ask the server for the newest records first
    pub fn newest_first(mut self) -> Self {
        self.sort
            .insert(SORT_FIELD.to_string(), Value::String("desc".to_string()));
        self
    }
}

/// One page of a listing as reported by the server
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

/// Fetch every page of a listing.
///
/// The loop advances `offset` by the page size and stops once the offset reaches
/// the count reported by the last page, or when a page comes back empty. Any error
/// aborts the whole listing.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    T: NaturalKey,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut offset = 0u64;

    loop {
        let page = fetch_page(offset).await?;
        let fetched = page.result.len();

        for record in page.result {
            let key = record.natural_key();
            if seen.insert(key) {
                records.push(record);
            } else {
                trace!("Dropping duplicate record {}", record.natural_key());
            }
        }

        offset += PAGE_SIZE;
        if fetched == 0 || offset >= page.count {
            break;
        }
    }

    Ok(records)
}

/// Drop records whose natural key was already seen, keeping the first
pub fn dedup_by_natural_key<T: NaturalKey>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.natural_key()))
        .collect()
}
