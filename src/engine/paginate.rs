//! Pagination stage

use crate::core::record::Record;

/// Slice out one 1-based page
///
/// A missing or zero `limit` means "everything"; a missing or zero `page`
/// means the first page. Pages past the end are empty.
pub fn paginate(records: Vec<Record>, limit: Option<usize>, page: Option<usize>) -> Vec<Record> {
    let limit = limit.filter(|l| *l > 0).unwrap_or(records.len());
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let start = (page - 1).saturating_mul(limit);

    if start >= records.len() {
        return Vec::new();
    }

    records.into_iter().skip(start).take(limit).collect()
}
