//! Sort stage

use crate::core::field::compare;
use crate::core::query::SortOrder;
use crate::core::record::Record;
use serde_json::Value;
use std::cmp::Ordering;

/// Order records by a field
///
/// No-op without a field. The sort is stable, so records with equal values
/// keep their relative order. Records where the field is missing or `null`
/// go last whatever the direction.
pub fn sort(mut records: Vec<Record>, field: Option<&str>, order: SortOrder) -> Vec<Record> {
    let Some(field) = field else {
        return records;
    };

    records.sort_by(|a, b| compare_field(a, b, field, order));
    records
}

fn compare_field(a: &Record, b: &Record, field: &str, order: SortOrder) -> Ordering {
    match (present(a, field), present(b, field)) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => compare(x, y),
            SortOrder::Descending => compare(x, y).reverse(),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn present<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}
