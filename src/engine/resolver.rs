//! Resolution of read requests
//!
//! A read target is the whole store, a collection, a single record, or the
//! nested collection of a record. Collection-shaped targets always go through
//! Filter → Sort → Pagination, in that order.

use super::{QueryEngine, Target, filter, paginate, sort};
use crate::core::error::EngineError;
use crate::core::query::QueryParams;
use crate::core::record::{Record, Store};
use serde_json::Value;

/// Result of a read
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// `GET /`: the entire store
    Store(Store),

    /// `GET /{resource}/{id}`
    Record(Record),

    /// A page of a collection
    Collection {
        items: Vec<Record>,
        /// Number of records after filtering, before pagination
        total: usize,
    },
}

impl Resolved {
    pub fn total_count(&self) -> Option<usize> {
        match self {
            Resolved::Collection { total, .. } => Some(*total),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Resolved::Store(store) => store.to_value(),
            Resolved::Record(record) => record.into_value(),
            Resolved::Collection { items, .. } => {
                Value::Array(items.into_iter().map(Record::into_value).collect())
            }
        }
    }
}

impl QueryEngine {
    /// Resolve a read target against the store
    pub fn resolve(
        &self,
        store: &Store,
        target: &Target,
        params: &QueryParams,
    ) -> Result<Resolved, EngineError> {
        let Some(resource) = target.resource.as_deref() else {
            return Ok(Resolved::Store(store.clone()));
        };

        let records = store
            .collection(resource)
            .ok_or_else(|| EngineError::resource_not_found(resource))?;

        match (target.id.as_deref(), target.subresource.as_deref()) {
            (Some(id), Some(subresource)) => {
                if subresource != self.nested.field {
                    return Err(EngineError::resource_not_found(format!(
                        "{}/{}/{}",
                        resource, id, subresource
                    )));
                }
                let parent = find(&records, resource, id)?;
                let children = parent.nested_records(&self.nested.field);
                let filtered = filter::filter(&self.matcher, &children, params);
                Ok(self.finish(filtered, params))
            }
            (Some(id), None) => find(&records, resource, id).cloned().map(Resolved::Record),
            (None, _) => {
                let filtered =
                    filter::filter_parents(&self.matcher, &records, params, &self.nested);
                Ok(self.finish(filtered, params))
            }
        }
    }

    /// Sort then paginate an already filtered collection
    fn finish(&self, filtered: Vec<Record>, params: &QueryParams) -> Resolved {
        let total = filtered.len();
        let sorted = sort::sort(filtered, params.sort_field(), params.order());
        let items = paginate::paginate(sorted, params.limit(), params.page());
        Resolved::Collection { items, total }
    }
}

fn find<'a>(records: &'a [Record], resource: &str, id: &str) -> Result<&'a Record, EngineError> {
    records
        .iter()
        .find(|record| record.has_id(id))
        .ok_or_else(|| EngineError::record_not_found(resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Store {
        Store::from_value(json!({
            "users": [
                {"id": 1, "name": "Ann", "bookmarks": [
                    {"title": "Footer", "url": "https://a.example/footer"},
                    {"title": "Header", "url": "https://a.example/header"}
                ]},
                {"id": "users_1700000000000", "name": "Bo", "bookmarks": []},
                {"id": 3, "name": "Cy", "bookmarks": "not a list"}
            ],
            "posts": [
                {"id": 1, "title": "Hello", "views": 10},
                {"id": 2, "title": "World", "views": 30},
                {"id": 3, "title": "Help", "views": 20}
            ]
        }))
        .unwrap()
    }

    fn engine() -> QueryEngine {
        QueryEngine::default()
    }

    fn items(resolved: Resolved) -> Vec<Value> {
        match resolved {
            Resolved::Collection { items, .. } => {
                items.into_iter().map(Record::into_value).collect()
            }
            other => panic!("expected a collection, got {:?}", other),
        }
    }

    #[test]
    fn test_no_resource_returns_whole_store() {
        let store = store();
        let resolved = engine()
            .resolve(&store, &Target::default(), &QueryParams::new())
            .unwrap();
        assert_eq!(resolved, Resolved::Store(store));
    }

    #[test]
    fn test_unknown_resource() {
        let err = engine()
            .resolve(&store(), &Target::collection("widgets"), &QueryParams::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::ResourceNotFound { resource } if resource == "widgets"));
    }

    #[test]
    fn test_single_record_by_numeric_and_text_id() {
        let engine = engine();
        let store = store();
        let resolved = engine
            .resolve(&store, &Target::record("users", "1"), &QueryParams::new())
            .unwrap();
        assert!(matches!(resolved, Resolved::Record(r) if r.get("name") == Some(&json!("Ann"))));

        let resolved = engine
            .resolve(
                &store,
                &Target::record("users", "users_1700000000000"),
                &QueryParams::new(),
            )
            .unwrap();
        assert!(matches!(resolved, Resolved::Record(r) if r.get("name") == Some(&json!("Bo"))));
    }

    #[test]
    fn test_missing_record() {
        let err = engine()
            .resolve(&store(), &Target::record("users", "999"), &QueryParams::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::RecordNotFound { .. }));
    }

    #[test]
    fn test_nested_collection_filtered_by_prefix() {
        let resolved = engine()
            .resolve(
                &store(),
                &Target::nested("users", "1", "bookmarks"),
                &QueryParams::from_pairs([("title", "foo")]),
            )
            .unwrap();
        assert_eq!(
            items(resolved),
            vec![json!({"title": "Footer", "url": "https://a.example/footer"})]
        );
    }

    #[test]
    fn test_nested_collection_sorted_and_paginated() {
        let resolved = engine()
            .resolve(
                &store(),
                &Target::nested("users", "1", "bookmarks"),
                &QueryParams::from_pairs([("_sort", "title"), ("_order", "desc"), ("_limit", "1")]),
            )
            .unwrap();
        assert_eq!(resolved.total_count(), Some(2));
        let titles: Vec<Value> = items(resolved).into_iter().map(|b| b["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Header")]);
    }

    #[test]
    fn test_nested_collection_defaults_to_empty() {
        let resolved = engine()
            .resolve(
                &store(),
                &Target::nested("users", "3", "bookmarks"),
                &QueryParams::new(),
            )
            .unwrap();
        assert!(items(resolved).is_empty());
    }

    #[test]
    fn test_nested_collection_of_missing_parent() {
        let err = engine()
            .resolve(
                &store(),
                &Target::nested("users", "42", "bookmarks"),
                &QueryParams::new(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::RecordNotFound { id, .. } if id == "42"));
    }

    #[test]
    fn test_unknown_subresource() {
        let err = engine()
            .resolve(
                &store(),
                &Target::nested("users", "1", "friends"),
                &QueryParams::new(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_parent_search_through_bookmarks() {
        let resolved = engine()
            .resolve(
                &store(),
                &Target::collection("users"),
                &QueryParams::from_pairs([("title", "foo")]),
            )
            .unwrap();
        let found = items(resolved);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], json!(1));
    }

    #[test]
    fn test_filter_runs_before_sort_and_pagination() {
        let resolved = engine()
            .resolve(
                &store(),
                &Target::collection("posts"),
                &QueryParams::from_pairs([
                    ("_limit", "1"),
                    ("_sort", "views"),
                    ("_order", "desc"),
                    ("title", "hel"),
                ]),
            )
            .unwrap();
        assert_eq!(resolved.total_count(), Some(2));
        let found = items(resolved);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], json!(3));
    }
}
