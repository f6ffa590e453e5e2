//! Filter stage: keep records satisfying every non-reserved query pair

use super::NestedCollection;
use super::matcher::{PredicateMatcher, TextMatch};
use crate::core::query::QueryParams;
use crate::core::record::Record;

/// Apply all field predicates conjunctively
///
/// Each record is tested against the predicates in URL order and rejected on
/// the first one that fails. The input is left untouched.
pub fn filter(matcher: &PredicateMatcher, records: &[Record], params: &QueryParams) -> Vec<Record> {
    records
        .iter()
        .filter(|record| {
            params
                .filters()
                .all(|(key, value)| matcher.matches(record, key, value))
        })
        .cloned()
        .collect()
}

/// Filter a top-level collection, searching inside nested children
///
/// When the collection embeds a nested collection and the query carries the
/// nested text field (e.g. `?title=foo` on users with bookmarks), that key
/// selects parents having at least one child whose text field starts with the
/// query. The key is consumed and the remaining pairs filter the parents
/// directly.
pub fn filter_parents(
    matcher: &PredicateMatcher,
    records: &[Record],
    params: &QueryParams,
    nested: &NestedCollection,
) -> Vec<Record> {
    let embeds_nested = records
        .iter()
        .any(|record| record.has_nested(&nested.field));
    let Some(query) = params.get(&nested.text_field).filter(|_| embeds_nested) else {
        return filter(matcher, records, params);
    };

    let query = query.trim().to_string();
    let mut remaining = params.clone();
    remaining.remove(&nested.text_field);

    let parents: Vec<Record> = if query.is_empty() {
        records.to_vec()
    } else {
        records
            .iter()
            .filter(|record| has_matching_child(matcher, record, nested, &query))
            .cloned()
            .collect()
    };

    filter(matcher, &parents, &remaining)
}

fn has_matching_child(
    matcher: &PredicateMatcher,
    parent: &Record,
    nested: &NestedCollection,
    query: &str,
) -> bool {
    parent
        .nested_records(&nested.field)
        .iter()
        .any(|child| matcher.matches_with(child, &nested.text_field, query, TextMatch::Prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn ids(records: &[Record]) -> Vec<Value> {
        records.iter().map(|r| r.get("id").cloned().unwrap()).collect()
    }

    fn users() -> Vec<Record> {
        records(json!([
            {"id": 1, "name": "Ann", "bookmarks": [{"title": "Footer"}, {"title": "Header"}]},
            {"id": 2, "name": "Bob", "bookmarks": [{"title": "Sidebar"}]},
            {"id": 3, "name": "Anna"}
        ]))
    }

    #[test]
    fn test_empty_value_returns_unfiltered() {
        let data = users();
        let params = QueryParams::from_pairs([("name", "  ")]);
        assert_eq!(filter(&PredicateMatcher::default(), &data, &params), data);
    }

    #[test]
    fn test_reserved_keys_never_filter() {
        let data = users();
        let params = QueryParams::from_pairs([("_sort", "zzz"), ("_limit", "1")]);
        assert_eq!(filter(&PredicateMatcher::default(), &data, &params).len(), 3);
    }

    #[test]
    fn test_predicates_compose_conjunctively() {
        let data = records(json!([
            {"id": 1, "name": "Ann", "city": "Paris"},
            {"id": 2, "name": "Anna", "city": "Lyon"},
            {"id": 3, "name": "Bob", "city": "Paris"}
        ]));
        let params = QueryParams::from_pairs([("name", "an"), ("city", "paris")]);
        let result = filter(&PredicateMatcher::default(), &data, &params);
        assert_eq!(ids(&result), vec![json!(1)]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let data = users();
        let before = data.clone();
        let _ = filter(
            &PredicateMatcher::default(),
            &data,
            &QueryParams::from_pairs([("name", "bob")]),
        );
        assert_eq!(data, before);
    }

    #[test]
    fn test_parent_title_searches_nested_children() {
        let data = users();
        let params = QueryParams::from_pairs([("title", "foo")]);
        let result = filter_parents(
            &PredicateMatcher::default(),
            &data,
            &params,
            &NestedCollection::default(),
        );
        assert_eq!(ids(&result), vec![json!(1)]);
    }

    #[test]
    fn test_nested_search_is_prefix_only() {
        let data = users();
        let params = QueryParams::from_pairs([("title", "oot")]);
        let result = filter_parents(
            &PredicateMatcher::default(),
            &data,
            &params,
            &NestedCollection::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_nested_search_combines_with_other_filters() {
        let data = users();
        let nested = NestedCollection::default();
        let matcher = PredicateMatcher::default();

        let params = QueryParams::from_pairs([("title", "side"), ("name", "bo")]);
        assert_eq!(ids(&filter_parents(&matcher, &data, &params, &nested)), vec![json!(2)]);

        let params = QueryParams::from_pairs([("title", "side"), ("name", "ann")]);
        assert!(filter_parents(&matcher, &data, &params, &nested).is_empty());
    }

    #[test]
    fn test_blank_nested_query_is_noop() {
        let data = users();
        let params = QueryParams::from_pairs([("title", " ")]);
        let result = filter_parents(
            &PredicateMatcher::default(),
            &data,
            &params,
            &NestedCollection::default(),
        );
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_collection_without_nested_filters_directly() {
        let data = records(json!([
            {"id": 1, "title": "Footer"},
            {"id": 2, "title": "Header"}
        ]));
        let params = QueryParams::from_pairs([("title", "foo")]);
        let result = filter_parents(
            &PredicateMatcher::default(),
            &data,
            &params,
            &NestedCollection::default(),
        );
        assert_eq!(ids(&result), vec![json!(1)]);
    }
}
