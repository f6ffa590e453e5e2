//! Mutation handlers: create, replace, merge and delete one record
//!
//! Mutations never run the query stages and never reorder unaffected records.
//! The `id` field of a payload is ignored: identifiers are assigned at creation
//! and stay fixed afterwards.

use crate::core::error::EngineError;
use crate::core::id::IdGenerator;
use crate::core::record::{ID_FIELD, Record, Store, position_of};
use serde_json::{Map, Value};

/// Append a new record with a generated identifier
///
/// The collection is created on first write. A key holding anything other
/// than a collection of records is not a writable resource.
pub fn create(
    store: &mut Store,
    resource: &str,
    payload: Value,
    ids: &dyn IdGenerator,
) -> Result<Record, EngineError> {
    let fields = payload_fields(payload)?;

    let mut record = Record::new();
    record.insert(ID_FIELD, Value::String(ids.new_id(resource)));
    overlay(&mut record, fields);

    store
        .ensure_collection(resource)
        .ok_or_else(|| EngineError::resource_not_found(resource))?
        .push(record.clone());
    Ok(record)
}

/// Replace every field of a record except its identifier
pub fn replace(
    store: &mut Store,
    resource: &str,
    id: &str,
    payload: Value,
) -> Result<Record, EngineError> {
    let (collection, index) = locate(store, resource, id)?;
    let fields = payload_fields(payload)?;

    let mut record = Record::new();
    if let Some(stored_id) = collection[index].get(ID_FIELD) {
        record.insert(ID_FIELD, stored_id.clone());
    }
    overlay(&mut record, fields);

    collection[index] = record.clone();
    Ok(record)
}

/// Overlay payload fields on a record, keeping the others
pub fn merge(
    store: &mut Store,
    resource: &str,
    id: &str,
    payload: Value,
) -> Result<Record, EngineError> {
    let (collection, index) = locate(store, resource, id)?;
    let fields = payload_fields(payload)?;

    let record = &mut collection[index];
    overlay(record, fields);
    Ok(record.clone())
}

/// Remove a record and return it
pub fn delete(store: &mut Store, resource: &str, id: &str) -> Result<Record, EngineError> {
    let (collection, index) = locate(store, resource, id)?;
    Ok(collection.remove(index))
}

fn locate<'a>(
    store: &'a mut Store,
    resource: &str,
    id: &str,
) -> Result<(&'a mut Vec<Record>, usize), EngineError> {
    let collection = store
        .collection_mut(resource)
        .ok_or_else(|| EngineError::resource_not_found(resource))?;
    let index =
        position_of(collection, id).ok_or_else(|| EngineError::record_not_found(resource, id))?;
    Ok((collection, index))
}

fn payload_fields(payload: Value) -> Result<Map<String, Value>, EngineError> {
    match payload {
        Value::Object(fields) => Ok(fields),
        _ => Err(EngineError::malformed("request body must be a JSON object")),
    }
}

fn overlay(record: &mut Record, fields: Map<String, Value>) {
    for (key, value) in fields {
        if key != ID_FIELD {
            record.insert(key, value);
        }
    }
}
