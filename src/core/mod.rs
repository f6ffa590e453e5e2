//! Core module containing the data model, query parameters and errors

pub mod error;
pub mod field;
pub mod id;
pub mod query;
pub mod record;

pub use error::{EngineError, ErrorResponse, StorageError};
pub use id::{IdGenerator, TimestampIdGenerator, UuidIdGenerator};
pub use query::{QueryParams, SortOrder};
pub use record::{Record, RecordId, Store};
