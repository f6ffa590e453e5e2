//! Query-resolution engine
//!
//! The engine is pure and synchronous: it receives an explicit [`Store`], a
//! parsed [`Request`] and an [`IdGenerator`], and returns an [`Outcome`] or an
//! [`EngineError`]. Loading and saving the store is the caller's business; the
//! outcome tells whether the store was mutated.
//!
//! ```text
//! Request ─┬─ Read ──► resolver ──► Filter ──► Sort ──► Pagination ──► Resolved
//!          └─ Write ─► mutation (create | replace | merge | delete) ──► Record
//! ```

pub mod filter;
pub mod matcher;
pub mod mutation;
pub mod paginate;
pub mod resolver;
pub mod sort;

pub use matcher::{PredicateMatcher, TextMatch};
pub use resolver::Resolved;

use crate::config::MatchConfig;
use crate::core::error::EngineError;
use crate::core::id::IdGenerator;
use crate::core::query::QueryParams;
use crate::core::record::{Record, Store};
use axum::http::{Method, StatusCode};
use serde_json::Value;

/// The nested collection carried by parent records (e.g. `bookmarks`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedCollection {
    /// Field of the parent holding the child sequence
    pub field: String,
    /// Text field of the children searched from the parent collection
    pub text_field: String,
}

impl Default for NestedCollection {
    fn default() -> Self {
        Self {
            field: "bookmarks".to_string(),
            text_field: "title".to_string(),
        }
    }
}

/// What a request asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Replace,
    Merge,
    Delete,
}

impl Action {
    /// Map an HTTP method to an action
    ///
    /// `OPTIONS` is answered by the transport layer and is not an action.
    pub fn from_method(method: &Method) -> Result<Self, EngineError> {
        match *method {
            Method::GET => Ok(Action::Read),
            Method::POST => Ok(Action::Create),
            Method::PUT => Ok(Action::Replace),
            Method::PATCH => Ok(Action::Merge),
            Method::DELETE => Ok(Action::Delete),
            _ => Err(EngineError::InvalidMethod {
                method: method.to_string(),
            }),
        }
    }

    pub fn is_write(self) -> bool {
        self != Action::Read
    }
}

/// Resource path of a request: `/{resource}/{id}/{subresource}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub resource: Option<String>,
    pub id: Option<String>,
    pub subresource: Option<String>,
}

impl Target {
    pub fn collection(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }

    pub fn record(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            id: Some(id.into()),
            subresource: None,
        }
    }

    pub fn nested(
        resource: impl Into<String>,
        id: impl Into<String>,
        subresource: impl Into<String>,
    ) -> Self {
        Self {
            resource: Some(resource.into()),
            id: Some(id.into()),
            subresource: Some(subresource.into()),
        }
    }

    /// Build a target from non-empty path segments
    ///
    /// Paths deeper than three segments address nothing.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Result<Self, EngineError> {
        if segments.len() > 3 {
            let path: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
            return Err(EngineError::resource_not_found(path.join("/")));
        }

        let mut parts = segments.iter().map(|s| s.as_ref().to_string());
        Ok(Self {
            resource: parts.next(),
            id: parts.next(),
            subresource: parts.next(),
        })
    }
}

/// A parsed request, as handed over by the transport layer
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub action: Action,
    pub target: Target,
    pub params: QueryParams,
    /// JSON body of a write; `None` is treated as an empty object
    pub body: Option<Value>,
}

impl Request {
    pub fn read(target: Target, params: QueryParams) -> Self {
        Self {
            action: Action::Read,
            target,
            params,
            body: None,
        }
    }

    pub fn write(action: Action, target: Target, body: Value) -> Self {
        Self {
            action,
            target,
            params: QueryParams::new(),
            body: Some(body),
        }
    }
}

/// Successful result of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Read(Resolved),
    Created(Record),
    Updated(Record),
    Deleted(Record),
}

impl Outcome {
    /// Whether the store was changed and must be persisted
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Outcome::Read(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Outcome::Created(_) => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Outcome::Read(resolved) => resolved.into_value(),
            Outcome::Created(record) | Outcome::Updated(record) | Outcome::Deleted(record) => {
                record.into_value()
            }
        }
    }
}

/// The query-resolution engine with its matching rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEngine {
    matcher: PredicateMatcher,
    nested: NestedCollection,
}

impl QueryEngine {
    pub fn new(matcher: PredicateMatcher, nested: NestedCollection) -> Self {
        Self { matcher, nested }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(
            PredicateMatcher::new(config.prefix_fields.iter().cloned()),
            NestedCollection {
                field: config.nested_field.clone(),
                text_field: config.nested_text_field.clone(),
            },
        )
    }

    pub fn matcher(&self) -> &PredicateMatcher {
        &self.matcher
    }

    pub fn nested(&self) -> &NestedCollection {
        &self.nested
    }

    /// Run one request against the store
    pub fn execute(
        &self,
        store: &mut Store,
        request: Request,
        ids: &dyn IdGenerator,
    ) -> Result<Outcome, EngineError> {
        let Request {
            action,
            target,
            params,
            body,
        } = request;

        match action {
            Action::Read => self.resolve(store, &target, &params).map(Outcome::Read),
            _ => self.write(store, action, &target, body, ids),
        }
    }

    fn write(
        &self,
        store: &mut Store,
        action: Action,
        target: &Target,
        body: Option<Value>,
        ids: &dyn IdGenerator,
    ) -> Result<Outcome, EngineError> {
        let resource = target
            .resource
            .as_deref()
            .ok_or_else(|| EngineError::malformed("a resource name is required"))?;
        if target.subresource.is_some() {
            return Err(EngineError::malformed(
                "nested collections cannot be written directly",
            ));
        }
        let body = body.unwrap_or_else(|| Value::Object(Default::default()));

        match (action, target.id.as_deref()) {
            (Action::Create, None) => {
                mutation::create(store, resource, body, ids).map(Outcome::Created)
            }
            (Action::Create, Some(_)) => Err(EngineError::malformed(
                "records are created on the collection path",
            )),
            (Action::Replace, Some(id)) => {
                mutation::replace(store, resource, id, body).map(Outcome::Updated)
            }
            (Action::Merge, Some(id)) => {
                mutation::merge(store, resource, id, body).map(Outcome::Updated)
            }
            (Action::Delete, Some(id)) => mutation::delete(store, resource, id).map(Outcome::Deleted),
            _ => Err(EngineError::malformed("a record id is required")),
        }
    }
}
