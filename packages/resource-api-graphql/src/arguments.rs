//! Extraction of the arguments the serialization stage cares about from a
//! resolved GraphQL field.
use crate::{GraphqlError, GraphqlResult};
use async_graphql_value::ConstValue;
use serde_json::{Map, Value};

/// Relay connection arguments.
///
/// `first` is accepted and validated but the offset window is derived from
/// `after`, `before` and `last` only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorArgs {
    pub first: Option<u64>,
    pub after: Option<String>,
    pub last: Option<u64>,
    pub before: Option<String>,
}

impl CursorArgs {
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..Self::default()
        }
    }

    pub fn before(cursor: impl Into<String>) -> Self {
        Self {
            before: Some(cursor.into()),
            ..Self::default()
        }
    }

    pub fn last(count: u64) -> Self {
        Self {
            last: Some(count),
            ..Self::default()
        }
    }
}

/// Arguments of a field, as far as serialization is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveArguments {
    pub cursor: CursorArgs,

    /// `input.clientMutationId`, echoed back in mutation payloads.
    pub client_mutation_id: Option<String>,

    /// `input.clientSubscriptionId`, echoed back in subscription payloads.
    pub client_subscription_id: Option<String>,

    /// `input.id`, the identifier of the item a delete mutation targets.
    pub id: Option<String>,
}

impl ResolveArguments {
    /// Read the arguments object of a field. Anything other than an object
    /// (e.g. a field without arguments, `null`) yields the defaults.
    pub fn from_value(args: &ConstValue) -> GraphqlResult<Self> {
        let args = match args {
            ConstValue::Object(_) => args.clone().into_json()?,
            _ => return Ok(Self::default()),
        };
        let args = match args.as_object() {
            Some(map) => map,
            None => return Ok(Self::default()),
        };

        let cursor = CursorArgs {
            first: opt_count(args, "first")?,
            after: opt_string(args, "after")?,
            last: opt_count(args, "last")?,
            before: opt_string(args, "before")?,
        };

        let mut resolved = Self {
            cursor,
            ..Self::default()
        };

        match args.get("input") {
            Some(Value::Object(input)) => {
                resolved.client_mutation_id = opt_string(input, "clientMutationId")?;
                resolved.client_subscription_id =
                    opt_string(input, "clientSubscriptionId")?;
                resolved.id = opt_id(input, "id")?;
            }
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(GraphqlError::InvalidArgument(
                    "input".to_string(),
                    "expected an input object".to_string(),
                ))
            }
        }

        Ok(resolved)
    }
}

fn opt_string(
    map: &Map<String, Value>,
    key: &str,
) -> GraphqlResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(GraphqlError::InvalidArgument(
            key.to_string(),
            "expected a string".to_string(),
        )),
    }
}

fn opt_count(map: &Map<String, Value>, key: &str) -> GraphqlResult<Option<u64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            GraphqlError::InvalidArgument(
                key.to_string(),
                format!("expected a non-negative integer, got {n}"),
            )
        }),
        Some(_) => Err(GraphqlError::InvalidArgument(
            key.to_string(),
            "expected a non-negative integer".to_string(),
        )),
    }
}

fn opt_id(map: &Map<String, Value>, key: &str) -> GraphqlResult<Option<String>> {
    match map.get(key) {
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => opt_string(map, key),
    }
}
