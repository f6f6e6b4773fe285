//! The serialization stage of GraphQL resolution: turns whatever a resolver
//! returned into the shape the response layer expects.
use crate::{
    arguments::{CursorArgs, ResolveArguments},
    collection::ResourceCollection,
    normalizer::{NormalizationContext, Normalizer, FORMAT},
    pagination::{CursorPage, CursorPaginator, PagePage, PagePaginator},
    util::lcfirst,
    GraphqlError, GraphqlResult,
};
use resource_api_lib::config::{PaginationConfig, PaginationStyle};
use serde_json::{json, Map, Value};
use tracing::{debug, trace};

const CLIENT_MUTATION_ID: &str = "clientMutationId";
const CLIENT_SUBSCRIPTION_ID: &str = "clientSubscriptionId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationType {
    #[default]
    Query,
    Mutation,

    /// A mutation removing an item; its payload only carries the identifier.
    DeleteMutation,
    Subscription,
}

impl OperationType {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation | Self::DeleteMutation)
    }

    pub fn is_subscription(&self) -> bool {
        matches!(self, Self::Subscription)
    }
}

/// Everything the serialization stage needs to know about the field being
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveContext {
    /// Short name of the resource, e.g. `Book`.
    pub resource_short_name: String,

    /// Name of the operation, e.g. `item_query`, `collection_query`, `create`.
    pub operation_name: String,

    pub operation_type: OperationType,

    pub is_collection: bool,

    /// Whether the operation wants its result serialized at all.
    pub serialize: bool,

    pub pagination: PaginationConfig,

    pub args: CursorArgs,

    /// Client id echoed in mutation and subscription payloads.
    pub client_id: Option<String>,

    /// Identifier of the item removed by a delete mutation.
    pub identifier: Option<String>,

    /// Top-level fields selected by the client.
    pub attributes: Option<Vec<String>>,
}

impl ResolveContext {
    fn new(
        resource_short_name: impl Into<String>,
        operation_name: impl Into<String>,
        operation_type: OperationType,
        is_collection: bool,
    ) -> Self {
        Self {
            resource_short_name: resource_short_name.into(),
            operation_name: operation_name.into(),
            operation_type,
            is_collection,
            serialize: true,
            pagination: PaginationConfig::default(),
            args: CursorArgs::default(),
            client_id: None,
            identifier: None,
            attributes: None,
        }
    }

    pub fn item_query(resource_short_name: impl Into<String>) -> Self {
        Self::new(resource_short_name, "item_query", OperationType::Query, false)
    }

    pub fn collection_query(
        resource_short_name: impl Into<String>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            pagination,
            ..Self::new(
                resource_short_name,
                "collection_query",
                OperationType::Query,
                true,
            )
        }
    }

    pub fn mutation(
        resource_short_name: impl Into<String>,
        operation_name: impl Into<String>,
    ) -> Self {
        Self::new(
            resource_short_name,
            operation_name,
            OperationType::Mutation,
            false,
        )
    }

    pub fn delete_mutation(resource_short_name: impl Into<String>) -> Self {
        Self::new(
            resource_short_name,
            "delete",
            OperationType::DeleteMutation,
            false,
        )
    }

    pub fn subscription(resource_short_name: impl Into<String>) -> Self {
        Self::new(
            resource_short_name,
            "update_subscription",
            OperationType::Subscription,
            false,
        )
    }

    /// Take cursor arguments, client ids and the deleted identifier from the
    /// field's arguments.
    pub fn with_arguments(mut self, args: ResolveArguments) -> Self {
        self.client_id = match self.operation_type {
            OperationType::Subscription => args.client_subscription_id,
            OperationType::Mutation | OperationType::DeleteMutation => {
                args.client_mutation_id
            }
            OperationType::Query => None,
        };
        self.identifier = args.id;
        self.args = args.cursor;
        self
    }

    pub fn with_cursor_args(mut self, args: CursorArgs) -> Self {
        self.args = args;
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn without_serialization(mut self) -> Self {
        self.serialize = false;
        self
    }

    fn normalization_context(&self) -> NormalizationContext {
        NormalizationContext {
            resource_short_name: self.resource_short_name.clone(),
            operation_name: self.operation_name.clone(),
            is_collection: self.is_collection,
            is_mutation: self.operation_type.is_mutation(),
            is_subscription: self.operation_type.is_subscription(),
            attributes: self.attributes.clone(),
        }
    }
}

/// What a resolver produced.
pub enum Resolved<'a, T> {
    Item(Option<&'a T>),
    Collection(&'a dyn ResourceCollection<T>),
}

/// Serializes resolver results with the given normalizer.
#[derive(Debug, Clone, Default)]
pub struct ResultSerializer<N> {
    normalizer: N,
}

impl<N> ResultSerializer<N> {
    pub fn new(normalizer: N) -> Self {
        Self { normalizer }
    }

    pub fn serialize<T>(
        &self,
        value: Resolved<'_, T>,
        context: ResolveContext,
    ) -> GraphqlResult<Value>
    where
        N: Normalizer<T>,
    {
        if !context.serialize {
            trace!(
                "Operation {} skips serialization, returning default data",
                context.operation_name
            );
            return Ok(default_data(&context));
        }

        let normalization_context = context.normalization_context();

        let data = if context.is_collection {
            let collection = match value {
                Resolved::Collection(c) => c,
                Resolved::Item(_) => {
                    return Err(GraphqlError::UnexpectedResultShape(format!(
                        "expected a collection of {} but the resolver returned an item",
                        context.resource_short_name
                    )))
                }
            };

            self.serialize_collection(collection, &context, &normalization_context)?
        } else {
            let item = match value {
                Resolved::Item(item) => item,
                Resolved::Collection(_) => {
                    return Err(GraphqlError::UnexpectedResultShape(format!(
                        "expected an item of {} but the resolver returned a collection",
                        context.resource_short_name
                    )))
                }
            };

            match (context.operation_type, item) {
                (OperationType::DeleteMutation, _) => json!({ "id": context.identifier }),
                (_, None) => Value::Null,
                (_, Some(item)) => {
                    let data =
                        self.normalizer
                            .normalize(item, FORMAT, &normalization_context)?;
                    if !(data.is_object() || data.is_null()) {
                        return Err(GraphqlError::UnexpectedResultShape(
                            "expected normalized data to be a nullable object".to_string(),
                        ));
                    }
                    data
                }
            }
        };

        Ok(wrap_payload(data, &context))
    }

    fn serialize_collection<T>(
        &self,
        collection: &dyn ResourceCollection<T>,
        context: &ResolveContext,
        normalization_context: &NormalizationContext,
    ) -> GraphqlResult<Value>
    where
        N: Normalizer<T>,
    {
        if !context.pagination.enabled {
            debug!(
                "Serializing unpaginated collection of {}",
                context.resource_short_name
            );
            let items = collection
                .iter()
                .map(|item| self.normalizer.normalize(item, FORMAT, normalization_context))
                .collect::<GraphqlResult<Vec<_>>>()?;
            return Ok(Value::Array(items));
        }

        let paginated = collection.as_paginated().ok_or_else(|| {
            GraphqlError::MissingPaginatorCapability(context.resource_short_name.clone())
        })?;

        let data = match context.pagination.style {
            PaginationStyle::Cursor => serde_json::to_value(
                CursorPaginator::new(&self.normalizer).serialize(
                    paginated,
                    &context.args,
                    normalization_context,
                )?,
            )?,
            PaginationStyle::Page => serde_json::to_value(
                PagePaginator::new(&self.normalizer)
                    .serialize(paginated, normalization_context)?,
            )?,
        };

        Ok(data)
    }
}

/// Data returned when the operation does not serialize its result.
fn default_data(context: &ResolveContext) -> Value {
    if context.is_collection {
        if !context.pagination.enabled {
            return Value::Array(vec![]);
        }

        return match context.pagination.style {
            PaginationStyle::Cursor => serde_json::to_value(CursorPage::default()),
            PaginationStyle::Page => serde_json::to_value(PagePage::default()),
        }
        .unwrap_or(Value::Null);
    }

    match context.operation_type {
        OperationType::Mutation | OperationType::DeleteMutation => {
            json!({ CLIENT_MUTATION_ID: context.client_id })
        }
        OperationType::Subscription => {
            json!({ CLIENT_SUBSCRIPTION_ID: context.client_id })
        }
        OperationType::Query => Value::Null,
    }
}

/// Mutation and subscription payloads nest the data under the resource's field
/// name next to the echoed client id.
fn wrap_payload(data: Value, context: &ResolveContext) -> Value {
    let id_field = match context.operation_type {
        OperationType::Mutation | OperationType::DeleteMutation => CLIENT_MUTATION_ID,
        OperationType::Subscription => CLIENT_SUBSCRIPTION_ID,
        OperationType::Query => return data,
    };

    let mut payload = Map::new();
    payload.insert(lcfirst(&context.resource_short_name), data);
    payload.insert(
        id_field.to_string(),
        context.client_id.clone().map(Value::String).unwrap_or(Value::Null),
    );

    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collection::{ArrayPaginator, TraversablePaginator},
        cursor::encode_cursor,
        normalizer::SerdeNormalizer,
    };
    use async_graphql_value::ConstValue;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    #[derive(Serialize, Clone)]
    struct Book {
        id: u64,
        title: String,
    }

    fn book(id: u64) -> Book {
        Book {
            id,
            title: format!("Book #{id}"),
        }
    }

    fn books(n: u64) -> Vec<Book> {
        (0..n).map(book).collect()
    }

    fn serializer() -> ResultSerializer<SerdeNormalizer> {
        ResultSerializer::new(SerdeNormalizer)
    }

    fn cursor_pagination() -> PaginationConfig {
        PaginationConfig::default()
    }

    fn page_pagination() -> PaginationConfig {
        PaginationConfig::default().with_style(PaginationStyle::Page)
    }

    #[test]
    fn test_item_is_normalized() {
        let data = serializer()
            .serialize(Resolved::Item(Some(&book(1))), ResolveContext::item_query("Book"))
            .unwrap();

        assert_eq!(data, json!({"id": 1, "title": "Book #1"}));
    }

    #[test]
    fn test_attribute_selection_reaches_the_normalizer() {
        let context =
            ResolveContext::item_query("Book").with_attributes(vec!["title".to_string()]);

        let data = serializer()
            .serialize(Resolved::Item(Some(&book(1))), context)
            .unwrap();

        assert_eq!(data, json!({"title": "Book #1"}));
    }

    #[test]
    fn test_missing_item_is_null() {
        let data = serializer()
            .serialize::<Book>(Resolved::Item(None), ResolveContext::item_query("Book"))
            .unwrap();

        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_scalar_item_is_an_unexpected_shape() {
        let err = serializer()
            .serialize(Resolved::Item(Some(&42u64)), ResolveContext::item_query("Book"))
            .unwrap_err();

        assert!(matches!(err, GraphqlError::UnexpectedResultShape(_)));
    }

    #[test]
    fn test_resolved_value_must_match_collection_flag() {
        let items = books(2);
        let err = serializer()
            .serialize::<Book>(Resolved::Collection(&items), ResolveContext::item_query("Book"))
            .unwrap_err();
        assert!(matches!(err, GraphqlError::UnexpectedResultShape(_)));

        let err = serializer()
            .serialize(
                Resolved::Item(Some(&book(1))),
                ResolveContext::collection_query("Book", cursor_pagination()),
            )
            .unwrap_err();
        assert!(matches!(err, GraphqlError::UnexpectedResultShape(_)));
    }

    #[test]
    fn test_unpaginated_collection_is_a_list() {
        let items = books(2);
        let data = serializer()
            .serialize::<Book>(
                Resolved::Collection(&items),
                ResolveContext::collection_query("Book", PaginationConfig::disabled()),
            )
            .unwrap();

        assert_eq!(
            data,
            json!([
                {"id": 0, "title": "Book #0"},
                {"id": 1, "title": "Book #1"},
            ])
        );
    }

    #[test]
    fn test_cursor_paginated_collection() {
        let collection = ArrayPaginator::new(books(3), 0, 2);
        let context = ResolveContext::collection_query("Book", cursor_pagination());

        let data = serializer()
            .serialize::<Book>(Resolved::Collection(&collection), context)
            .unwrap();

        assert_eq!(
            data,
            json!({
                "totalCount": 3,
                "edges": [
                    {"node": {"id": 0, "title": "Book #0"}, "cursor": encode_cursor(0)},
                    {"node": {"id": 1, "title": "Book #1"}, "cursor": encode_cursor(1)},
                ],
                "pageInfo": {
                    "startCursor": encode_cursor(0),
                    "endCursor": encode_cursor(1),
                    "hasNextPage": true,
                    "hasPreviousPage": false,
                },
            })
        );
    }

    #[test]
    fn test_cursor_arguments_are_read_from_the_field() {
        let collection = ArrayPaginator::new(books(3), 2, 2);
        let args = ConstValue::from_json(json!({"after": encode_cursor(1)})).unwrap();
        let context = ResolveContext::collection_query("Book", cursor_pagination())
            .with_arguments(ResolveArguments::from_value(&args).unwrap());

        let data = serializer()
            .serialize::<Book>(Resolved::Collection(&collection), context)
            .unwrap();

        assert_eq!(data["edges"][0]["cursor"], json!(encode_cursor(2)));
        assert_eq!(data["pageInfo"]["hasPreviousPage"], json!(true));
        assert_eq!(data["pageInfo"]["hasNextPage"], json!(false));
    }

    #[test]
    fn test_invalid_cursor_propagates() {
        let collection = ArrayPaginator::new(books(3), 0, 2);
        let context = ResolveContext::collection_query("Book", cursor_pagination())
            .with_cursor_args(CursorArgs::before(""));

        let err = serializer()
            .serialize::<Book>(Resolved::Collection(&collection), context)
            .unwrap_err();

        assert!(matches!(err, GraphqlError::InvalidCursor(c) if c.is_empty()));
    }

    #[test]
    fn test_page_paginated_collection() {
        let collection = TraversablePaginator::new(vec![book(5), book(6)], 2., 5., 7);
        let context = ResolveContext::collection_query("Book", page_pagination());

        let data = serializer()
            .serialize::<Book>(Resolved::Collection(&collection), context)
            .unwrap();

        assert_eq!(
            data,
            json!({
                "collection": [
                    {"id": 5, "title": "Book #5"},
                    {"id": 6, "title": "Book #6"},
                ],
                "paginationInfo": {"itemsPerPage": 5, "totalCount": 7, "lastPage": 2},
            })
        );
    }

    #[test]
    fn test_paginating_a_plain_collection_is_an_error() {
        let items = books(2);

        for pagination in [cursor_pagination(), page_pagination()] {
            let err = serializer()
                .serialize::<Book>(
                    Resolved::Collection(&items),
                    ResolveContext::collection_query("Book", pagination),
                )
                .unwrap_err();

            assert!(
                matches!(err, GraphqlError::MissingPaginatorCapability(name) if name == "Book")
            );
        }
    }

    #[test]
    fn test_default_data_when_serialization_is_disabled() {
        let items = books(2);
        let serialize = |context: ResolveContext| {
            serializer()
                .serialize::<Book>(Resolved::Collection(&items), context.without_serialization())
                .unwrap()
        };

        assert_eq!(
            serialize(ResolveContext::collection_query("Book", cursor_pagination())),
            json!({
                "totalCount": 0,
                "edges": [],
                "pageInfo": {
                    "startCursor": null,
                    "endCursor": null,
                    "hasNextPage": false,
                    "hasPreviousPage": false,
                },
            })
        );
        assert_eq!(
            serialize(ResolveContext::collection_query("Book", page_pagination())),
            json!({
                "collection": [],
                "paginationInfo": {"itemsPerPage": 0, "totalCount": 0, "lastPage": 0},
            })
        );
        assert_eq!(
            serialize(ResolveContext::collection_query(
                "Book",
                PaginationConfig::disabled()
            )),
            json!([])
        );
        assert_eq!(
            serialize(ResolveContext::mutation("Book", "create").with_client_id("abc")),
            json!({"clientMutationId": "abc"})
        );
        assert_eq!(
            serialize(ResolveContext::subscription("Book")),
            json!({"clientSubscriptionId": null})
        );
        assert_eq!(serialize(ResolveContext::item_query("Book")), Value::Null);
    }

    #[test]
    fn test_mutation_payload_is_wrapped() {
        let context =
            ResolveContext::mutation("BookReview", "create").with_client_id("abc");

        let data = serializer()
            .serialize(Resolved::Item(Some(&book(3))), context)
            .unwrap();

        assert_eq!(
            data,
            json!({
                "bookReview": {"id": 3, "title": "Book #3"},
                "clientMutationId": "abc",
            })
        );
    }

    #[test]
    fn test_delete_mutation_payload_carries_the_identifier() {
        let args = ConstValue::from_json(json!({
            "input": {"id": "/books/3", "clientMutationId": "rm"},
        }))
        .unwrap();
        let context = ResolveContext::delete_mutation("Book")
            .with_arguments(ResolveArguments::from_value(&args).unwrap());

        let data = serializer()
            .serialize::<Book>(Resolved::Item(None), context)
            .unwrap();

        assert_eq!(
            data,
            json!({"book": {"id": "/books/3"}, "clientMutationId": "rm"})
        );
    }

    #[test]
    fn test_subscription_payload_is_wrapped() {
        let args = ConstValue::from_json(json!({
            "input": {"id": 3, "clientSubscriptionId": "sub-1"},
        }))
        .unwrap();
        let context = ResolveContext::subscription("Book")
            .with_arguments(ResolveArguments::from_value(&args).unwrap());

        let data = serializer()
            .serialize(Resolved::Item(Some(&book(3))), context)
            .unwrap();

        assert_eq!(
            data,
            json!({
                "book": {"id": 3, "title": "Book #3"},
                "clientSubscriptionId": "sub-1",
            })
        );
    }
}
