use crate::GraphqlResult;
use serde::Serialize;
use serde_json::Value;

/// Format name handed to normalizers by the GraphQL serialization stage.
pub const FORMAT: &str = "graphql";

/// Per-call information available to normalizers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationContext {
    /// Short name of the resource being serialized, e.g. `Book`.
    pub resource_short_name: String,

    /// Name of the GraphQL operation, e.g. `item_query` or `create`.
    pub operation_name: String,

    pub is_collection: bool,
    pub is_mutation: bool,
    pub is_subscription: bool,

    /// Top-level fields selected by the client. `None` selects everything.
    pub attributes: Option<Vec<String>>,
}

/// Turns a domain item into a JSON tree.
pub trait Normalizer<T> {
    fn normalize(
        &self,
        item: &T,
        format: &str,
        context: &NormalizationContext,
    ) -> GraphqlResult<Value>;
}

/// Normalizes any `Serialize` item through `serde_json`, keeping only the
/// selected attributes when the context carries a selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeNormalizer;

impl<T: Serialize> Normalizer<T> for SerdeNormalizer {
    fn normalize(
        &self,
        item: &T,
        _format: &str,
        context: &NormalizationContext,
    ) -> GraphqlResult<Value> {
        let value = serde_json::to_value(item)?;

        match (value, &context.attributes) {
            (Value::Object(mut map), Some(attributes)) => {
                map.retain(|k, _| attributes.iter().any(|a| a == k));
                Ok(Value::Object(map))
            }
            (value, _) => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize)]
    struct Book {
        id: u32,
        title: &'static str,
        isbn: &'static str,
    }

    const BOOK: Book = Book {
        id: 1,
        title: "Dune",
        isbn: "9780441013593",
    };

    #[test]
    fn test_serde_normalizer_serializes_everything_by_default() {
        let value = SerdeNormalizer
            .normalize(&BOOK, FORMAT, &NormalizationContext::default())
            .unwrap();

        assert_eq!(
            value,
            json!({"id": 1, "title": "Dune", "isbn": "9780441013593"})
        );
    }

    #[test]
    fn test_serde_normalizer_honours_attribute_selection() {
        let context = NormalizationContext {
            attributes: Some(vec!["id".to_string(), "title".to_string()]),
            ..NormalizationContext::default()
        };

        let value = SerdeNormalizer.normalize(&BOOK, FORMAT, &context).unwrap();

        assert_eq!(value, json!({"id": 1, "title": "Dune"}));
    }

    #[test]
    fn test_serde_normalizer_passes_scalars_through() {
        let context = NormalizationContext {
            attributes: Some(vec!["id".to_string()]),
            ..NormalizationContext::default()
        };

        let value = SerdeNormalizer.normalize(&42u8, FORMAT, &context).unwrap();

        assert_eq!(value, json!(42));
    }
}
