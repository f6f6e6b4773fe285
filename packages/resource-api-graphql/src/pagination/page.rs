use crate::{
    collection::PaginatedCollection,
    normalizer::{NormalizationContext, Normalizer, FORMAT},
    util::serialize_number,
    GraphqlResult,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    #[serde(serialize_with = "serialize_number")]
    pub items_per_page: f64,
    pub total_count: u64,
    #[serde(serialize_with = "serialize_number")]
    pub last_page: f64,
}

/// A page of normalized items with page-number metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePage {
    pub collection: Vec<Value>,
    pub pagination_info: PaginationInfo,
}

/// Renders a paginated collection with the counters reported by the collection.
pub struct PagePaginator<'a, N> {
    normalizer: &'a N,
}

impl<'a, N> PagePaginator<'a, N> {
    pub fn new(normalizer: &'a N) -> Self {
        Self { normalizer }
    }

    pub fn serialize<T>(
        &self,
        collection: &dyn PaginatedCollection<T>,
        context: &NormalizationContext,
    ) -> GraphqlResult<PagePage>
    where
        N: Normalizer<T>,
    {
        debug!(
            "Serializing page {} of {} for {}",
            collection.current_page(),
            collection.last_page(),
            context.resource_short_name
        );

        let items = collection
            .items()
            .map(|item| self.normalizer.normalize(item, FORMAT, context))
            .collect::<GraphqlResult<Vec<_>>>()?;

        Ok(PagePage {
            collection: items,
            pagination_info: PaginationInfo {
                items_per_page: collection.items_per_page(),
                total_count: collection.total_items(),
                last_page: collection.last_page(),
            },
        })
    }
}
