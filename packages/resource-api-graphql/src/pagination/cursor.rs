//! Relay-style connections.
//! See: https://relay.dev/graphql/connections.htm
use crate::{
    arguments::CursorArgs,
    collection::PaginatedCollection,
    cursor::{decode_cursor, encode_cursor},
    normalizer::{NormalizationContext, Normalizer, FORMAT},
    GraphqlResult,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// See: https://relay.dev/graphql/connections.htm#sec-Edge-Types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub node: Value,
    pub cursor: String,
}

/// See: https://relay.dev/graphql/connections.htm#sec-PageInfo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// See: https://relay.dev/graphql/connections.htm#sec-Connection-Types
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage {
    pub total_count: u64,
    pub edges: Vec<Edge>,
    pub page_info: PageInfo,
}

/// Renders a paginated collection as a connection, with opaque offset cursors.
pub struct CursorPaginator<'a, N> {
    normalizer: &'a N,
}

impl<'a, N> CursorPaginator<'a, N> {
    pub fn new(normalizer: &'a N) -> Self {
        Self { normalizer }
    }

    pub fn serialize<T>(
        &self,
        collection: &dyn PaginatedCollection<T>,
        args: &CursorArgs,
        context: &NormalizationContext,
    ) -> GraphqlResult<CursorPage>
    where
        N: Normalizer<T>,
    {
        let total_items = collection.total_items();
        let page_count = collection.count();
        let offset = cursor_offset(total_items, page_count, args)?;

        debug!(
            "Serializing connection of {} at offset {offset} ({page_count} of {total_items} items)",
            context.resource_short_name
        );

        let mut page = CursorPage::default();

        if total_items > 0 {
            let end = offset.saturating_add(page_count).saturating_sub(1);
            let items_per_page = collection.items_per_page();
            let offset_f = offset as f64;
            let remainder = if items_per_page > 0. {
                offset_f % items_per_page
            } else {
                offset_f
            };

            page.total_count = total_items;
            page.page_info = PageInfo {
                start_cursor: Some(encode_cursor(offset)),
                end_cursor: Some(encode_cursor(end)),
                has_next_page: remainder + items_per_page * collection.current_page()
                    < total_items as f64,
                has_previous_page: offset > 0,
            };
        }

        for (index, item) in collection.items().enumerate() {
            page.edges.push(Edge {
                node: self.normalizer.normalize(item, FORMAT, context)?,
                cursor: encode_cursor(offset.saturating_add(index as u64)),
            });
        }

        Ok(page)
    }
}

/// Index of the first item of the window selected by `args` over `total_items`
/// items, paging backward by `page_size`. Never negative and at most
/// `i64::MAX`.
pub fn cursor_offset(
    total_items: u64,
    page_size: u64,
    args: &CursorArgs,
) -> GraphqlResult<u64> {
    let offset = if let Some(after) = &args.after {
        as_signed(decode_cursor(after)?).saturating_add(1)
    } else if let Some(before) = &args.before {
        as_signed(decode_cursor(before)?).saturating_sub(as_signed(page_size))
    } else if let Some(last) = args.last {
        as_signed(total_items).saturating_sub(as_signed(last))
    } else {
        0
    };

    Ok(offset.max(0).unsigned_abs())
}

fn as_signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
