pub mod arguments;
pub mod collection;
pub mod cursor;
pub mod normalizer;
pub mod pagination;
pub mod serialize;
mod util;

pub use arguments::{CursorArgs, ResolveArguments};
pub use collection::{
    ArrayPaginator, PaginatedCollection, ResourceCollection, TraversablePaginator,
};
pub use cursor::{decode_cursor, encode_cursor};
pub use normalizer::{NormalizationContext, Normalizer, SerdeNormalizer, FORMAT};
pub use pagination::{
    cursor_offset, CursorPage, CursorPaginator, Edge, PageInfo, PagePage,
    PagePaginator, PaginationInfo,
};
pub use serialize::{OperationType, ResolveContext, Resolved, ResultSerializer};

use thiserror::Error;
pub type GraphqlResult<T> = Result<T, GraphqlError>;

#[derive(Debug, Error)]
pub enum GraphqlError {
    #[error("Cursor {0:?} is invalid")]
    InvalidCursor(String),
    #[error("Collection returned for {0:?} must implement PaginatedCollection")]
    MissingPaginatorCapability(String),
    #[error("Unexpected result shape: {0}")]
    UnexpectedResultShape(String),
    #[error("Invalid argument {0:?}: {1}")]
    InvalidArgument(String, String),
    #[error("Could not normalize item: {0:?}")]
    NormalizationError(#[from] serde_json::Error),
}
