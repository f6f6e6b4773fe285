//! Rendering of paginated collections.
//! See: https://graphql.org/learn/pagination/
mod cursor;
mod page;

pub use cursor::*;
pub use page::*;
