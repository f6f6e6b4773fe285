//! # resource-api-metadata
//!
//! Resource type registry and property name collection factories, including the
//! decorator that expands abstract resource types into the properties of their
//! concrete implementations.

pub mod property;
pub mod registry;

pub use property::{
    InterfacePropertyNameCollectionFactory, PropertyNameCollection,
    PropertyNameCollectionFactory, RegistryPropertyNameCollectionFactory,
};
pub use registry::{ResourceKind, ResourceRegistry, ResourceType};

use thiserror::Error;

pub type MetadataResult<T> = Result<T, MetadataError>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("GraphQL parser error: {0:?}")]
    ParseError(#[from] async_graphql_parser::Error),
    #[error("Resource type {0:?} not found")]
    ResourceNotFound(String),
    #[error("Resource type {0:?} is registered more than once")]
    DuplicateResource(String),
    #[error("Resource type {0:?} declares unknown parent {1:?}")]
    UnknownParent(String, String),
}
