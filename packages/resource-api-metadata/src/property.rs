use crate::{registry::ResourceRegistry, MetadataError, MetadataResult};
use std::{collections::HashSet, sync::Arc};
use tracing::trace;

/// Ordered, duplicate-free list of property names of a resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyNameCollection(Vec<String>);

impl PropertyNameCollection {
    pub fn new(names: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        Self(names.into_iter().filter(|n| seen.insert(n.clone())).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for PropertyNameCollection {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Produces the property names of a resource type.
pub trait PropertyNameCollectionFactory {
    fn create(&self, resource: &str) -> MetadataResult<PropertyNameCollection>;
}

/// Returns the properties a type declares itself.
#[derive(Debug, Clone)]
pub struct RegistryPropertyNameCollectionFactory {
    registry: Arc<ResourceRegistry>,
}

impl RegistryPropertyNameCollectionFactory {
    pub fn new(registry: Arc<ResourceRegistry>) -> Self {
        Self { registry }
    }
}

impl PropertyNameCollectionFactory for RegistryPropertyNameCollectionFactory {
    fn create(&self, resource: &str) -> MetadataResult<PropertyNameCollection> {
        let resource_type = self
            .registry
            .get(resource)
            .ok_or_else(|| MetadataError::ResourceNotFound(resource.to_string()))?;

        Ok(PropertyNameCollection::new(resource_type.properties.clone()))
    }
}

/// Expands abstract resource types into the union of the property names of
/// every concrete type implementing them. Concrete types are passed through to
/// the decorated factory.
#[derive(Debug, Clone)]
pub struct InterfacePropertyNameCollectionFactory<F> {
    decorated: F,
    registry: Arc<ResourceRegistry>,
}

impl<F> InterfacePropertyNameCollectionFactory<F>
where
    F: PropertyNameCollectionFactory,
{
    pub fn new(decorated: F, registry: Arc<ResourceRegistry>) -> Self {
        Self {
            decorated,
            registry,
        }
    }
}

impl<F> PropertyNameCollectionFactory for InterfacePropertyNameCollectionFactory<F>
where
    F: PropertyNameCollectionFactory,
{
    /// Abstract types contribute only their implementations' properties, never
    /// their own, so an interface without implementations has none.
    fn create(&self, resource: &str) -> MetadataResult<PropertyNameCollection> {
        if !self.registry.is_abstract(resource)? {
            return self.decorated.create(resource);
        }

        let mut names = vec![];
        for implementation in self
            .registry
            .concrete_types()
            .filter(|t| self.registry.is_subtype_of(&t.name, resource))
        {
            trace!("Expanding {resource} with properties of {}", implementation.name);
            names.extend(self.create(&implementation.name)?);
        }

        Ok(PropertyNameCollection::new(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResourceType;
    use pretty_assertions::assert_eq;

    fn registry() -> Arc<ResourceRegistry> {
        let registry = ResourceRegistry::from_sdl(
            r#"
interface Node {
    id: ID!
}

interface Publication implements Node {
    id: ID!
    title: String!
}

interface Archived {
    archivedAt: String!
}

type Book implements Publication & Node {
    id: ID!
    title: String!
    isbn: String!
}

type Magazine implements Publication & Node {
    id: ID!
    title: String!
    issue: Int!
}

type Author implements Node {
    id: ID!
    name: String!
}

union Contributor = Author
"#,
        )
        .unwrap();

        Arc::new(registry)
    }

    fn factory(
        registry: Arc<ResourceRegistry>,
    ) -> InterfacePropertyNameCollectionFactory<RegistryPropertyNameCollectionFactory>
    {
        InterfacePropertyNameCollectionFactory::new(
            RegistryPropertyNameCollectionFactory::new(registry.clone()),
            registry,
        )
    }

    #[test]
    fn test_interface_expands_to_union_of_implementations() {
        let factory = factory(registry());

        let names = factory.create("Publication").unwrap().into_inner();
        assert_eq!(names, vec!["id", "title", "isbn", "issue"]);

        let names = factory.create("Node").unwrap().into_inner();
        assert_eq!(names, vec!["id", "title", "isbn", "issue", "name"]);
    }

    #[test]
    fn test_union_expands_to_its_members() {
        let factory = factory(registry());

        let names = factory.create("Contributor").unwrap().into_inner();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn test_concrete_type_is_delegated() {
        let factory = factory(registry());

        let names = factory.create("Magazine").unwrap().into_inner();
        assert_eq!(names, vec!["id", "title", "issue"]);
    }

    #[test]
    fn test_interface_without_implementations_is_empty() {
        let factory = factory(registry());

        assert!(factory.create("Archived").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let factory = factory(registry());

        let err = factory.create("Ghost").unwrap_err();
        assert!(matches!(err, MetadataError::ResourceNotFound(name) if name == "Ghost"));
    }

    #[test]
    fn test_property_name_collection_deduplicates_in_order() {
        let names = PropertyNameCollection::new(vec![
            "id".to_string(),
            "title".to_string(),
            "id".to_string(),
        ]);

        assert_eq!(names.len(), 2);
        assert!(names.contains("title"));
        assert_eq!(names.into_inner(), vec!["id", "title"]);
    }

    #[test]
    fn test_registry_factory_returns_declared_properties() {
        let registry = Arc::new(
            ResourceRegistry::new()
                .with(ResourceType::concrete("Book").with_properties(["id", "title"]))
                .unwrap(),
        );
        let factory = RegistryPropertyNameCollectionFactory::new(registry);

        assert_eq!(factory.create("Book").unwrap().into_inner(), vec!["id", "title"]);
    }
}
