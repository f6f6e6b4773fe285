use crate::{MetadataError, MetadataResult};
use async_graphql_parser::{
    parse_schema,
    types::{FieldDefinition, TypeKind, TypeSystemDefinition},
    Positioned,
};
use async_graphql_value::Name;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Whether a resource type can be instantiated or only stands for its subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A resource type backed by real data, e.g. a GraphQL `type`.
    Concrete,

    /// An interface or union type, e.g. a GraphQL `interface` or `union`.
    Abstract,
}

/// A resource type known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    /// Name of the resource type.
    pub name: String,

    /// Whether the type is concrete or abstract.
    pub kind: ResourceKind,

    /// Names of the types this type directly extends or implements.
    pub parents: Vec<String>,

    /// Property names declared by this type, in declaration order.
    pub properties: Vec<String>,
}

impl ResourceType {
    pub fn concrete(name: impl Into<String>) -> Self {
        Self::new(name, ResourceKind::Concrete)
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::new(name, ResourceKind::Abstract)
    }

    fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parents: vec![],
            properties: vec![],
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == ResourceKind::Abstract
    }
}

/// Every resource type known to the API, with the declared subtype relation.
///
/// Types are kept in registration order so that anything derived from the
/// registry (e.g. expanded property names) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    types: Vec<ResourceType>,
    index: HashMap<String, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type. Names must be unique.
    pub fn register(&mut self, resource: ResourceType) -> MetadataResult<()> {
        if self.index.contains_key(&resource.name) {
            return Err(MetadataError::DuplicateResource(resource.name));
        }

        self.index.insert(resource.name.clone(), self.types.len());
        self.types.push(resource);

        Ok(())
    }

    pub fn with(mut self, resource: ResourceType) -> MetadataResult<Self> {
        self.register(resource)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ResourceType> {
        self.index.get(name).map(|i| &self.types[*i])
    }

    fn get_mut(&mut self, name: &str) -> MetadataResult<&mut ResourceType> {
        match self.index.get(name) {
            Some(i) => Ok(&mut self.types[*i]),
            None => Err(MetadataError::ResourceNotFound(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered types, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.iter()
    }

    /// All concrete types, in registration order.
    pub fn concrete_types(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.iter().filter(|t| !t.is_abstract())
    }

    pub fn is_abstract(&self, name: &str) -> MetadataResult<bool> {
        self.get(name)
            .map(ResourceType::is_abstract)
            .ok_or_else(|| MetadataError::ResourceNotFound(name.to_string()))
    }

    /// Whether `child` extends or implements `ancestor`, directly or through
    /// any chain of parents. A type is not a subtype of itself.
    pub fn is_subtype_of(&self, child: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = match self.get(child) {
            Some(t) => t.parents.iter().map(String::as_str).collect(),
            None => return false,
        };

        while let Some(name) = stack.pop() {
            if name == ancestor {
                return true;
            }

            if !seen.insert(name) {
                continue;
            }

            if let Some(t) = self.get(name) {
                stack.extend(t.parents.iter().map(String::as_str));
            }
        }

        false
    }

    /// Ensure every declared parent is itself a registered type.
    pub fn validate(&self) -> MetadataResult<()> {
        for t in self.types.iter() {
            if let Some(parent) = t.parents.iter().find(|p| !self.contains(p)) {
                return Err(MetadataError::UnknownParent(
                    t.name.clone(),
                    parent.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Build a registry from GraphQL SDL.
    ///
    /// `type` definitions are concrete, `interface` and `union` definitions are
    /// abstract. `implements` clauses and union membership become parents.
    /// Scalars, enums and input objects are not resources and are skipped.
    pub fn from_sdl(sdl: &str) -> MetadataResult<Self> {
        let ast = parse_schema(sdl)?;
        let mut registry = Self::new();
        let mut extensions = vec![];
        let mut unions = vec![];

        for def in ast.definitions.iter() {
            let typ = match def {
                TypeSystemDefinition::Type(typ) => &typ.node,
                _ => continue,
            };

            let name = typ.name.node.to_string();
            let resource = match &typ.kind {
                TypeKind::Object(o) => ResourceType::concrete(&name)
                    .with_properties(field_names(&o.fields))
                    .with_parents(&o.implements),
                TypeKind::Interface(i) => ResourceType::abstract_type(&name)
                    .with_properties(field_names(&i.fields))
                    .with_parents(&i.implements),
                TypeKind::Union(u) => {
                    unions.push((name.clone(), &u.members));
                    ResourceType::abstract_type(&name)
                }
                _ => continue,
            };

            if typ.extend {
                extensions.push(resource);
            } else {
                registry.register(resource)?;
            }
        }

        for ext in extensions {
            let target = registry.get_mut(&ext.name)?;
            target.properties.extend(ext.properties);
            target.parents.extend(ext.parents);
        }

        for (union_name, members) in unions {
            for member in members.iter() {
                registry
                    .get_mut(member.node.as_str())?
                    .parents
                    .push(union_name.clone());
            }
        }

        registry.validate()?;

        debug!("Built resource registry with {} types.", registry.len());

        Ok(registry)
    }
}

impl ResourceType {
    fn with_parents(mut self, names: &[Positioned<Name>]) -> Self {
        self.parents
            .extend(names.iter().map(|n| n.node.to_string()));
        self
    }
}

fn field_names(fields: &[Positioned<FieldDefinition>]) -> Vec<String> {
    fields.iter().map(|f| f.node.name.node.to_string()).collect()
}
