use anyhow::Context;
use clap::Parser;
use resource_api_lib::{config::ResourceApiConfig, utils::init_logging};
use resource_api_metadata::{
    InterfacePropertyNameCollectionFactory, PropertyNameCollectionFactory,
    RegistryPropertyNameCollectionFactory, ResourceRegistry,
};
use std::{fs, path::PathBuf, sync::Arc};
use tracing::info;

/// List the property names of a resource type, expanding interfaces and unions
/// into the properties of their implementations.
#[derive(Debug, Parser)]
pub struct Command {
    /// GraphQL schema describing the resource types.
    #[clap(long, value_name = "FILE", help = "GraphQL schema describing the resource types.")]
    pub schema: PathBuf,

    /// Name of the resource type.
    #[clap(long, help = "Name of the resource type.")]
    pub resource: String,

    /// Enable verbose logging.
    #[clap(short, long, help = "Enable verbose logging.")]
    pub verbose: bool,
}

/// Property names of `resource` as declared by the types in `sdl`.
pub fn expand_properties(sdl: &str, resource: &str) -> anyhow::Result<Vec<String>> {
    let registry = Arc::new(ResourceRegistry::from_sdl(sdl)?);
    let factory = InterfacePropertyNameCollectionFactory::new(
        RegistryPropertyNameCollectionFactory::new(registry.clone()),
        registry,
    );

    Ok(factory.create(resource)?.into_inner())
}

pub fn exec(command: Command) -> anyhow::Result<()> {
    let config = ResourceApiConfig {
        verbose: command.verbose,
        ..ResourceApiConfig::default()
    };
    init_logging(&config)?;

    let sdl = fs::read_to_string(&command.schema)
        .with_context(|| format!("Could not read schema {:?}", command.schema))?;

    info!("Expanding properties of {}", command.resource);

    for name in expand_properties(&sdl, &command.resource)? {
        println!("{name}");
    }

    Ok(())
}
