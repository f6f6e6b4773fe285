use anyhow::Context;
use clap::Parser;
use resource_api_graphql::{
    cursor_offset, ArrayPaginator, CursorArgs, GraphqlResult, ResolveContext,
    Resolved, ResultSerializer, SerdeNormalizer,
};
use resource_api_lib::{
    config::{ResourceApiArgs, ResourceApiConfig},
    utils::init_logging,
};
use serde::Deserialize;
use serde_json::Value;
use std::{fs::File, path::PathBuf};
use tracing::info;

/// Serialize a JSON fixture as the result of a collection query.
#[derive(Debug, Parser)]
pub struct Command {
    #[clap(flatten)]
    pub config: ResourceApiArgs,

    /// JSON file with the resolved items.
    #[clap(long, value_name = "FILE", help = "JSON file with the resolved items.")]
    pub fixture: PathBuf,

    /// Short name of the resource the items belong to.
    #[clap(long, default_value = "Resource", help = "Short name of the resource.")]
    pub resource: String,

    /// Return edges after the given cursor.
    #[clap(long, help = "Return edges after the given cursor.")]
    pub after: Option<String>,

    /// Return edges before the given cursor.
    #[clap(long, help = "Return edges before the given cursor.")]
    pub before: Option<String>,

    /// Paginate forward, returning the given amount of edges at most.
    #[clap(long, help = "Paginate forward, returning the given amount of edges at most.")]
    pub first: Option<u64>,

    /// Paginate backward, returning the given amount of edges at most.
    #[clap(long, help = "Paginate backward, returning the given amount of edges at most.")]
    pub last: Option<u64>,

    /// Comma separated list of item fields to keep.
    #[clap(long, value_delimiter = ',', help = "Comma separated list of item fields to keep.")]
    pub fields: Option<Vec<String>>,
}

/// Items resolved for a collection: either a bare list, or the full result
/// set plus the offset of the current page.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Fixture {
    Items(Vec<Value>),
    Page {
        items: Vec<Value>,
        #[serde(default)]
        offset: usize,
    },
}

impl Fixture {
    fn into_parts(self) -> (Vec<Value>, usize) {
        match self {
            Fixture::Items(items) => (items, 0),
            Fixture::Page { items, offset } => (items, offset),
        }
    }
}

/// Serialize `fixture` with the pagination settings carried by `context`.
///
/// Cursor arguments select the page window over the fixture's items; the
/// fixture's own offset only applies when none is given.
pub fn serialize_fixture(
    fixture: Fixture,
    context: ResolveContext,
) -> GraphqlResult<Value> {
    let serializer = ResultSerializer::new(SerdeNormalizer);
    let (items, offset) = fixture.into_parts();

    if context.pagination.enabled {
        let items_per_page = context.pagination.items_per_page;
        let args = &context.args;
        let has_cursor = args.after.is_some() || args.before.is_some() || args.last.is_some();
        let offset = if has_cursor {
            let offset = cursor_offset(items.len() as u64, items_per_page, args)?;
            usize::try_from(offset).unwrap_or(usize::MAX)
        } else {
            offset
        };
        let collection = ArrayPaginator::new(
            items,
            offset,
            usize::try_from(items_per_page).unwrap_or(usize::MAX),
        );
        serializer.serialize::<Value>(Resolved::Collection(&collection), context)
    } else {
        serializer.serialize::<Value>(Resolved::Collection(&items), context)
    }
}

pub fn exec(command: Command) -> anyhow::Result<()> {
    let Command {
        config,
        fixture,
        resource,
        after,
        before,
        first,
        last,
        fields,
    } = command;

    let config = ResourceApiConfig::try_from(config)?;
    init_logging(&config)?;

    info!("Serializing {resource} fixture {fixture:?}");

    let file = File::open(&fixture)
        .with_context(|| format!("Could not open fixture {fixture:?}"))?;
    let parsed: Fixture = serde_json::from_reader(file)
        .with_context(|| format!("Could not parse fixture {fixture:?}"))?;

    let mut context = ResolveContext::collection_query(resource, config.pagination)
        .with_cursor_args(CursorArgs {
            first,
            after,
            last,
            before,
        });
    if let Some(fields) = fields {
        context = context.with_attributes(fields);
    }

    let data = serialize_fixture(parsed, context)?;
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
