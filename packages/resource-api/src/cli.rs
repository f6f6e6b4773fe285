pub(crate) use crate::commands::{properties, serialize};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    name = "resource-api",
    about = "Resource API serialization tooling",
    version,
    rename_all = "kebab-case"
)]
pub struct Opt {
    #[clap(subcommand)]
    command: ResourceApi,
}

#[derive(Debug, Subcommand)]
pub enum ResourceApi {
    Serialize(serialize::Command),
    Properties(properties::Command),
}

pub fn run_cli() -> anyhow::Result<()> {
    let opt = Opt::try_parse();

    match opt {
        Ok(opt) => match opt.command {
            ResourceApi::Serialize(command) => serialize::exec(command),
            ResourceApi::Properties(command) => properties::exec(command),
        },
        Err(e) => {
            // Prints the error and exits.
            e.exit()
        }
    }
}
