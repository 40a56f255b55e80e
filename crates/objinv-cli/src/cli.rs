use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "objinv",
    about = "Inspect and convert object inventory files (objects.inv)",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetVersion {
    V1,
    V2,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the header and every entry of an inventory
    Inspect(InspectArgs),
    /// Show a single entry
    Lookup(LookupArgs),
    /// Re-encode an inventory, optionally changing its format version
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// Location prepended to every record uri
    #[arg(long, default_value = "")]
    pub base: String,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    pub file: PathBuf,
    /// Object type, e.g. `py:function`
    pub object_type: String,
    pub name: String,
    #[arg(long, default_value = "")]
    pub base: String,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Format version to write [default: v2]
    #[arg(long)]
    pub to: Option<TargetVersion>,
    /// zlib compression level, 0-9 [default: 9]
    #[arg(long)]
    pub level: Option<u32>,
    /// Keep full uris instead of the `$` shorthand
    #[arg(long)]
    pub no_shorten: bool,
    /// TOML file with encode options; flags given on the command line win
    #[arg(long)]
    pub options: Option<PathBuf>,
}
