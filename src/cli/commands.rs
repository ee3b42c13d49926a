use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sketchpp", about = concat!("sketchpp v", env!("CARGO_PKG_VERSION"), " - sketches in, translation units out"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a sketch into a compilable translation unit
    Convert(ConvertArgs),
    /// List top-level function definitions and whether they need a prototype
    Prototypes(PrototypesArgs),
    /// Map an output line back to the sketch line it came from
    Resolve(ResolveArgs),
    /// Write a default sketchpp.toml in the current directory
    Init(InitArgs),
}

// ---------------------------------------------------------------------------
// Shared sketch args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SketchArgs {
    /// Sketch file to read
    pub input: PathBuf,
    /// Config file (default: nearest sketchpp.toml above the sketch)
    #[arg(long, conflicts_with = "no_config")]
    pub config: Option<PathBuf>,
    /// Ignore any sketchpp.toml
    #[arg(long)]
    pub no_config: bool,
    /// Header whose prototypes count as declared (repeatable)
    #[arg(long = "header", value_name = "PATH", action = clap::ArgAction::Append)]
    pub headers: Vec<PathBuf>,
    /// Emit a #line directive after injected prototypes
    #[arg(long)]
    pub line_directives: bool,
}

// ---------------------------------------------------------------------------
// Command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub sketch: SketchArgs,
    /// Where to write the translation unit (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write the line map as JSON
    #[arg(long)]
    pub map: Option<PathBuf>,
}

#[derive(Args)]
pub struct PrototypesArgs {
    #[command(flatten)]
    pub sketch: SketchArgs,
    /// Only list definitions that would get a prototype
    #[arg(long)]
    pub missing: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Line map written by `convert --map`
    pub map: PathBuf,
    /// 1-indexed line of the translation unit
    pub line: usize,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing sketchpp.toml
    #[arg(long)]
    pub force: bool,
}
