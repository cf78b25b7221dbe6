use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the retype binary.
#[derive(Parser, Debug)]
#[command(
    name = "retype",
    version,
    about = "Replace factory calls with their JDK counterparts where the context allows it"
)]
pub struct CliArgs {
    /// Path to a retype.json config file. Defaults to ./retype.json when present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Recipe ids to run, overriding the config file.
    #[arg(short = 'r', long = "recipe", value_delimiter = ',')]
    pub recipes: Vec<String>,

    /// Lowest Java language level a unit must declare to be migrated.
    #[arg(long = "min-java-version", alias = "minJavaVersion")]
    pub min_java_version: Option<u32>,

    /// Skip call sites whose enclosing call has no resolved signature.
    #[arg(long = "strict-outer-calls", alias = "strictOuterCalls")]
    pub strict_outer_calls: bool,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Colorize the text report. Defaults to whether stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Write the migrated source of every changed unit under this directory.
    #[arg(long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// Print the built-in recipes and exit.
    #[arg(long = "list-recipes", alias = "listRecipes")]
    pub list_recipes: bool,

    /// Unit documents or directories to search for them.
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
