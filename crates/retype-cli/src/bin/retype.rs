use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use retype_cli::args::{CliArgs, OutputFormat};
use retype_cli::reporter::{Reporter, render_json};
use retype_cli::{driver, tracing_config};
use retype_types::TypeInterner;

fn main() -> Result<()> {
    // No-op unless RETYPE_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let color = args
        .pretty
        .unwrap_or_else(|| std::io::stdout().is_terminal());

    if args.list_recipes {
        let types = TypeInterner::new();
        print!("{}", Reporter::new(color).render_catalog(&types));
        return Ok(());
    }

    let result = driver::run(&args, &cwd)?;
    match args.format {
        OutputFormat::Text => print!("{}", Reporter::new(color).render(&result)),
        OutputFormat::Json => println!("{}", render_json(&result)?),
    }
    Ok(())
}
