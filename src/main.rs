use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod write;

#[derive(Parser)]
#[command(version, about = "Render stub templates into files")]
struct Args {
    /// Print debug logs to stderr
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    command: StubleCommand,
}

#[derive(Parser)]
struct MakeArgs {
    /// The stub to render, e.g. `model`, `global:crud/controller` or a file path
    stub: String,

    /// Parameter values written as `key:value`
    params: Vec<String>,

    /// Print the rendered output instead of writing files
    #[arg(short, long, default_value = "false")]
    dump: bool,

    /// Overwrite existing files
    #[arg(short = 'F', long, default_value = "false", conflicts_with = "skip_exists")]
    overwrite: bool,

    /// Leave existing files untouched
    #[arg(short = 'S', long, default_value = "false")]
    skip_exists: bool,

    /// Directory save paths are relative to (defaults to the working directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct InfoArgs {
    /// The stub to inspect
    stub: String,
}

#[derive(Subcommand)]
enum StubleCommand {
    /// Render a stub and write the result
    Make(MakeArgs),

    /// Show a stub's location and parameters
    Info(InfoArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    match args.command {
        StubleCommand::Make(args) => {
            commands::make::run(&args).await?;
        }
        StubleCommand::Info(args) => {
            commands::info::run(&args).await?;
        }
    }

    Ok(())
}
