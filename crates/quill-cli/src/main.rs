use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use quill_codegen::Target;

mod commands;
mod config;
mod error;
mod io;

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "IDL compiler generating C++, flat C and Swift bindings", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Parse and validate an IDL file, printing a summary or its AST
    Parse {
        /// IDL file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print the AST as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Write the output to a file instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Validate an IDL file and report every error
    Check {
        /// IDL file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate bindings
    Build {
        /// IDL file (or AST JSON with --from-ast)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output directory (defaults to the config's, else the current directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Target to generate; may be repeated
        #[arg(short, long = "target", value_name = "TARGET")]
        targets: Vec<Target>,
        /// Configuration file (defaults to the nearest quill.toml)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Read an AST JSON file instead of IDL source
        #[arg(long)]
        from_ast: bool,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match args.command {
        Command::Parse { file, json, output } => commands::parse::handle_parse(&file, json, output.as_deref())?,
        Command::Check { file } => commands::check::handle_check(&file)?,
        Command::Build { file, output, targets, config, from_ast } => {
            commands::build::handle_build(commands::build::BuildArgs {
                file,
                output,
                targets,
                config,
                from_ast,
            })?
        }
    }
    Ok(())
}
