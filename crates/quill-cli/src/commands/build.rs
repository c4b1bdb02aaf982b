use std::path::PathBuf;

use quill_codegen::{generate, write_files, GeneratorOptions, Target};

use crate::commands::{load_ast, load_source};
use crate::config::resolve_config;
use crate::error::CliError;

#[derive(Debug)]
pub struct BuildArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub targets: Vec<Target>,
    pub config: Option<PathBuf>,
    pub from_ast: bool,
}

pub fn handle_build(args: BuildArgs) -> Result<(), CliError> {
    let config = resolve_config(args.config.as_deref(), &args.file)?;

    // flags win over the config file, which wins over the defaults
    let output = args
        .output
        .or_else(|| config.as_ref().and_then(|c| c.output_dir()))
        .unwrap_or_else(|| PathBuf::from("."));
    let mut targets = if !args.targets.is_empty() {
        args.targets
    } else {
        config
            .as_ref()
            .map(|c| c.config.build.targets.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| vec![Target::Cpp])
    };
    let mut seen = Vec::with_capacity(targets.len());
    targets.retain(|t| {
        let first = !seen.contains(t);
        seen.push(*t);
        first
    });
    let options = config
        .map(|c| c.config.swift)
        .unwrap_or_else(GeneratorOptions::default);

    let loaded = if args.from_ast { load_ast(&args.file)? } else { load_source(&args.file)? };
    let validated = loaded.validate()?;

    for target in targets {
        let files = generate(&validated, target, &options);
        let written = write_files(&output, &files)?;
        log::info!("{target}: {} file(s)", written.len());
        for path in written {
            println!("{}", path.display());
        }
    }
    Ok(())
}
