use std::fmt::Write;
use std::path::Path;

use quill_syntax::IdlFile;

use crate::commands::load_source;
use crate::error::CliError;
use crate::io::write_file;

pub fn handle_parse(file: &Path, json: bool, output: Option<&Path>) -> Result<(), CliError> {
    let loaded = load_source(file)?;
    loaded.validate()?;

    let text = if json {
        let mut text = loaded.idl.to_json().map_err(CliError::Ast)?;
        text.push('\n');
        text
    } else {
        summary(&loaded.idl)
    };

    match output {
        Some(path) => {
            write_file(path, &text)?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn summary(idl: &IdlFile) -> String {
    let mut out = String::new();
    for ns in &idl.namespaces {
        let _ = writeln!(
            out,
            "namespace {}: {} interface(s), {} enum(s), {} typedef(s), {} constant(s)",
            ns.name,
            ns.interfaces.len(),
            ns.enums.len(),
            ns.typedefs.len(),
            ns.constants.len()
        );
        for interface in &ns.interfaces {
            let _ = writeln!(
                out,
                "  interface {}: {} method(s), {} property(ies)",
                interface.name,
                interface.methods.len(),
                interface.properties.len()
            );
        }
    }
    out
}
