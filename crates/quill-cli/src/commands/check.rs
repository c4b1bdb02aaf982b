use std::path::Path;

use crate::commands::load_source;
use crate::error::CliError;

pub fn handle_check(file: &Path) -> Result<(), CliError> {
    let loaded = load_source(file)?;
    let validated = loaded.validate()?;
    let count = validated.namespaces().count();
    println!("{}: ok ({count} namespace{})", loaded.name, if count == 1 { "" } else { "s" });
    Ok(())
}
