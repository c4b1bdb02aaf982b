use std::path::Path;

use crate::error::{convert_io_error, CliError};

pub fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| convert_io_error(e, path.to_path_buf(), "reading"))
}

pub fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| convert_io_error(e, parent.to_path_buf(), "creating directory"))?;
    }
    std::fs::write(path, contents).map_err(|e| convert_io_error(e, path.to_path_buf(), "writing"))
}
