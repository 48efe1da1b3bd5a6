use std::path::{Path, PathBuf};

use validator::ValidationError;

fn check_dir(path: &Path) -> Result<(), &'static str> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err("Path is not a directory"),
        Err(_) => Err("Directory does not exist"),
    }
}

/// The cleanup task deletes files, so its directory must not be read-only.
pub fn validate_is_writable_directory(path: &Path) -> Result<(), ValidationError> {
    check_dir(path).map_err(ValidationError::new)?;

    let readonly = path
        .metadata()
        .map(|x| x.permissions().readonly())
        .map_err(|_| ValidationError::new("Failed to get metadata"))?;

    if readonly {
        return Err(ValidationError::new("Directory is read-only"));
    }

    Ok(())
}

#[must_use]
pub fn value_parser_parse_valid_directory() -> impl clap::builder::TypedValueParser {
    move |s: &str| -> Result<PathBuf, &'static str> {
        let path = Path::new(s);
        check_dir(path)?;

        path.canonicalize().map_err(|_| "Failed to canonicalize path")
    }
}
