use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const DATABASE_ENV: &str = "READTRACK_DB";

/// `--db`, then `READTRACK_DB`, then the platform data directory.
pub fn database_file_path(cli_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        return Ok(path.to_path_buf());
    }
    if let Some(custom) = env::var_os(DATABASE_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(custom));
    }
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join("readtrack").join("readtrack.db"))
}

pub fn log_file_path(database_path: &Path) -> PathBuf {
    database_path.with_file_name("readtrack.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins() {
        let path = database_file_path(Some(Path::new("/tmp/books/progress.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/books/progress.db"));
    }

    #[test]
    fn log_file_sits_next_to_database() {
        assert_eq!(
            log_file_path(Path::new("/data/readtrack/readtrack.db")),
            PathBuf::from("/data/readtrack/readtrack.log")
        );
    }
}
