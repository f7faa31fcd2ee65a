//! Load migrations from a directory of SQL files
//!
//! Layout: `<key>_<name>.up.sql` with an optional `<key>_<name>.down.sql`.
//! `<key>` is any `i64` (`0003` and `3` are the same key); the `_<name>`
//! part may be omitted. Files without either suffix are ignored.

use crate::errors::Result;
use crate::migrations::Registry;
use mirg_core::errors::{MgError, MgErrorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";

/// Errors raised while reading a migrations directory
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("can't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid migration file name {file}: {reason}")]
    InvalidFileName { file: String, reason: String },

    #[error("duplicate {direction} migration for key {key}: {first} and {second}")]
    DuplicateKey {
        key: i64,
        direction: &'static str,
        first: String,
        second: String,
    },

    #[error("down migration {file} has no matching up migration")]
    MissingUp { key: i64, file: String },
}

impl From<LoadError> for MgError {
    fn from(err: LoadError) -> Self {
        let kind = match err {
            LoadError::Io { .. } => MgErrorKind::Io,
            _ => MgErrorKind::InvalidInput,
        };
        let key = match err {
            LoadError::DuplicateKey { key, .. } | LoadError::MissingUp { key, .. } => Some(key),
            _ => None,
        };

        let mut mg_err = MgError::new(kind)
            .with_op("load_dir")
            .with_message(err.to_string());
        if let Some(key) = key {
            mg_err = mg_err.with_key(key);
        }
        mg_err.with_cause(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// A file name split into its parts
#[derive(Debug, PartialEq, Eq)]
struct ParsedName {
    key: i64,
    name: String,
    direction: Direction,
}

/// `None` for files that are not migrations at all
fn parse_file_name(file: &str) -> std::result::Result<Option<ParsedName>, LoadError> {
    let (stem, direction) = if let Some(stem) = file.strip_suffix(UP_SUFFIX) {
        (stem, Direction::Up)
    } else if let Some(stem) = file.strip_suffix(DOWN_SUFFIX) {
        (stem, Direction::Down)
    } else {
        return Ok(None);
    };

    let (key_part, name) = stem.split_once('_').unwrap_or((stem, ""));
    let key = key_part
        .parse::<i64>()
        .map_err(|e| LoadError::InvalidFileName {
            file: file.to_string(),
            reason: format!("key {:?} is not an integer ({})", key_part, e),
        })?;

    Ok(Some(ParsedName {
        key,
        name: name.to_string(),
        direction,
    }))
}

#[derive(Debug, Default)]
struct SqlFiles {
    name: String,
    up: Option<PathBuf>,
    down: Option<PathBuf>,
}

fn read_sql(path: &Path) -> std::result::Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn scan(dir: &Path) -> std::result::Result<BTreeMap<i64, SqlFiles>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .map_err(io_err)?;
    paths.sort();

    let mut found: BTreeMap<i64, SqlFiles> = BTreeMap::new();
    for path in paths.into_iter().filter(|p| p.is_file()) {
        let file = match path.file_name().and_then(|f| f.to_str()) {
            Some(file) => file.to_string(),
            None => continue,
        };
        let parsed = match parse_file_name(&file)? {
            Some(parsed) => parsed,
            None => {
                tracing::debug!(file = %file, "skipping non-migration file");
                continue;
            }
        };

        let entry = found.entry(parsed.key).or_default();
        let slot = match parsed.direction {
            Direction::Up => &mut entry.up,
            Direction::Down => &mut entry.down,
        };
        if let Some(first) = slot {
            return Err(LoadError::DuplicateKey {
                key: parsed.key,
                direction: parsed.direction.as_str(),
                first: first.display().to_string(),
                second: file,
            });
        }
        *slot = Some(path);
        if parsed.direction == Direction::Up || entry.name.is_empty() {
            entry.name = parsed.name;
        }
    }

    Ok(found)
}

/// Register every migration found in `dir`, returning the loaded keys.
///
/// The directory is validated completely before anything is registered.
///
/// # Errors
///
/// `Io` if the directory or a file can't be read, `InvalidInput` for a
/// malformed name, a duplicated key, or a down file without an up file.
pub fn load_dir(dir: &Path, registry: &mut Registry) -> Result<Vec<i64>> {
    let found = scan(dir)?;

    let mut loaded = Vec::with_capacity(found.len());
    let mut sources = Vec::with_capacity(found.len());
    for (key, files) in found {
        let up = match &files.up {
            Some(up) => read_sql(up)?,
            None => {
                let file = files
                    .down
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                return Err(LoadError::MissingUp { key, file }.into());
            }
        };
        let down = files.down.as_deref().map(read_sql).transpose()?;
        sources.push((key, files.name, up, down));
    }

    for (key, name, up, down) in sources {
        registry.add_sql_migration(key, name, up, down);
        loaded.push(key);
    }

    tracing::info!(dir = %dir.display(), loaded = loaded.len(), "loaded sql migrations");
    Ok(loaded)
}
