//! JSON persistence with backup-and-restore writes.
//!
//! Every save first copies the current file to `<file>.bak`. If writing the
//! new content fails, the backup is copied back so the previous document
//! survives; on success the backup is removed.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use burrow_types::error::{BurrowError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Path of the backup kept while `path` is being rewritten.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Load a JSON document. A missing file is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(BurrowError::Persistence(format!("{}: {e}", path.display())));
        },
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| BurrowError::Persistence(format!("{}: {e}", path.display())))
}

/// Serialize `value` as pretty JSON and write it to `path`.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    log::debug!("saving {}", path.display());
    let data = serde_json::to_vec_pretty(value)?;
    replace_with_backup(path, |file| file.write_all(&data))
}

/// Rewrite `path` through `write`, restoring the previous content if `write`
/// fails.
pub fn replace_with_backup<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let persistence = |what: &str, e: io::Error| {
        BurrowError::Persistence(format!("{what} {}: {e}", path.display()))
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| persistence("create directory for", e))?;
    }

    let backup = backup_path(path);
    let had_original = path.exists();
    if had_original {
        fs::copy(path, &backup).map_err(|e| persistence("back up", e))?;
    }

    let written = File::create(path).and_then(|mut file| {
        write(&mut file)?;
        file.sync_all()
    });

    if let Err(e) = written {
        log::error!("error while saving {}: {e}", path.display());
        if had_original {
            if let Err(restore_err) = fs::copy(&backup, path) {
                log::error!(
                    "error while restoring {} from backup: {restore_err}",
                    path.display()
                );
            }
        } else {
            let _ = fs::remove_file(path);
        }
        return Err(persistence("write", e));
    }

    if had_original && let Err(e) = fs::remove_file(&backup) {
        log::warn!("error while removing backup {}: {e}", backup.display());
    }
    Ok(())
}
