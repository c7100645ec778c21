use std::fs::{ self, File };
use std::io::{ self, Read };
use std::path::{ Component, Path, PathBuf };
use tar::{ Archive, EntryType };
use tracing::{ debug, warn };

use crate::error::{ AurError, Result };

/// Unpacks package snapshots below a destination directory.
pub struct ArchiveHandler {
    destination: PathBuf,
}

impl ArchiveHandler {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        ArchiveHandler { destination: destination.into() }
    }

    /// Write every directory and regular file of the archive to disk.
    ///
    /// Existing directories are reused and existing files are truncated. Entries
    /// that would land outside the destination are skipped, as are links and
    /// other special entries. Returns the number of files written.
    pub fn unpack<R: Read>(&self, archive: &mut Archive<R>) -> Result<usize> {
        let mut written = 0;

        let entries = archive.entries().map_err(|e| extract_error(&self.destination, e))?;
        for entry in entries {
            let mut entry = entry.map_err(|e| extract_error(&self.destination, e))?;
            let relative = entry
                .path()
                .map_err(|e| extract_error(&self.destination, e))?
                .into_owned();

            // The archive root itself, e.g. "./"
            if relative.components().all(|component| component == Component::CurDir) {
                debug!("skipping {}", relative.display());
                continue;
            }

            let target = match self.enclosed_path(&relative) {
                Some(target) => target,
                None => {
                    warn!("skipping {} - it points outside {}", relative.display(), self.destination.display());
                    continue;
                }
            };

            match entry.header().entry_type() {
                EntryType::Directory => {
                    fs::create_dir_all(&target).map_err(|e| extract_error(&target, e))?;
                }
                EntryType::Regular | EntryType::Continuous => {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent).map_err(|e| extract_error(parent, e))?;
                    }
                    let mut file = File::create(&target).map_err(|e| extract_error(&target, e))?;
                    io::copy(&mut entry, &mut file).map_err(|e| extract_error(&target, e))?;
                    written += 1;
                }
                other => {
                    debug!("skipping {} ({:?})", relative.display(), other);
                }
            }
        }

        Ok(written)
    }

    // Destination-relative path of an entry, or None if it is absolute or climbs out
    fn enclosed_path(&self, relative: &Path) -> Option<PathBuf> {
        let mut target = self.destination.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => target.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return None;
                }
            }
        }

        Some(target)
    }
}

fn extract_error(path: &Path, source: io::Error) -> AurError {
    AurError::Extract { path: path.display().to_string(), source }
}
