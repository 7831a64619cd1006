//! Append-only file output.

use super::Handler;
use crate::Error;
use crate::internal;
use crate::level::Level;
use crate::record::Record;
use crate::render::{LineRenderer, Renderer};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends each record's rendering to one file.
///
/// The file is opened on first write and released by `close`; a later write
/// opens it again, so a closed handler stays usable.
pub struct FileHandler {
    name: String,
    path: PathBuf,
    renderer: Box<dyn Renderer>,
    min_level: Level,
    file: Mutex<Option<File>>,
}

impl std::fmt::Debug for FileHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandler")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("min_level", &self.min_level)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl FileHandler {
    /// `~` in `path` is expanded to the home directory.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            name: "file".to_string(),
            path: expand_path(path.as_ref()),
            renderer: Box::new(LineRenderer::new()),
            min_level: Level::Debug,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    #[must_use]
    pub fn boxed_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub const fn level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file handle is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.file.lock().is_some()
    }

    fn write(&self, text: &str) -> Result<(), Error> {
        let mut slot = self.file.lock();
        if slot.is_none() {
            *slot = Some(open_append(&self.path, "FILE")?);
        }
        if let Some(file) = slot.as_mut() {
            file.write_all(text.as_bytes())?;
        }
        Ok(())
    }
}

impl Handler for FileHandler {
    fn handle(&self, record: &Record) -> Result<(), Error> {
        self.write(&self.renderer.render(record))
    }

    /// One write for the whole batch, using the renderer's batch form.
    fn handle_batch(&self, records: &[Record]) -> Result<(), Error> {
        let accepted: Vec<Record> = records
            .iter()
            .filter(|r| self.is_handling(r.level()))
            .cloned()
            .collect();
        if accepted.is_empty() {
            return Ok(());
        }
        self.write(&self.renderer.render_batch(&accepted))
    }

    fn is_handling(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn flush(&self) -> Result<(), Error> {
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        if let Some(mut file) = self.file.lock().take() {
            file.flush()?;
            internal::debug("FILE", &format!("Closed {}", self.path.display()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub(super) fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

/// Opens `path` for appending, creating missing parent directories.
pub(super) fn open_append(path: &Path, scope: &str) -> Result<File, Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        match fs::create_dir_all(parent) {
            Ok(()) => {
                internal::debug(scope, &format!("Created directory: {}", parent.display()));
            }
            Err(e) => {
                internal::error(
                    scope,
                    &format!("Failed to create directory {}: {}", parent.display(), e),
                );
                return Err(e.into());
            }
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    internal::trace(scope, &format!("Opened {}", path.display()));
    Ok(file)
}
