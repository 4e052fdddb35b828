//! Storage backends for configuration files.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Where named configuration files live.
///
/// The threat settings loader only ever needs whole-file reads and writes,
/// so the interface stays at that grain. A missing file is `Ok(None)`, not
/// an error; only real I/O failures surface as `Err`.
pub trait ConfigStore {
    fn read(&self, name: &str) -> io::Result<Option<String>>;
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;
}

/// Files under a single directory on disk.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ConfigStore for DirectoryStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.root.join(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(name), contents)
    }
}

/// In-memory store for tests and headless runs.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        Ok(files.get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}
