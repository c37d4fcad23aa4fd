//! Macro library - a directory of named macro documents

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::MacroDocument;

const EXTENSION: &str = "mimeo";

pub struct MacroStorage {
    dir: PathBuf,
}

impl MacroStorage {
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME not set")?;
        Self::with_dir(PathBuf::from(home).join(".mimeo"))
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Save a macro under `name`. Saving the same name overwrites.
    pub fn save(&self, name: &str, doc: &MacroDocument) -> Result<PathBuf> {
        let path = self.resolve(name);
        doc.save(&path)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<MacroDocument> {
        MacroDocument::load(self.resolve(name))
    }

    /// List saved macro file names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(s) = name.to_str() {
                if s.ends_with(&format!(".{}", EXTENSION)) {
                    files.push(s.to_string());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.resolve(name);
        fs::remove_file(&path)
            .with_context(|| format!("failed to delete {}", path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    // "name" and "name.mimeo" address the same file.
    fn resolve(&self, name: &str) -> PathBuf {
        let name = sanitize(name.trim_end_matches(&format!(".{}", EXTENSION)));
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
