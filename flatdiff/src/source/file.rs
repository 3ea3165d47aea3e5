//! Documents read from a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{DocumentSource, RawJson, RawXml};
use crate::error::{Error, Result};

/// Reads documents from files in one directory.
///
/// An identifier names a file in the directory. Per format, an extension can
/// be appended to the identifier, so XML pair lists may omit `.xml`.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    xml_extension: Option<String>,
    json_extension: Option<String>,
}

impl FileSource {
    /// Creates a source reading identifiers verbatim from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSource {
            dir: dir.into(),
            xml_extension: None,
            json_extension: None,
        }
    }

    /// Appends `.ext` to XML identifiers.
    pub fn with_xml_extension(mut self, ext: impl Into<String>) -> Self {
        self.xml_extension = Some(ext.into());
        self
    }

    /// Appends `.ext` to JSON identifiers.
    pub fn with_json_extension(mut self, ext: impl Into<String>) -> Self {
        self.json_extension = Some(ext.into());
        self
    }

    /// Returns the directory documents are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves an identifier to a file path.
    pub fn resolve(&self, id: &str, extension: Option<&str>) -> PathBuf {
        match extension {
            Some(ext) if !ext.is_empty() => self.dir.join(format!("{}.{}", id, ext)),
            _ => self.dir.join(id),
        }
    }

}

fn read_error(path: &Path, e: std::io::Error) -> Error {
    match e.kind() {
        ErrorKind::NotFound => Error::MissingDocument(path.display().to_string()),
        _ => Error::Io(e),
    }
}

impl DocumentSource for FileSource {
    fn fetch_xml(&mut self, id: &str) -> Result<RawXml> {
        let path = self.resolve(id, self.xml_extension.as_deref());
        // Bytes, so the parser can honour the declared encoding
        fs::read(&path)
            .map(RawXml::Bytes)
            .map_err(|e| read_error(&path, e))
    }

    fn fetch_raw_json(&mut self, id: &str) -> Result<RawJson> {
        let path = self.resolve(id, self.json_extension.as_deref());
        fs::read_to_string(&path)
            .map(RawJson::Text)
            .map_err(|e| read_error(&path, e))
    }
}
