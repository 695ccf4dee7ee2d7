//! Combined document builder
//!
//! The document is written in two passes. The header and a TOC placeholder
//! go out first, page sections are appended as batches settle, and once the
//! crawl is over the whole file is read back and the placeholder replaced
//! with the finished table of contents.

use crate::crawler::PageEntry;
use crate::output::markdown::{
    format_header, format_section, format_table_of_contents, TOC_PLACEHOLDER,
};
use crate::output::{OutputError, OutputResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only writer for the combined document
///
/// Finalizing consumes the builder, so the TOC is spliced in exactly once
/// and nothing can be appended afterwards.
#[derive(Debug)]
pub struct DocumentBuilder {
    path: PathBuf,
    file: File,
    sections: usize,
}

impl DocumentBuilder {
    /// Creates (or truncates) the document and writes its header
    ///
    /// The parent directory is created if it does not exist.
    pub fn initialize(path: &Path, title: &str) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = File::create(path).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(format_header(title).as_bytes())
            .map_err(|source| OutputError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("Initialized combined document at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sections: 0,
        })
    }

    /// Number of page sections appended so far
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Appends one page section after everything written so far
    pub fn append_page(&mut self, entry: &PageEntry) -> OutputResult<()> {
        self.file
            .write_all(format_section(entry).as_bytes())
            .map_err(|source| OutputError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.sections += 1;
        Ok(())
    }

    /// Replaces the placeholder with the table of contents for `entries`
    ///
    /// Only the first occurrence of the placeholder is replaced, which is
    /// always the one written by [`DocumentBuilder::initialize`]. With no
    /// entries the document is left as is, keeping an empty TOC heading.
    pub fn finalize_table_of_contents(mut self, entries: &[PageEntry]) -> OutputResult<PathBuf> {
        self.file.flush().map_err(|source| OutputError::Write {
            path: self.path.clone(),
            source,
        })?;
        drop(self.file);

        if entries.is_empty() {
            tracing::debug!("No pages written; leaving empty table of contents");
            return Ok(self.path);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| OutputError::Read {
            path: self.path.clone(),
            source,
        })?;

        if !content.contains(TOC_PLACEHOLDER) {
            return Err(OutputError::PlaceholderMissing(self.path));
        }

        let content = content.replacen(TOC_PLACEHOLDER, &format_table_of_contents(entries), 1);
        fs::write(&self.path, content).map_err(|source| OutputError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            "Wrote table of contents with {} entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(self.path)
    }
}
