//! Per-session context: the storage root, its catalog and archiver, and the
//! active search term. Front ends hold one `Session` and pass it to every
//! pipeline call instead of keeping process-wide globals.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogError, Document};
use crate::error::{ArchiveError, DopiError};
use crate::storage::Archiver;

pub struct Session {
    root: PathBuf,
    catalog: Catalog,
    archiver: Archiver,
    last_search: String,
}

impl Session {
    /// Opens the storage root and the catalog file inside it.
    pub fn open<P: AsRef<Path>>(storage_root: P) -> Result<Self, DopiError> {
        let root = storage_root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ArchiveError::StorageRootUnavailable(root).into());
        }
        let catalog = Catalog::open(&root)?;
        Ok(Self::with_catalog(root, catalog))
    }

    /// Builds a session over an already opened catalog.
    pub fn with_catalog<P: AsRef<Path>>(storage_root: P, catalog: Catalog) -> Self {
        let root = storage_root.as_ref().to_path_buf();
        Self {
            archiver: Archiver::new(&root),
            root,
            catalog,
            last_search: String::new(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn archiver(&self) -> &Archiver {
        &self.archiver
    }

    pub fn last_search(&self) -> &str {
        &self.last_search
    }

    /// Runs a search and remembers the term for later refreshes.
    pub fn search(&mut self, term: &str) -> Result<Vec<Document>, CatalogError> {
        self.last_search = term.to_string();
        self.catalog.search(term)
    }

    pub fn clear_search(&mut self) {
        self.last_search.clear();
    }

    /// The current view: results of the active search, or every record.
    pub fn refresh(&self) -> Result<Vec<Document>, CatalogError> {
        self.catalog.search(&self.last_search)
    }

    /// Path of the archived file for a catalog name, if it is on disk.
    pub fn archived_path(&self, name: &str) -> Result<PathBuf, DopiError> {
        let path = self.archiver.path_for(name)?;
        if !path.is_file() {
            return Err(DopiError::FileMissing {
                name: name.to_string(),
                path,
            });
        }
        Ok(path)
    }
}
