//! The catalog: document metadata and extracted text, keyed by file name.
//!
//! `upsert`, `list_all`, `find_by_name`, `search` and `delete` are the whole
//! surface front ends may use. Every store failure is reported as
//! [`CatalogError::Unavailable`]; a caller seeing it must not assume the
//! last write is durable.

use std::path::Path;

use thiserror::Error;

use crate::db::{self, document_repo, Database, DatabaseError};

pub use crate::db::NewDocument;

/// A live catalog record.
pub type Document = db::DocumentRow;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(#[from] DatabaseError),
}

#[derive(Clone)]
pub struct Catalog {
    db: Database,
}

impl Catalog {
    /// Opens the catalog file `DOPI.db` inside `storage_root`.
    pub fn open(storage_root: &Path) -> Result<Self, CatalogError> {
        let db = Database::open(&db::catalog_path(storage_root))?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    /// Insert-or-update keyed on `name`, as a single statement.
    pub fn upsert(&self, doc: &NewDocument) -> Result<i64, CatalogError> {
        let id = document_repo::upsert(&self.db, doc)?;
        log::debug!("Upserted catalog row {} for {}", id, doc.name);
        Ok(id)
    }

    pub fn list_all(&self) -> Result<Vec<Document>, CatalogError> {
        Ok(document_repo::list_all(&self.db)?)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Document>, CatalogError> {
        Ok(document_repo::find_by_name(&self.db, name)?)
    }

    pub fn search(&self, term: &str) -> Result<Vec<Document>, CatalogError> {
        Ok(document_repo::search(&self.db, term)?)
    }

    /// Removes the record named `name`. Returns false when there was none.
    pub fn delete(&self, name: &str) -> Result<bool, CatalogError> {
        let removed = document_repo::delete(&self.db, name)?;
        if removed {
            log::debug!("Deleted catalog row for {}", name);
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<u64, CatalogError> {
        Ok(document_repo::count(&self.db)?)
    }
}
