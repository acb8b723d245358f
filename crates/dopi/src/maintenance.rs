//! Read-only consistency audit between the storage root and the catalog.
//!
//! The pipelines never scan for orphans on their own; this is a separate
//! operation a front end can offer. It reports and never repairs.

use std::collections::BTreeSet;

use serde::Serialize;
use walkdir::WalkDir;

use crate::db;
use crate::error::DopiError;
use crate::session::Session;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Files in the storage root without a catalog record.
    pub orphan_files: Vec<String>,
    /// Catalog records whose file is missing from the storage root.
    pub dangling_rows: Vec<String>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.orphan_files.is_empty() && self.dangling_rows.is_empty()
    }
}

pub fn audit(session: &Session) -> Result<AuditReport, DopiError> {
    let root = session.storage_root();
    let mut files = BTreeSet::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !db::is_catalog_file(name) {
                files.insert(name.to_string());
            }
        }
    }

    let names: BTreeSet<String> = session
        .catalog()
        .list_all()?
        .into_iter()
        .map(|doc| doc.name)
        .collect();

    let report = AuditReport {
        orphan_files: files.difference(&names).cloned().collect(),
        dangling_rows: names.difference(&files).cloned().collect(),
    };

    log::info!(
        "Audited {}: {} orphan files, {} dangling rows",
        root.display(),
        report.orphan_files.len(),
        report.dangling_rows.len()
    );
    Ok(report)
}
