use tracing::{info_span, warn};

use crate::catalog::Document;
use crate::session::Session;
use crate::storage::{validate_name, Removal};

use super::confirm::Confirm;
use super::error::PipelineError;

/// What happened to the archived file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRemoval {
    Removed,
    /// The file was already gone. Informational only.
    AlreadyAbsent,
    /// The file could not be removed; the catalog row is gone regardless.
    Failed(String),
}

#[derive(Debug)]
pub struct DeleteReceipt {
    pub name: String,
    /// False when the catalog had no record of that name.
    pub record_removed: bool,
    pub file: FileRemoval,
    pub view: Option<Vec<Document>>,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Done(DeleteReceipt),
    Aborted { name: String },
    Failed { error: PipelineError },
}

impl DeleteOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn message(&self) -> String {
        match self {
            Self::Done(receipt) => match &receipt.file {
                FileRemoval::Removed => format!("Deleted '{}'.", receipt.name),
                FileRemoval::AlreadyAbsent => format!(
                    "The file '{}' was already deleted. The catalog entry was removed.",
                    receipt.name
                ),
                FileRemoval::Failed(reason) => format!(
                    "The catalog entry was removed, but the file '{}' could not be deleted: {}",
                    receipt.name, reason
                ),
            },
            Self::Aborted { name } => format!("Kept '{}'.", name),
            Self::Failed { error } => format!("{}. Nothing was deleted.", error),
        }
    }
}

/// Removes a record and then its archived file.
///
/// The catalog row goes first so a missing or locked file never leaves a
/// record pointing at nothing. A failed file removal does not restore the row.
pub struct DeletePipeline<'a> {
    session: &'a Session,
    confirm: &'a dyn Confirm,
}

impl<'a> DeletePipeline<'a> {
    pub fn new(session: &'a Session, confirm: &'a dyn Confirm) -> Self {
        Self { session, confirm }
    }

    pub fn run(&self, name: &str) -> DeleteOutcome {
        let _span = info_span!("delete", name = %name).entered();

        if let Err(e) = validate_name(name) {
            return DeleteOutcome::Failed { error: e.into() };
        }

        if !self.confirm.confirm_delete(name) {
            return DeleteOutcome::Aborted {
                name: name.to_string(),
            };
        }

        let record_removed = match self.session.catalog().delete(name) {
            Ok(removed) => removed,
            Err(e) => return DeleteOutcome::Failed { error: e.into() },
        };

        let file = match self.session.archiver().remove(name) {
            Ok(Removal::Removed(_)) => FileRemoval::Removed,
            Ok(Removal::AlreadyAbsent(_)) => {
                log::info!("Archived file {} was already absent", name);
                FileRemoval::AlreadyAbsent
            }
            Err(e) => {
                warn!("Could not remove archived file {}: {}", name, e);
                FileRemoval::Failed(e.to_string())
            }
        };

        let view = match self.session.refresh() {
            Ok(view) => Some(view),
            Err(e) => {
                warn!("Could not refresh the listing after deleting {}: {}", name, e);
                None
            }
        };

        DeleteOutcome::Done(DeleteReceipt {
            name: name.to_string(),
            record_removed,
            file,
            view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, NewDocument};
    use crate::pipeline::confirm::{AlwaysConfirm, NeverConfirm};
    use tempfile::TempDir;

    fn session_with(temp: &TempDir, names: &[&str]) -> Session {
        let session = Session::with_catalog(temp.path(), Catalog::open_in_memory().unwrap());
        for name in names {
            std::fs::write(temp.path().join(name), name.as_bytes()).unwrap();
            session
                .catalog()
                .upsert(&NewDocument {
                    name: name.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
        session
    }

    #[test]
    fn test_delete_removes_row_and_file() {
        let temp = TempDir::new().unwrap();
        let session = session_with(&temp, &["a.pdf", "b.pdf"]);

        let outcome = DeletePipeline::new(&session, &AlwaysConfirm).run("a.pdf");

        match outcome {
            DeleteOutcome::Done(receipt) => {
                assert!(receipt.record_removed);
                assert_eq!(receipt.file, FileRemoval::Removed);
                let names: Vec<_> = receipt.view.unwrap().into_iter().map(|d| d.name).collect();
                assert_eq!(names, vec!["b.pdf"]);
            }
            other => panic!("Expected Done, got {:?}", other),
        }
        assert!(!temp.path().join("a.pdf").exists());
        assert!(temp.path().join("b.pdf").exists());
    }

    #[test]
    fn test_delete_with_missing_file_reports_absent() {
        let temp = TempDir::new().unwrap();
        let session = session_with(&temp, &["invoice.pdf"]);
        std::fs::remove_file(temp.path().join("invoice.pdf")).unwrap();

        let outcome = DeletePipeline::new(&session, &AlwaysConfirm).run("invoice.pdf");

        match &outcome {
            DeleteOutcome::Done(receipt) => {
                assert!(receipt.record_removed);
                assert_eq!(receipt.file, FileRemoval::AlreadyAbsent);
            }
            other => panic!("Expected Done, got {:?}", other),
        }
        assert!(outcome.message().contains("already deleted"));
        assert!(session.catalog().find_by_name("invoice.pdf").unwrap().is_none());
    }

    #[test]
    fn test_declined_deletes_nothing() {
        let temp = TempDir::new().unwrap();
        let session = session_with(&temp, &["a.pdf"]);

        let outcome = DeletePipeline::new(&session, &NeverConfirm).run("a.pdf");

        assert!(matches!(outcome, DeleteOutcome::Aborted { .. }));
        assert!(temp.path().join("a.pdf").exists());
        assert_eq!(session.catalog().count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_name_is_noop() {
        let temp = TempDir::new().unwrap();
        let session = session_with(&temp, &["a.pdf"]);

        let outcome = DeletePipeline::new(&session, &AlwaysConfirm).run("zzz.pdf");

        match outcome {
            DeleteOutcome::Done(receipt) => {
                assert!(!receipt.record_removed);
                assert_eq!(receipt.file, FileRemoval::AlreadyAbsent);
            }
            other => panic!("Expected Done, got {:?}", other),
        }
        assert_eq!(session.catalog().count().unwrap(), 1);
    }

    #[test]
    fn test_path_like_name_rejected_before_anything() {
        let temp = TempDir::new().unwrap();
        let session = session_with(&temp, &["a.pdf"]);

        let outcome = DeletePipeline::new(&session, &AlwaysConfirm).run("../a.pdf");

        assert!(matches!(
            outcome,
            DeleteOutcome::Failed {
                error: PipelineError::Archive(_)
            }
        ));
        assert_eq!(session.catalog().count().unwrap(), 1);
    }

    #[test]
    fn test_unremovable_file_still_drops_row() {
        let temp = TempDir::new().unwrap();
        let session = session_with(&temp, &[]);
        // A directory under the record's name cannot be removed with remove_file.
        std::fs::create_dir(temp.path().join("folder.pdf")).unwrap();
        session
            .catalog()
            .upsert(&NewDocument {
                name: "folder.pdf".to_string(),
                ..Default::default()
            })
            .unwrap();

        let outcome = DeletePipeline::new(&session, &AlwaysConfirm).run("folder.pdf");

        match outcome {
            DeleteOutcome::Done(receipt) => {
                assert!(receipt.record_removed);
                assert!(matches!(receipt.file, FileRemoval::Failed(_)));
            }
            other => panic!("Expected Done, got {:?}", other),
        }
        assert_eq!(session.catalog().count().unwrap(), 0);
    }
}
