//! Test harness for isolated archive sessions.
//!
//! Each `TestHarness` owns a temporary directory with an `inbox/` holding
//! source documents and an `archive/` storage root with its own catalog.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use assert_fs::TempDir;

use dopi::pipeline::{AlwaysConfirm, Confirm, DeleteOutcome, DeletePipeline, IngestOutcome};
use dopi::{ArchiveMode, Document, IngestPipeline, IngestRequest, Session};

pub struct TestHarness {
    temp_dir: TempDir,
    pub inbox: PathBuf,
    pub storage_root: PathBuf,
    pub session: Session,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let inbox = temp_dir.child("inbox");
        let archive = temp_dir.child("archive");
        inbox.create_dir_all().expect("Failed to create inbox");
        archive.create_dir_all().expect("Failed to create storage root");

        let session = Session::open(archive.path()).expect("Failed to open session");

        Self {
            inbox: inbox.path().to_path_buf(),
            storage_root: archive.path().to_path_buf(),
            temp_dir,
            session,
        }
    }

    /// Writes a source document into the inbox.
    pub fn source(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let child = self.temp_dir.child("inbox").child(name);
        child.write_binary(bytes).expect("Failed to write source file");
        child.path().to_path_buf()
    }

    pub fn archived(&self, name: &str) -> PathBuf {
        self.storage_root.join(name)
    }

    pub fn ingest(&self, request: IngestRequest) -> IngestOutcome {
        self.ingest_with(request, &AlwaysConfirm)
    }

    pub fn ingest_with(&self, request: IngestRequest, confirm: &dyn Confirm) -> IngestOutcome {
        IngestPipeline::new(&self.session, confirm).run(request)
    }

    pub fn ingest_file(&self, path: &Path, mode: ArchiveMode, content: &str) -> IngestOutcome {
        self.ingest(IngestRequest::new(path, mode).content(content))
    }

    pub fn delete(&self, name: &str) -> DeleteOutcome {
        DeletePipeline::new(&self.session, &AlwaysConfirm).run(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.list().into_iter().map(|d| d.name).collect()
    }

    pub fn list(&self) -> Vec<Document> {
        self.session
            .catalog()
            .list_all()
            .expect("Failed to list catalog")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
