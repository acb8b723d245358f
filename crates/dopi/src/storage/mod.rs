pub mod archiver;

pub use archiver::{validate_name, ArchiveMode, Archiver, Placement, Removal};
