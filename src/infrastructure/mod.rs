//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod export;
pub mod logging;
pub mod repository;

pub use config::{PartialSettings, Settings};
pub use export::{ExportFolder, JournalExport};
pub use repository::OutputRepository;
