//! dayvault - Day One export to Markdown vault converter
//!
//! Reads the JSON journals of an unzipped Day One export and writes one
//! Markdown document per entry (or per day), with metadata as YAML
//! front-matter or inline fields, renamed attachments and working links
//! between entries.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::VaultError;
