//! Missingcast - missing-person announcements for X
//!
//! Reads the newest record from the primary and mirror missing-person
//! tables, renders a Thai-language announcement for each, and posts it with
//! the person's photo when one is available.

pub mod announcer;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod media;
pub mod oauth;
pub mod platforms;
pub mod types;

// Re-export commonly used types
pub use announcer::{Announcer, PipelineOutcome, RunReport};
pub use config::Config;
pub use db::{MySqlRecordStore, RecordStore};
pub use error::{MissingcastError, Result};
pub use media::{HttpMediaFetcher, MediaFetcher};
pub use types::{ImageMimeType, MediaPayload, MirrorRecord, PrimaryRecord};
