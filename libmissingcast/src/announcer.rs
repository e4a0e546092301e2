//! Run orchestration
//!
//! One run is strictly linear:
//!
//! ```text
//! verify credentials ─┬─ fail → error (nothing fetched, nothing posted)
//!                     └─ ok → fetch primary → fetch mirror
//!                             → announce primary → announce mirror → report
//! ```
//!
//! Fetch errors abort the run. Each announcement is isolated: a failed photo
//! download or post is logged and recorded, and the next one still runs.

use std::path::Path;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::db::RecordStore;
use crate::error::Result;
use crate::format::{compose_mirror, compose_primary};
use crate::media::{self, MediaFetcher};
use crate::platforms::{publish, Publisher};
use crate::types::{MirrorRecord, PrimaryRecord};

/// How one record shape turns into a post
pub struct Pipeline<R> {
    /// Label used in logs and the run report
    pub source: &'static str,
    pub compose: fn(&R) -> String,
    pub photo_url: fn(&R) -> Option<&str>,
}

impl Pipeline<PrimaryRecord> {
    pub fn primary() -> Self {
        Self {
            source: "primary",
            compose: compose_primary,
            photo_url: |record| record.photo_url.as_deref(),
        }
    }
}

impl Pipeline<MirrorRecord> {
    pub fn mirror() -> Self {
        Self {
            source: "mirror",
            compose: compose_mirror,
            photo_url: |record| record.photo_url.as_deref(),
        }
    }
}

/// Result of one announcement attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The table had no row
    Skipped,
    Published { post_id: String },
    Failed { error: String },
    /// Text was composed but not sent
    DryRun { text: String },
}

impl PipelineOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PipelineOutcome::Failed { .. })
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub account: String,
    pub primary: PipelineOutcome,
    pub mirror: PipelineOutcome,
}

impl RunReport {
    pub fn published_count(&self) -> usize {
        [&self.primary, &self.mirror]
            .iter()
            .filter(|outcome| matches!(outcome, PipelineOutcome::Published { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        [&self.primary, &self.mirror]
            .iter()
            .filter(|outcome| outcome.is_failed())
            .count()
    }
}

/// Fetches the newest records and announces them
///
/// All collaborators are borrowed; the caller builds them once and can swap
/// any of them for a test double.
pub struct Announcer<'a> {
    store: &'a dyn RecordStore,
    media: &'a dyn MediaFetcher,
    publisher: &'a dyn Publisher,
    dry_run: bool,
}

impl<'a> Announcer<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        media: &'a dyn MediaFetcher,
        publisher: &'a dyn Publisher,
    ) -> Self {
        Self {
            store,
            media,
            publisher,
            dry_run: false,
        }
    }

    /// Compose and log posts without downloading photos or publishing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let account = match self.publisher.verify_credentials().await {
            Ok(account) => {
                info!(platform = self.publisher.name(), %account, "Credentials verified");
                account
            }
            Err(e) => {
                error!(platform = self.publisher.name(), error = %e, "Credential check failed");
                return Err(e);
            }
        };

        let primary = self.store.latest_primary().await?;
        info!(found = primary.is_some(), "Fetched latest primary record");

        let mirror = self.store.latest_mirror().await?;
        info!(found = mirror.is_some(), "Fetched latest mirror record");

        if primary.is_none() && mirror.is_none() {
            info!("No records found, nothing to post");
            return Ok(RunReport {
                account,
                primary: PipelineOutcome::Skipped,
                mirror: PipelineOutcome::Skipped,
            });
        }

        let primary = self.announce(&Pipeline::primary(), primary.as_ref()).await;
        let mirror = self.announce(&Pipeline::mirror(), mirror.as_ref()).await;

        let report = RunReport {
            account,
            primary,
            mirror,
        };
        info!(
            published = report.published_count(),
            failed = report.failed_count(),
            "Run complete"
        );
        Ok(report)
    }

    /// Compose, fetch the photo, and publish one record; never fails the run
    pub async fn announce<R>(&self, pipeline: &Pipeline<R>, record: Option<&R>) -> PipelineOutcome {
        let source = pipeline.source;
        let Some(record) = record else {
            info!(source, "No record, skipping");
            return PipelineOutcome::Skipped;
        };

        let text = (pipeline.compose)(record);
        let photo_url = (pipeline.photo_url)(record).filter(|url| !url.trim().is_empty());

        if self.dry_run {
            info!(source, photo_url, "Dry run, not publishing:\n{}", text);
            return PipelineOutcome::DryRun { text };
        }

        match self.deliver(&text, photo_url).await {
            Ok(post_id) => PipelineOutcome::Published { post_id },
            Err(e) => {
                warn!(source, error = %e, "Announcement failed, continuing");
                PipelineOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn deliver(&self, text: &str, photo_url: Option<&str>) -> Result<String> {
        let photo = match photo_url {
            Some(url) => Some(self.media.fetch(url).await?),
            None => None,
        };
        publish(self.publisher, text, photo.as_ref()).await
    }
}

/// Upload a local image file and post it with `text`
///
/// Kept for one-off manual posts outside the database flow.
pub async fn post_image(publisher: &dyn Publisher, path: &Path, text: &str) -> Result<String> {
    let payload = media::load_file(path).await?;
    info!(path = %path.display(), bytes = payload.len(), "Loaded image");
    publish(publisher, text, Some(&payload)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipelines_read_photo_url() {
        let primary = PrimaryRecord {
            photo_url: Some("https://example.com/p.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(
            (Pipeline::primary().photo_url)(&primary),
            Some("https://example.com/p.jpg")
        );

        let mirror = MirrorRecord::default();
        assert_eq!((Pipeline::mirror().photo_url)(&mirror), None);
    }

    #[test]
    fn test_report_counts() {
        let report = RunReport {
            account: "@bot".to_string(),
            primary: PipelineOutcome::Published {
                post_id: "1".to_string(),
            },
            mirror: PipelineOutcome::Failed {
                error: "boom".to_string(),
            },
        };
        assert_eq!(report.published_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = PipelineOutcome::Published {
            post_id: "42".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({ "status": "published", "post_id": "42" })
        );
        assert_eq!(
            serde_json::to_value(PipelineOutcome::Skipped).unwrap(),
            serde_json::json!({ "status": "skipped" })
        );
    }
}
