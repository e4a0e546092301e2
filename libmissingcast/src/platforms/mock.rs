//! Mock publisher for testing
//!
//! Simulates credential checks, uploads, and posts without network access.
//! Counters and recorded posts live behind `Arc<Mutex<_>>` so a test can
//! keep a clone and inspect what the code under test did.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{PlatformError, Result};
use crate::platforms::Publisher;
use crate::types::MediaPayload;

/// A post accepted by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub text: String,
    pub media_ids: Vec<String>,
}

/// Configuration for mock publisher behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Publisher name reported through `Publisher::name`
    pub name: String,

    /// Whether credential verification should succeed
    pub auth_succeeds: bool,

    /// Whether media uploads should succeed
    pub upload_succeeds: bool,

    /// Number of initial post attempts that fail before posts start succeeding
    pub failing_posts: usize,

    /// Error to return on authentication failure
    pub auth_error: Option<String>,

    /// Error to return on upload failure
    pub upload_error: Option<String>,

    /// Error to return on post failure
    pub post_error: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            auth_succeeds: true,
            upload_succeeds: true,
            failing_posts: 0,
            auth_error: None,
            upload_error: None,
            post_error: None,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    verify_calls: usize,
    upload_calls: usize,
    post_calls: usize,
    uploads: Vec<MediaPayload>,
    posted: Vec<RecordedPost>,
}

/// Mock publisher for testing
#[derive(Debug, Clone)]
pub struct MockPublisher {
    config: MockConfig,
    state: Arc<Mutex<MockState>>,
}

impl MockPublisher {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// A mock that accepts everything
    pub fn success(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// A mock whose credential check fails
    pub fn auth_failure(name: &str, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            auth_succeeds: false,
            auth_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// A mock whose uploads fail
    pub fn upload_failure(name: &str, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            upload_succeeds: false,
            upload_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// A mock whose posts always fail
    pub fn post_failure(name: &str, error: &str) -> Self {
        Self::fail_first_posts(name, usize::MAX, error)
    }

    /// A mock whose first `count` posts fail and later posts succeed
    pub fn fail_first_posts(name: &str, count: usize, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            failing_posts: count,
            post_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn verify_call_count(&self) -> usize {
        self.lock().verify_calls
    }

    pub fn upload_call_count(&self) -> usize {
        self.lock().upload_calls
    }

    pub fn post_call_count(&self) -> usize {
        self.lock().post_calls
    }

    /// Payloads passed to `upload_media`, successful or not
    pub fn uploads(&self) -> Vec<MediaPayload> {
        self.lock().uploads.clone()
    }

    /// Posts that were accepted
    pub fn posted(&self) -> Vec<RecordedPost> {
        self.lock().posted.clone()
    }

    /// Total calls of any kind
    pub fn total_calls(&self) -> usize {
        let state = self.lock();
        state.verify_calls + state.upload_calls + state.post_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn verify_credentials(&self) -> Result<String> {
        self.lock().verify_calls += 1;

        if self.config.auth_succeeds {
            Ok(format!("@{}", self.config.name))
        } else {
            let error_msg = self
                .config
                .auth_error
                .clone()
                .unwrap_or_else(|| "Mock authentication failed".to_string());
            Err(PlatformError::Authentication(error_msg).into())
        }
    }

    async fn upload_media(&self, media: &MediaPayload) -> Result<String> {
        let mut state = self.lock();
        state.upload_calls += 1;
        state.uploads.push(media.clone());

        if self.config.upload_succeeds {
            Ok(format!("{}-media-{}", self.config.name, state.upload_calls))
        } else {
            let error_msg = self
                .config
                .upload_error
                .clone()
                .unwrap_or_else(|| "Mock upload failed".to_string());
            Err(PlatformError::Posting(error_msg).into())
        }
    }

    async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String> {
        let mut state = self.lock();
        state.post_calls += 1;

        if state.post_calls <= self.config.failing_posts {
            let error_msg = self
                .config
                .post_error
                .clone()
                .unwrap_or_else(|| "Mock posting failed".to_string());
            return Err(PlatformError::Posting(error_msg).into());
        }

        state.posted.push(RecordedPost {
            text: text.to_string(),
            media_ids: media_ids.to_vec(),
        });
        Ok(format!("{}-post-{}", self.config.name, state.posted.len()))
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageMimeType;

    #[tokio::test]
    async fn test_mock_success() {
        let publisher = MockPublisher::success("test");

        assert_eq!(publisher.name(), "test");
        assert_eq!(publisher.verify_credentials().await.unwrap(), "@test");

        let post_id = publisher.create_post("Test content", &[]).await.unwrap();
        assert_eq!(post_id, "test-post-1");
        assert_eq!(publisher.verify_call_count(), 1);
        assert_eq!(publisher.post_call_count(), 1);

        let posted = publisher.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].text, "Test content");
    }

    #[tokio::test]
    async fn test_mock_auth_failure() {
        let publisher = MockPublisher::auth_failure("test", "Invalid credentials");

        let err = publisher.verify_credentials().await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("Invalid credentials"));
        assert_eq!(publisher.verify_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_upload_records_payload() {
        let publisher = MockPublisher::success("test");
        let media = MediaPayload::new(vec![9, 9], ImageMimeType::Gif);

        let media_id = publisher.upload_media(&media).await.unwrap();

        assert_eq!(media_id, "test-media-1");
        assert_eq!(publisher.uploads(), vec![media]);
    }

    #[tokio::test]
    async fn test_mock_fail_first_posts() {
        let publisher = MockPublisher::fail_first_posts("test", 1, "Server error");

        let first = publisher.create_post("one", &[]).await;
        assert!(first.unwrap_err().to_string().contains("Server error"));

        let second = publisher.create_post("two", &[]).await.unwrap();
        assert_eq!(second, "test-post-1");
        assert_eq!(publisher.post_call_count(), 2);
        assert_eq!(publisher.posted()[0].text, "two");
    }

    #[tokio::test]
    async fn test_mock_clones_share_state() {
        let publisher = MockPublisher::success("test");
        let handle = publisher.clone();

        publisher.create_post("shared", &[]).await.unwrap();

        assert_eq!(handle.post_call_count(), 1);
        assert_eq!(handle.total_calls(), 1);
    }
}
