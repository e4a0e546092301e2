//! Publishing abstraction and implementations
//!
//! A [`Publisher`] is constructed once at process start and passed by
//! reference to whatever needs to post. [`publish`] is the one place that
//! decides between a text-only post and upload-then-post.
//!
//! ```no_run
//! use libmissingcast::config::XCredentials;
//! use libmissingcast::platforms::{publish, x::XClient, Publisher};
//!
//! # async fn example() -> libmissingcast::Result<()> {
//! let client = XClient::new(XCredentials::new("key", "secret", "token", "token-secret"));
//! client.verify_credentials().await?;
//! let post_id = publish(&client, "สวัสดี", None).await?;
//! println!("Posted: {}", post_id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::Result;
use crate::types::MediaPayload;

pub mod x;

// Available outside tests so integration tests and downstream crates can use it
pub mod mock;

/// A social platform account that can receive posts
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Check that the configured credentials are accepted
    ///
    /// Returns the account handle on success.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` when the platform rejects the
    /// credentials.
    async fn verify_credentials(&self) -> Result<String>;

    /// Upload an image and return the platform's media id
    async fn upload_media(&self, media: &MediaPayload) -> Result<String>;

    /// Publish `text` with the given, already uploaded, media ids
    ///
    /// Returns the platform post id.
    async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String>;

    /// Lowercase platform identifier used in logs
    fn name(&self) -> &str;
}

/// Post `text`, uploading `media` first when present
///
/// Makes one post call, plus one upload call when media is given. Errors are
/// logged with their detail and returned unchanged.
pub async fn publish(
    publisher: &dyn Publisher,
    text: &str,
    media: Option<&MediaPayload>,
) -> Result<String> {
    let platform = publisher.name();

    let media_ids = match media {
        Some(payload) => match publisher.upload_media(payload).await {
            Ok(media_id) => {
                info!(platform, %media_id, bytes = payload.len(), "Uploaded media");
                vec![media_id]
            }
            Err(e) => {
                error!(platform, error = %e, "Media upload failed");
                return Err(e);
            }
        },
        None => Vec::new(),
    };

    match publisher.create_post(text, &media_ids).await {
        Ok(post_id) => {
            info!(platform, %post_id, with_media = !media_ids.is_empty(), "Post published");
            Ok(post_id)
        }
        Err(e) => {
            error!(platform, error = %e, "Post submission failed");
            Err(e)
        }
    }
}
