//! Photo download into memory

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::error::{MediaError, MissingcastError, Result};
use crate::types::{ImageMimeType, MediaPayload};

/// Fetches a photo by URL
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<MediaPayload>;
}

/// Downloads with a plain GET and buffers the whole body
///
/// No size limit, no streaming, no retry.
#[derive(Clone, Default)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<MediaPayload> {
        let request_error = |source| MediaError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let header_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(request_error)?;
        let mime_type = detect_mime(header_mime.as_deref(), url);

        info!(url, bytes = bytes.len(), mime = %mime_type, "Downloaded photo");
        Ok(MediaPayload::new(bytes.to_vec(), mime_type))
    }
}

/// Pick the upload MIME type: response header, then URL extension, then JPEG
pub fn detect_mime(content_type: Option<&str>, url: &str) -> ImageMimeType {
    content_type
        .and_then(ImageMimeType::from_mime_str)
        .or_else(|| ImageMimeType::from_url(url))
        .unwrap_or_else(|| {
            debug!(url, ?content_type, "Unrecognized image type, assuming JPEG");
            ImageMimeType::Jpeg
        })
}

/// Read a local image file into memory
///
/// The extension decides the MIME type; unsupported extensions are rejected.
pub async fn load_file(path: &Path) -> Result<MediaPayload> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let mime_type = ImageMimeType::from_extension(ext).ok_or_else(|| {
        MissingcastError::InvalidInput(format!(
            "Unsupported image type for {}: expected jpg, png, gif or webp",
            path.display()
        ))
    })?;

    let bytes = tokio::fs::read(path).await.map_err(MediaError::Io)?;
    Ok(MediaPayload::new(bytes, mime_type))
}
