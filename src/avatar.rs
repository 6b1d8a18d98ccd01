// SPDX-License-Identifier: MPL-2.0

//! Avatar resolution with a per-refresh cache.
//!
//! An avatar reference is either a local file (a `file://` URI or an
//! existing path) or a remote URL fetched over HTTP. Decoding happens off
//! the async runtime, and a failed resolution simply means "no avatar for
//! this author" — it never fails the refresh.

use crate::net::Fetcher;
use image::imageops::FilterType;
use image::GenericImageView;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Maximum avatar dimension to decode; larger images are downscaled.
const MAX_AVATAR_SIZE: u32 = 48;

/// A decoded avatar ready for the presentation layer. Pixels are shared
/// behind an `Arc` so entries from the same author clone cheaply.
#[derive(Debug, Clone)]
pub struct Avatar {
    pub rgba: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    /// The author's profile description, carried with the image.
    pub description: Option<String>,
}

/// Per-refresh avatar cache keyed by author id. Created for one timeline
/// refresh and discarded with it; failed resolutions are cached too, so
/// the resolver runs at most once per author either way.
#[derive(Default)]
pub struct AvatarCache {
    entries: HashMap<String, Option<Avatar>>,
}

impl AvatarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached avatar for `author_id`, resolving it with
    /// `resolve` on first sight of the author.
    pub async fn lookup_or_resolve<F, Fut>(&mut self, author_id: &str, resolve: F) -> Option<Avatar>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Avatar>>,
    {
        if let Some(cached) = self.entries.get(author_id) {
            return cached.clone();
        }
        let avatar = resolve().await;
        self.entries
            .insert(author_id.to_string(), avatar.clone());
        avatar
    }
}

/// Resolve an avatar reference into a decoded bitmap.
///
/// Local references are decoded straight from disk; remote ones go
/// through the fetcher, honouring the captured content type before
/// falling back to format auto-detection.
pub async fn resolve(
    fetcher: &Fetcher,
    reference: &str,
    description: Option<String>,
) -> Option<Avatar> {
    if let Some(path) = local_path(reference) {
        return decode_file(path, description).await;
    }

    let response = match fetcher.get(reference, None).await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = reference, error = %e, "avatar fetch failed");
            return None;
        }
    };

    let content_type = response.content_type.clone();
    let url = reference.to_string();
    let decoded = tokio::task::spawn_blocking(move || {
        decode_bytes(&response.body, content_type.as_deref())
    })
    .await
    .ok()
    .flatten();

    match decoded {
        Some((rgba, width, height)) => Some(Avatar {
            rgba: Arc::new(rgba),
            width,
            height,
            description,
        }),
        None => {
            warn!(%url, "avatar decode failed");
            None
        }
    }
}

/// Map a `file://` URI or an existing filesystem path to a local path.
fn local_path(reference: &str) -> Option<std::path::PathBuf> {
    if reference.starts_with("file://") {
        return Url::parse(reference).ok()?.to_file_path().ok();
    }
    let path = Path::new(reference);
    path.exists().then(|| path.to_path_buf())
}

async fn decode_file(path: std::path::PathBuf, description: Option<String>) -> Option<Avatar> {
    let decoded = tokio::task::spawn_blocking(move || match image::open(&path) {
        Ok(img) => Some(downscale(img)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "avatar file decode failed");
            None
        }
    })
    .await
    .ok()
    .flatten();

    decoded.map(|(rgba, width, height)| Avatar {
        rgba: Arc::new(rgba),
        width,
        height,
        description,
    })
}

/// Decode image bytes, preferring the codec implied by the content type
/// and falling back to sniffing the format from the bytes themselves.
fn decode_bytes(bytes: &[u8], content_type: Option<&str>) -> Option<(Vec<u8>, u32, u32)> {
    let by_mime = content_type
        .and_then(image::ImageFormat::from_mime_type)
        .and_then(|format| image::load_from_memory_with_format(bytes, format).ok());

    let img = match by_mime {
        Some(img) => img,
        None => image::load_from_memory(bytes).ok()?,
    };
    Some(downscale(img))
}

/// Downscale to the avatar bounding box; small images pass through.
fn downscale(img: image::DynamicImage) -> (Vec<u8>, u32, u32) {
    let (width, height) = img.dimensions();
    let img = if width > MAX_AVATAR_SIZE || height > MAX_AVATAR_SIZE {
        img.resize(MAX_AVATAR_SIZE, MAX_AVATAR_SIZE, FilterType::Triangle)
    } else {
        img
    };

    let (width, height) = img.dimensions();
    (img.into_rgba8().into_raw(), width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn test_avatar() -> Avatar {
        Avatar {
            rgba: Arc::new(vec![0, 0, 0, 255]),
            width: 1,
            height: 1,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_cache_resolves_once_per_author() {
        let mut cache = AvatarCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let avatar = cache
                .lookup_or_resolve("101", || {
                    calls += 1;
                    async { Some(test_avatar()) }
                })
                .await;
            assert!(avatar.is_some());
        }

        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_cache_remembers_failures() {
        let mut cache = AvatarCache::new();
        let mut calls = 0;

        for _ in 0..2 {
            let avatar = cache
                .lookup_or_resolve("101", || {
                    calls += 1;
                    async { None }
                })
                .await;
            assert!(avatar.is_none());
        }

        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_cache_is_keyed_by_author() {
        let mut cache = AvatarCache::new();
        let mut calls = 0;

        for author in ["101", "202"] {
            cache
                .lookup_or_resolve(author, || {
                    calls += 1;
                    async { Some(test_avatar()) }
                })
                .await;
        }

        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_resolve_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let fetcher = Fetcher::new();
        let avatar = resolve(
            &fetcher,
            path.to_str().unwrap(),
            Some("local author".to_string()),
        )
        .await
        .expect("local avatar should decode");

        assert_eq!((avatar.width, avatar.height), (4, 4));
        assert_eq!(avatar.rgba.len(), 4 * 4 * 4);
        assert_eq!(avatar.description.as_deref(), Some("local author"));
    }

    #[tokio::test]
    async fn test_resolve_missing_local_file_fails_quietly() {
        let fetcher = Fetcher::new();
        // file:// forces the local path even though nothing exists there.
        let avatar = resolve(&fetcher, "file:///nonexistent/avatar.png", None).await;
        assert!(avatar.is_none());
    }

    #[test]
    fn test_decode_bytes_ignores_wrong_content_type() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        // A lying content type falls back to sniffing.
        let decoded = decode_bytes(&png, Some("image/jpeg"));
        assert!(decoded.is_some());
    }

    #[test]
    fn test_downscale_caps_dimensions() {
        let img = image::DynamicImage::new_rgba8(200, 100);
        let (_, width, height) = downscale(img);
        assert!(width <= MAX_AVATAR_SIZE && height <= MAX_AVATAR_SIZE);
    }
}
