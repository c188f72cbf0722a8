//! Turns image files into research images with inline `data:` URLs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use story::Image;

pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads the whole file and encodes it. The image gets a fresh id.
pub async fn encode_image(path: &Path) -> std::io::Result<Image> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Image::new(name, data_url(mime_for(path), &bytes)))
}

/// Encodes files one after another, in the order given.
/// Files that cannot be read are logged and left out.
pub async fn encode_images<P: AsRef<Path>>(paths: &[P]) -> Vec<Image> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        match encode_image(path).await {
            Ok(image) => {
                tracing::debug!(path = %path.display(), image = %image.id, "encoded image");
                images.push(image);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable image");
            }
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a/B.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("map.png")), "image/png");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn data_url_is_base64() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn encodes_in_order_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.gif");
        tokio::fs::write(&first, b"one").await.unwrap();
        tokio::fs::write(&second, b"two").await.unwrap();
        let missing = dir.path().join("missing.png");

        let images = encode_images(&[first, missing, second]).await;

        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["first.png", "second.gif"]);
        assert_eq!(images[1].data_url, "data:image/gif;base64,dHdv");
        assert_ne!(images[0].id, images[1].id);
    }
}
