//! Image persistence: single-channel `GrayImage` → PNG on disk.
//!
//! PNG keeps the output lossless, which matters for binary masks: any lossy
//! codec would smear the 0/255 edges into intermediate gray levels. The image
//! is encoded in memory first so encoder errors and filesystem errors surface
//! separately. Existing files are overwritten; no temp-file rename is done.

use crate::error::FileError;
use image::{GrayImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode a grayscale icon as an 8-bit single-channel PNG.
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    debug!("Encoded {}x{} icon → {} bytes PNG", img.width(), img.height(), buf.len());
    Ok(buf)
}

/// Encode and write `img` to `path`, replacing any existing file.
pub fn save_png(img: &GrayImage, path: &Path) -> Result<(), FileError> {
    let bytes = encode_png(img).map_err(|e| FileError::SaveFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    std::fs::write(path, bytes).map_err(|e| FileError::SaveFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn encode_small_image() {
        let img = GrayImage::from_pixel(10, 10, Luma([200]));
        let bytes = encode_png(&img).expect("encode should succeed");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn saved_png_is_single_channel_and_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        let img = GrayImage::from_fn(8, 4, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]));

        save_png(&img, &path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.color(), image::ColorType::L8);
        assert_eq!(loaded.to_luma8(), img);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"stale").unwrap();

        save_png(&GrayImage::from_pixel(2, 2, Luma([0])), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_luma8();
        assert!(loaded.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/icon.png");
        let err = save_png(&GrayImage::new(2, 2), &path).unwrap_err();
        assert!(matches!(err, FileError::SaveFailed { .. }));
    }
}
