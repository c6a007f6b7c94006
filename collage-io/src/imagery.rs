use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::{IoError, Result};

pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|source| IoError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Regular files directly inside `dir`, sorted by name so that seeded runs
/// see the same order on every platform.
pub(crate) fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IoError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IoError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode every image in `dir`. Files that are not decodable images are
/// skipped with a warning.
pub fn load_backgrounds(dir: &Path) -> Result<Vec<RgbImage>> {
    let mut backgrounds = Vec::new();
    for path in sorted_files(dir)? {
        match load_rgb(&path) {
            Ok(image) if image.width() > 0 && image.height() > 0 => backgrounds.push(image),
            Ok(_) => log::warn!("Skipping empty background {}", path.display()),
            Err(e) => log::warn!("Skipping background: {}", e),
        }
    }
    if backgrounds.is_empty() {
        return Err(IoError::EmptyDirectory {
            kind: "background images",
            dir: dir.to_path_buf(),
        });
    }
    log::info!("Loaded {} background images", backgrounds.len());
    Ok(backgrounds)
}

/// Encode as baseline JPEG with the given quality (1-100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100)).encode_image(image)?;
    Ok(cursor.into_inner())
}

/// Standard base64, as embedded in labelme's `imageData`.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_jpeg_bytes_decode_back() {
        let image = RgbImage::from_pixel(16, 12, Rgb([200, 100, 50]));
        let bytes = encode_jpeg(&image, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 12));
    }

    #[test]
    fn test_base64_is_standard_alphabet() {
        assert_eq!(encode_base64(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn test_backgrounds_skip_non_images() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
            .save(dir.path().join("a.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let backgrounds = load_backgrounds(dir.path()).unwrap();
        assert_eq!(backgrounds.len(), 1);
        assert_eq!(backgrounds[0].dimensions(), (4, 4));
    }

    #[test]
    fn test_no_backgrounds_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_backgrounds(dir.path()),
            Err(IoError::EmptyDirectory { .. })
        ));
    }
}
