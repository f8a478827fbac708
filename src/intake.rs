//! ディスク上の画像ファイル読み込み

use crate::error::{InsightError, Result};
use image_insight_common::intake::{mime_from_extension, validate};
use image_insight_common::ImageFile;
use std::path::Path;

/// ファイルを読み込む。種別・サイズはメタデータで先に検証する
pub fn load_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(InsightError::FileNotFound(path.display().to_string()));
    }

    let mime = path
        .extension()
        .map(|ext| mime_from_extension(&ext.to_string_lossy()))
        .unwrap_or("application/octet-stream");
    let size = std::fs::metadata(path)?.len();
    validate(mime, size)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = std::fs::read(path)?;

    Ok(ImageFile::new(name, mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_insight_common::IntakeError;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_load_image_not_found() {
        let result = load_image(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(InsightError::FileNotFound(_))));
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sunset.PNG");
        File::create(&path).unwrap().write_all(b"\x89PNG").unwrap();

        let file = load_image(&path).unwrap();
        assert_eq!(file.name, "sunset.PNG");
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.bytes, b"\x89PNG");
    }

    #[test]
    fn test_text_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        File::create(&path).unwrap().write_all(b"text").unwrap();

        let result = load_image(&path);
        assert!(matches!(
            result,
            Err(InsightError::Intake(IntakeError::NotAnImage { .. }))
        ));
    }
}
