//! 画像ファイルの受付と検証

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::IntakeError;

/// 受け付ける最大ファイルサイズ（10 MiB）
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// MIMEタイプとサイズを検証（種別 → サイズの順）
pub fn validate(mime: &str, size: u64) -> Result<(), IntakeError> {
    if !mime.starts_with("image/") {
        return Err(IntakeError::NotAnImage { mime: mime.to_string() });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(IntakeError::TooLarge { size });
    }
    Ok(())
}

/// 読み込み済みのファイル（未検証）
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// 現在選択中の画像（バイト列は共有されるのでクローンは安価）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    /// 検証済みの画像へ変換
    pub fn try_from_file(file: ImageFile) -> Result<Self, IntakeError> {
        validate(&file.mime, file.bytes.len() as u64)?;
        Ok(Self {
            name: file.name,
            mime: file.mime,
            bytes: file.bytes.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// MiB単位（小数2桁に丸め）
    pub fn size_mb(&self) -> f64 {
        (self.size() as f64 / 1024.0 / 1024.0 * 100.0).round() / 100.0
    }

    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// プレビュー・インライン送信用の Data URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64())
    }
}

/// 拡張子からMIMEタイプを推定（不明な場合は application/octet-stream）
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
