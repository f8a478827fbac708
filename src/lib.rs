//! image-insight CLI
//!
//! Web版と同じ共通ライブラリ（image-insight-common）を使い、
//! ディスク上の画像を解析・フィードバック送信する。

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod intake;
pub mod timer;
