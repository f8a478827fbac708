//! tokio タイマー

use std::time::Duration;

use async_trait::async_trait;
use image_insight_common::Sleep;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait(?Send)]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
