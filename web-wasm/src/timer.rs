use async_trait::async_trait;
use gloo::timers::future::TimeoutFuture;
use image_insight_common::Sleep;
use std::time::Duration;

/// setTimeout ベースの待機
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooSleep;

#[async_trait(?Send)]
impl Sleep for GlooSleep {
    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis() as u32).await;
    }
}
