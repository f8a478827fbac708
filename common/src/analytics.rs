//! 解析イベントの振り分け
//!
//! 内部イベント名とプロパティを、2つの外部SDK（Facebook Pixel / Microsoft Clarity）
//! の呼び出しに変換する。SDK本体は [`AnalyticsSink`] の実装側が扱い、
//! ここでは呼び出し内容の決定のみ行う。

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::AppConfig;

/// 内部イベント名
pub mod events {
    pub const PAGE_VIEW: &str = "page_view";
    pub const FILE_UPLOAD: &str = "file_upload";
    pub const ANALYSIS_STARTED: &str = "analysis_started";
    pub const IMAGE_ANALYSIS: &str = "image_analysis";
    pub const DOWNLOAD_APP_CLICK: &str = "download_app_click";
    pub const APP_COMING_SOON_VISIT: &str = "app_coming_soon_visit";
    pub const EMAIL_SIGNUP: &str = "email_signup";
    pub const REVIEW_SUBMITTED: &str = "review_submitted";
}

pub type Properties = Map<String, Value>;

/// fbq(method, event, params) 呼び出し
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelCall {
    pub method: &'static str,
    pub event: String,
    pub params: Option<Value>,
}

/// clarity(method, key, value) 呼び出し
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClarityCall {
    pub method: &'static str,
    pub key: String,
    pub value: String,
}

/// イベント名の変換方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventMapping {
    /// 固定の対応表でSDK標準イベントへ変換
    #[default]
    Mapped,
    /// 内部イベント名をそのまま渡す
    Passthrough,
}

/// SDKへの出力先
///
/// 実装はSDKが存在しない場合に黙って何もしないこと（エラーにしない）。
pub trait AnalyticsSink {
    fn pixel(&self, call: &PixelCall);
    fn clarity(&self, call: &ClarityCall);

    /// 全イベント共通のデバッグログ
    fn log_event(&self, name: &str, properties: &Properties) {
        let properties = serde_json::Value::Object(properties.clone());
        tracing::debug!(event = name, %properties, "event tracked");
    }
}

/// 何もしない出力先（デフォルト）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn pixel(&self, _call: &PixelCall) {}
    fn clarity(&self, _call: &ClarityCall) {}
}

/// 呼び出しを記録する出力先（テスト用）
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pixel: Arc<Mutex<Vec<PixelCall>>>,
    clarity: Arc<Mutex<Vec<ClarityCall>>>,
}

impl RecordingSink {
    pub fn pixel_calls(&self) -> Vec<PixelCall> {
        self.pixel.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn clarity_calls(&self) -> Vec<ClarityCall> {
        self.clarity.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// 指定イベントのPixel呼び出し数
    pub fn count_pixel(&self, event: &str) -> usize {
        self.pixel_calls().iter().filter(|c| c.event == event).count()
    }
}

impl AnalyticsSink for RecordingSink {
    fn pixel(&self, call: &PixelCall) {
        if let Ok(mut calls) = self.pixel.lock() {
            calls.push(call.clone());
        }
    }

    fn clarity(&self, call: &ClarityCall) {
        if let Ok(mut calls) = self.clarity.lock() {
            calls.push(call.clone());
        }
    }
}

/// イベント送信の窓口
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracker<S = NoopSink> {
    sink: S,
    mapping: EventMapping,
}

impl<S: AnalyticsSink> Tracker<S> {
    pub fn new(sink: S, mapping: EventMapping) -> Self {
        Self { sink, mapping }
    }

    /// Pixel IDが設定されていれば初期化
    pub fn init(&self, config: &AppConfig) {
        if let Some(id) = config.pixel_id() {
            self.sink.pixel(&PixelCall {
                method: "init",
                event: id.to_string(),
                params: None,
            });
        }
    }

    /// イベント送信。properties はオブジェクト以外なら空として扱う
    pub fn track(&self, name: &str, properties: Value) {
        let properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for call in pixel_calls(self.mapping, name, &properties) {
            self.sink.pixel(&call);
        }
        for call in clarity_calls(self.mapping, name, &properties) {
            self.sink.clarity(&call);
        }
        self.sink.log_event(name, &properties);
    }
}

fn track(event: &str, params: Option<Value>) -> PixelCall {
    PixelCall {
        method: "track",
        event: event.to_string(),
        params,
    }
}

/// Pixel呼び出しへの変換
pub fn pixel_calls(mapping: EventMapping, name: &str, properties: &Properties) -> Vec<PixelCall> {
    if mapping == EventMapping::Passthrough {
        return vec![PixelCall {
            method: "trackCustom",
            event: name.to_string(),
            params: Some(Value::Object(properties.clone())),
        }];
    }

    let call = match name {
        events::PAGE_VIEW => track("PageView", None),
        events::FILE_UPLOAD => track(
            "InitiateCheckout",
            Some(json!({
                "content_category": "color_analysis",
                "content_name": "photo_upload",
            })),
        ),
        events::ANALYSIS_STARTED => track(
            "AddToCart",
            Some(json!({
                "content_name": "color_analysis_started",
                "content_category": "analysis",
            })),
        ),
        events::IMAGE_ANALYSIS if is_success(properties) => track(
            "Purchase",
            Some(json!({
                "currency": "USD",
                "value": 0.0,
                "content_name": "color_analysis_completed",
                "content_category": "analysis",
            })),
        ),
        events::IMAGE_ANALYSIS => track(
            "AddToCart",
            Some(json!({ "content_name": "analysis_failed" })),
        ),
        events::DOWNLOAD_APP_CLICK => track(
            "Lead",
            Some(json!({
                "content_name": "download_app_interest",
                "content_category": "app_download",
            })),
        ),
        events::APP_COMING_SOON_VISIT => track(
            "ViewContent",
            Some(json!({
                "content_name": "app_coming_soon_page",
                "content_category": "app_interest",
            })),
        ),
        events::EMAIL_SIGNUP => track(
            "CompleteRegistration",
            Some(json!({ "content_name": "app_notification_signup" })),
        ),
        other => {
            let mut params = Map::new();
            params.insert("event_name".into(), Value::String(other.to_string()));
            params.extend(properties.clone());
            track("CustomEvent", Some(Value::Object(params)))
        }
    };

    vec![call]
}

/// Clarity呼び出しへの変換
pub fn clarity_calls(mapping: EventMapping, name: &str, properties: &Properties) -> Vec<ClarityCall> {
    let set = |key: &str, value: String| ClarityCall {
        method: "set",
        key: key.to_string(),
        value,
    };

    let mut calls = vec![set(name, Value::Object(properties.clone()).to_string())];
    if mapping == EventMapping::Passthrough {
        return calls;
    }

    let extra = match name {
        events::FILE_UPLOAD => Some(("user_engagement", "photo_uploaded")),
        events::ANALYSIS_STARTED => Some(("user_engagement", "analysis_button_clicked")),
        events::IMAGE_ANALYSIS if is_success(properties) => Some(("conversion", "analysis_success")),
        events::IMAGE_ANALYSIS => Some(("conversion", "analysis_failed")),
        events::DOWNLOAD_APP_CLICK => Some(("conversion", "app_interest_shown")),
        _ => None,
    };
    if let Some((key, value)) = extra {
        calls.push(set(key, value.to_string()));
    }

    calls
}

fn is_success(properties: &Properties) -> bool {
    properties
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_file_upload_maps_to_initiate_checkout() {
        let calls = pixel_calls(EventMapping::Mapped, events::FILE_UPLOAD, &Properties::new());
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "track");
        assert_eq!(calls[0].event, "InitiateCheckout");
        assert_eq!(calls[0].params.as_ref().unwrap()["content_name"], "photo_upload");
    }

    #[test]
    fn test_image_analysis_success_and_failure() {
        let ok = pixel_calls(EventMapping::Mapped, events::IMAGE_ANALYSIS, &props(json!({"success": true})));
        assert_eq!(ok[0].event, "Purchase");
        assert_eq!(ok[0].params.as_ref().unwrap()["currency"], "USD");

        let ng = pixel_calls(
            EventMapping::Mapped,
            events::IMAGE_ANALYSIS,
            &props(json!({"success": false, "error": "Server error: 500"})),
        );
        assert_eq!(ng[0].event, "AddToCart");
        assert_eq!(ng[0].params, Some(json!({"content_name": "analysis_failed"})));
    }

    #[test]
    fn test_unknown_event_falls_back_to_custom_event() {
        let calls = pixel_calls(EventMapping::Mapped, "share_clicked", &props(json!({"target": "x"})));
        assert_eq!(calls[0].event, "CustomEvent");
        let params = calls[0].params.as_ref().unwrap();
        assert_eq!(params["event_name"], "share_clicked");
        assert_eq!(params["target"], "x");
    }

    #[test]
    fn test_page_view_has_no_params() {
        let calls = pixel_calls(EventMapping::Mapped, events::PAGE_VIEW, &Properties::new());
        assert_eq!(calls[0].event, "PageView");
        assert!(calls[0].params.is_none());
    }

    #[test]
    fn test_passthrough_keeps_name() {
        let p = props(json!({"success": true}));
        let calls = pixel_calls(EventMapping::Passthrough, events::IMAGE_ANALYSIS, &p);
        assert_eq!(calls[0].method, "trackCustom");
        assert_eq!(calls[0].event, "image_analysis");

        let clarity = clarity_calls(EventMapping::Passthrough, events::IMAGE_ANALYSIS, &p);
        assert_eq!(clarity.len(), 1);
    }

    #[test]
    fn test_clarity_extra_tags() {
        let calls = clarity_calls(EventMapping::Mapped, events::IMAGE_ANALYSIS, &props(json!({"success": false})));
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].key, "image_analysis");
        assert_eq!(calls[0].value, r#"{"success":false}"#);
        assert_eq!(calls[1].key, "conversion");
        assert_eq!(calls[1].value, "analysis_failed");

        let calls = clarity_calls(EventMapping::Mapped, events::EMAIL_SIGNUP, &Properties::new());
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_tracker_dispatches_to_sink() {
        let sink = RecordingSink::default();
        let tracker = Tracker::new(sink.clone(), EventMapping::Mapped);
        tracker.track(events::FILE_UPLOAD, json!({"file_type": "image/png", "file_size": 10}));

        assert_eq!(sink.count_pixel("InitiateCheckout"), 1);
        assert_eq!(sink.clarity_calls().len(), 2);
    }

    #[test]
    fn test_tracker_init_only_with_pixel_id() {
        let sink = RecordingSink::default();
        let tracker = Tracker::new(sink.clone(), EventMapping::Mapped);

        tracker.init(&AppConfig::default());
        assert!(sink.pixel_calls().is_empty());

        let config = AppConfig {
            fb_pixel_id: Some("555".into()),
            ..Default::default()
        };
        tracker.init(&config);
        assert_eq!(sink.pixel_calls()[0].method, "init");
        assert_eq!(sink.pixel_calls()[0].event, "555");
    }

    #[test]
    fn test_noop_tracker_is_silent() {
        let tracker: Tracker = Tracker::default();
        tracker.track(events::PAGE_VIEW, Value::Null);
    }
}
