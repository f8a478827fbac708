//! ブラウザの解析SDK（fbq / clarity）への出力
//!
//! SDKはページ側のスクリプトで読み込まれる。呼び出し時点でグローバルに
//! 関数が無ければ何もしない。

use image_insight_common::analytics::{ClarityCall, PixelCall, Properties};
use image_insight_common::{AnalyticsSink, AppConfig, EventMapping, Tracker};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// グローバル関数を名前で取得
fn global_fn(name: &str) -> Option<js_sys::Function> {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()
}

fn to_js(value: &Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::UNDEFINED)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSink;

impl AnalyticsSink for BrowserSink {
    fn pixel(&self, call: &PixelCall) {
        let Some(fbq) = global_fn("fbq") else {
            return;
        };
        let method = JsValue::from_str(call.method);
        let event = JsValue::from_str(&call.event);
        let result = match &call.params {
            Some(params) => fbq.call3(&JsValue::NULL, &method, &event, &to_js(params)),
            None => fbq.call2(&JsValue::NULL, &method, &event),
        };
        if let Err(e) = result {
            gloo::console::warn!("fbq call failed:", e);
        }
    }

    fn clarity(&self, call: &ClarityCall) {
        let Some(clarity) = global_fn("clarity") else {
            return;
        };
        let result = clarity.call3(
            &JsValue::NULL,
            &JsValue::from_str(call.method),
            &JsValue::from_str(&call.key),
            &JsValue::from_str(&call.value),
        );
        if let Err(e) = result {
            gloo::console::warn!("clarity call failed:", e);
        }
    }

    fn log_event(&self, name: &str, properties: &Properties) {
        gloo::console::log!("Event tracked:", name, to_js(&Value::Object(properties.clone())));
    }
}

/// fbq のキュー付きスタブを定義して fbevents.js を読み込む
const PIXEL_LOADER: &str = "if(window.fbq)return;\
var n=window.fbq=function(){n.callMethod?n.callMethod.apply(n,arguments):n.queue.push(arguments)};\
if(!window._fbq)window._fbq=n;n.push=n;n.loaded=true;n.version='2.0';n.queue=[];\
var t=document.createElement('script');t.async=true;\
t.src='https://connect.facebook.net/en_US/fbevents.js';document.head.appendChild(t);";

/// clarity のキュー付きスタブを定義してタグを読み込む（引数 id）
const CLARITY_LOADER: &str = "if(window.clarity)return;\
window.clarity=function(){(window.clarity.q=window.clarity.q||[]).push(arguments)};\
var t=document.createElement('script');t.async=true;\
t.src='https://www.clarity.ms/tag/'+encodeURIComponent(id);document.head.appendChild(t);";

/// 設定済みのIDがあるSDKだけをページに読み込む。プレースホルダなら何もしない
pub fn install_sdks(config: &AppConfig) {
    if config.pixel_id().is_some() {
        let loader = js_sys::Function::new_no_args(PIXEL_LOADER);
        if let Err(e) = loader.call0(&JsValue::NULL) {
            gloo::console::warn!("Failed to load Facebook Pixel:", e);
        }
    }

    if let Some(id) = config.clarity_id() {
        let loader = js_sys::Function::new_with_args("id", CLARITY_LOADER);
        if let Err(e) = loader.call1(&JsValue::NULL, &JsValue::from_str(id)) {
            gloo::console::warn!("Failed to load Clarity:", e);
        }
    }
}

pub type BrowserTracker = Tracker<BrowserSink>;

pub fn tracker() -> BrowserTracker {
    Tracker::new(BrowserSink, EventMapping::Mapped)
}
