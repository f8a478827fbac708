//! 解析セッション（ビューモデル + オーケストレータ）
//!
//! 選択中の画像・直近の解析結果・表示状態を1つの構造体で持つ。
//! ブラウザ版はシグナルに格納して `begin_analysis` / `finish_analysis` を
//! await の前後で呼び、CLI版は [`analyze`] で一括実行する。
//!
//! 状態遷移: Idle → Selecting → Ready → Analyzing → {Displayed | Failed}

use serde_json::json;

use crate::analytics::{events, AnalyticsSink, Tracker};
use crate::error::{AnalyzeError, IntakeError, TransportError};
use crate::intake::{ImageFile, SelectedImage};
use crate::transport::AnalysisTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Selecting,
    Ready,
    Analyzing,
    Displayed,
    Failed,
}

/// 画面要素の表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct View {
    /// 結果エリア全体
    pub results_section: bool,
    /// ローディング表示
    pub loading: bool,
    /// 解析結果テキスト
    pub result: bool,
    /// 後続セクション（レビューフォーム / アプリ案内）
    pub downstream: bool,
    /// 解析ボタンの有効状態
    pub trigger_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    phase: Phase,
    before_selecting: Phase,
    view: View,
    selection: Option<SelectedImage>,
    analysis: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selection(&self) -> Option<&SelectedImage> {
        self.selection.as_ref()
    }

    /// 直近の解析結果（レビュー送信時に添付）
    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    /// ファイル読み込み開始（検証済みメタデータのあと）
    pub fn mark_selecting(&mut self) {
        if matches!(self.phase, Phase::Analyzing | Phase::Selecting) {
            return;
        }
        self.before_selecting = self.phase;
        self.phase = Phase::Selecting;
    }

    /// 読み込み失敗時に元の状態へ戻す
    pub fn abort_selecting(&mut self) {
        if self.phase == Phase::Selecting {
            self.phase = self.before_selecting;
        }
    }

    /// ファイルを検証して選択中の画像を置き換える
    ///
    /// 検証エラー時は選択・ボタン状態とも変更しない。
    pub fn handle_file<S: AnalyticsSink>(
        &mut self,
        file: ImageFile,
        tracker: &Tracker<S>,
    ) -> Result<&SelectedImage, IntakeError> {
        let image = match SelectedImage::try_from_file(file) {
            Ok(image) => image,
            Err(e) => {
                self.abort_selecting();
                return Err(e);
            }
        };

        tracker.track(
            events::FILE_UPLOAD,
            json!({
                "file_type": image.mime(),
                "file_size": image.size(),
                "file_size_mb": image.size_mb(),
            }),
        );

        // 解析中の差し替えは選択のみ。ボタンは finish_analysis で戻す
        if self.phase != Phase::Analyzing {
            self.phase = Phase::Ready;
            self.view.trigger_enabled = true;
        }

        Ok(self.selection.insert(image))
    }

    /// 解析開始。選択なし・解析中の場合は通信せずにエラー
    pub fn begin_analysis<S: AnalyticsSink>(
        &mut self,
        tracker: &Tracker<S>,
    ) -> Result<SelectedImage, AnalyzeError> {
        if self.phase == Phase::Analyzing {
            return Err(AnalyzeError::InFlight);
        }
        let image = self.selection.clone().ok_or(AnalyzeError::NoSelection)?;

        tracker.track(
            events::ANALYSIS_STARTED,
            json!({
                "file_type": image.mime(),
                "file_size_mb": image.size_mb(),
            }),
        );

        self.phase = Phase::Analyzing;
        self.view.results_section = true;
        self.view.loading = true;
        self.view.result = false;
        self.view.trigger_enabled = false;

        Ok(image)
    }

    /// 解析完了（成功・失敗どちらも呼ぶ）
    pub fn finish_analysis<S: AnalyticsSink>(
        &mut self,
        outcome: Result<String, TransportError>,
        tracker: &Tracker<S>,
    ) -> Result<String, AnalyzeError> {
        let result = match outcome {
            Ok(text) => {
                self.analysis = Some(text.clone());
                self.view.result = true;
                self.view.downstream = true;
                self.phase = Phase::Displayed;
                tracker.track(events::IMAGE_ANALYSIS, json!({ "success": true }));
                Ok(text)
            }
            Err(e) => {
                tracing::error!(error = %e, "analysis error");
                self.view.result = false;
                self.phase = Phase::Failed;
                tracker.track(
                    events::IMAGE_ANALYSIS,
                    json!({ "success": false, "error": e.to_string() }),
                );
                Err(AnalyzeError::Transport(e))
            }
        };

        self.view.loading = false;
        self.view.trigger_enabled = self.selection.is_some();
        result
    }

    /// 表示用HTML（結果が表示状態のときのみ）
    pub fn result_html(&self) -> Option<String> {
        if !self.view.result {
            return None;
        }
        self.analysis.as_deref().map(render_analysis_html)
    }
}

/// 解析を1回実行（開始 → 通信1回 → 完了）。リトライ・タイムアウトなし
pub async fn analyze<T, S>(
    session: &mut Session,
    transport: &T,
    tracker: &Tracker<S>,
) -> Result<String, AnalyzeError>
where
    T: AnalysisTransport + ?Sized,
    S: AnalyticsSink,
{
    let image = session.begin_analysis(tracker)?;
    let outcome = transport.analyze(&image).await;
    session.finish_analysis(outcome, tracker)
}

/// 解析テキストをHTMLへ（エスケープ後、改行を <br> に置換）
pub fn render_analysis_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            '\n' => html.push_str("<br>"),
            c => html.push(c),
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{EventMapping, RecordingSink};
    use crate::intake::MAX_IMAGE_BYTES;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::Cell;

    struct Fixed {
        outcome: Result<String, TransportError>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn ok(text: &str) -> Self {
            Self { outcome: Ok(text.to_string()), calls: Cell::new(0) }
        }

        fn err(e: TransportError) -> Self {
            Self { outcome: Err(e), calls: Cell::new(0) }
        }
    }

    #[async_trait(?Send)]
    impl AnalysisTransport for Fixed {
        async fn analyze(&self, _image: &SelectedImage) -> Result<String, TransportError> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn tracker() -> (Tracker<RecordingSink>, RecordingSink) {
        let sink = RecordingSink::default();
        (Tracker::new(sink.clone(), EventMapping::Mapped), sink)
    }

    fn png(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", vec![0u8; 64])
    }

    #[test]
    fn test_non_image_leaves_state_unchanged() {
        let (tracker, sink) = tracker();
        let mut session = Session::new();
        session.handle_file(png("first.png"), &tracker).unwrap();
        let before = session.clone();

        let err = session
            .handle_file(ImageFile::new("notes.txt", "text/plain", vec![1]), &tracker)
            .unwrap_err();

        assert!(matches!(err, IntakeError::NotAnImage { .. }));
        assert_eq!(session, before);
        assert_eq!(session.selection().unwrap().name(), "first.png");
        assert_eq!(sink.count_pixel("InitiateCheckout"), 1);
    }

    #[test]
    fn test_oversized_rejected_without_enabling_trigger() {
        let (tracker, _) = tracker();
        let mut session = Session::new();
        let big = ImageFile::new("big.jpg", "image/jpeg", vec![0u8; MAX_IMAGE_BYTES as usize + 1]);

        let err = session.handle_file(big, &tracker).unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge { .. }));
        assert!(session.selection().is_none());
        assert!(!session.view().trigger_enabled);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_valid_image_enables_trigger() {
        let (tracker, sink) = tracker();
        let mut session = Session::new();
        session.mark_selecting();
        assert_eq!(session.phase(), Phase::Selecting);

        let image = session.handle_file(png("cat.png"), &tracker).unwrap();
        assert_eq!(image.name(), "cat.png");
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.view().trigger_enabled);

        let clarity = sink.clarity_calls();
        assert_eq!(clarity[0].key, "file_upload");
        assert!(clarity[0].value.contains("image/png"));
    }

    #[test]
    fn test_file_upload_carries_size_in_mb() {
        let (tracker, sink) = tracker();
        let mut session = Session::new();
        session.handle_file(png("photo.png"), &tracker).unwrap();

        let upload = sink
            .clarity_calls()
            .into_iter()
            .find(|c| c.key == events::FILE_UPLOAD)
            .unwrap();
        let props: serde_json::Value = serde_json::from_str(&upload.value).unwrap();
        assert_eq!(props["file_type"], "image/png");
        assert_eq!(props["file_size"], 64);
        assert!(props["file_size_mb"].is_number());
    }

    #[test]
    fn test_abort_selecting_restores_phase() {
        let mut session = Session::new();
        session.mark_selecting();
        session.abort_selecting();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_analyze_without_selection_makes_no_call() {
        let (tracker, sink) = tracker();
        let transport = Fixed::ok("unused");
        let mut session = Session::new();

        let err = block_on(analyze(&mut session, &transport, &tracker)).unwrap_err();
        assert_eq!(err, AnalyzeError::NoSelection);
        assert_eq!(transport.calls.get(), 0);
        assert!(sink.pixel_calls().is_empty());
        assert!(!session.view().results_section);
    }

    #[test]
    fn test_successful_analysis() {
        let (tracker, sink) = tracker();
        let transport = Fixed::ok("Blue\nCalm");
        let mut session = Session::new();
        session.handle_file(png("sky.png"), &tracker).unwrap();

        let text = block_on(analyze(&mut session, &transport, &tracker)).unwrap();
        assert_eq!(text, "Blue\nCalm");
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(session.phase(), Phase::Displayed);
        assert_eq!(session.analysis(), Some("Blue\nCalm"));
        assert_eq!(session.result_html().as_deref(), Some("Blue<br>Calm"));

        let view = session.view();
        assert!(view.results_section && view.result && view.downstream && view.trigger_enabled);
        assert!(!view.loading);

        assert_eq!(sink.count_pixel("Purchase"), 1);
        let analysis_events: Vec<_> = sink
            .clarity_calls()
            .into_iter()
            .filter(|c| c.key == "image_analysis")
            .collect();
        assert_eq!(analysis_events.len(), 1);
        assert_eq!(analysis_events[0].value, r#"{"success":true}"#);
    }

    #[test]
    fn test_failed_analysis() {
        let (tracker, sink) = tracker();
        let transport = Fixed::err(TransportError::Status(500));
        let mut session = Session::new();
        session.handle_file(png("sky.png"), &tracker).unwrap();

        let err = block_on(analyze(&mut session, &transport, &tracker)).unwrap_err();
        assert_eq!(err, AnalyzeError::Transport(TransportError::Status(500)));
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.result_html().is_none());
        assert!(!session.view().downstream);
        assert!(!session.view().loading);
        assert!(session.view().trigger_enabled);

        let failures: Vec<_> = sink
            .clarity_calls()
            .into_iter()
            .filter(|c| c.key == "image_analysis")
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].value.contains(r#""success":false"#));
        assert!(failures[0].value.contains("Server error: 500"));
        assert_eq!(sink.count_pixel("Purchase"), 0);
    }

    #[test]
    fn test_failure_hides_previous_result() {
        let (tracker, _) = tracker();
        let mut session = Session::new();
        session.handle_file(png("a.png"), &tracker).unwrap();
        block_on(analyze(&mut session, &Fixed::ok("first"), &tracker)).unwrap();

        let _ = block_on(analyze(&mut session, &Fixed::err(TransportError::Network("offline".into())), &tracker));
        assert!(session.result_html().is_none());
    }

    #[test]
    fn test_in_flight_guard() {
        let (tracker, _) = tracker();
        let mut session = Session::new();
        session.handle_file(png("a.png"), &tracker).unwrap();

        session.begin_analysis(&tracker).unwrap();
        assert_eq!(session.begin_analysis(&tracker).unwrap_err(), AnalyzeError::InFlight);
        assert!(!session.view().trigger_enabled);
    }

    #[test]
    fn test_selection_during_analysis_keeps_trigger_disabled() {
        let (tracker, _) = tracker();
        let mut session = Session::new();
        session.handle_file(png("a.png"), &tracker).unwrap();
        session.begin_analysis(&tracker).unwrap();

        session.handle_file(png("b.png"), &tracker).unwrap();
        assert_eq!(session.phase(), Phase::Analyzing);
        assert!(!session.view().trigger_enabled);

        session.finish_analysis(Ok("done".into()), &tracker).unwrap();
        assert!(session.view().trigger_enabled);
        assert_eq!(session.selection().unwrap().name(), "b.png");
    }

    #[test]
    fn test_render_analysis_html_escapes() {
        assert_eq!(render_analysis_html("a\nb\n\nc"), "a<br>b<br><br>c");
        assert_eq!(render_analysis_html("<b>&"), "&lt;b&gt;&amp;");
    }
}
