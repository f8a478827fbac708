//! Image Insight Common Library
//!
//! CLIとWeb(WASM)で共有される型・オーケストレータ・通信戦略

pub mod analytics;
pub mod config;
pub mod demo;
pub mod error;
pub mod feedback;
pub mod intake;
pub mod notice;
pub mod openai;
pub mod session;
pub mod strategy;
pub mod transport;

pub use analytics::{events, AnalyticsSink, EventMapping, NoopSink, RecordingSink, Tracker};
pub use config::{AppConfig, ConfigLoad, ServerConfig, TransportMode};
pub use demo::{DemoSubmitter, DemoTransport, Sleep};
pub use error::{AnalyzeError, Error, IntakeError, Result, SubmitError, TransportError};
pub use feedback::{InterestSubmission, ReviewSubmission, SheetKind};
pub use intake::{ImageFile, SelectedImage, MAX_IMAGE_BYTES};
pub use notice::{Notice, NoticeBoard, NoticeId, NoticeKind, NOTICE_TTL};
pub use session::{analyze, render_analysis_html, Phase, Session, View};
pub use strategy::{Choice, Plan};
pub use transport::{AnalysisTransport, Backend, Submitter};
