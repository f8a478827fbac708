use clap::Parser;
use image_insight::{app, cli, config, error};
use app::{Overrides, Runtime};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use image_insight_common::feedback::non_empty;
use image_insight_common::{
    events, EventMapping, InterestSubmission, NoopSink, NoticeBoard, Session, Tracker,
};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let client = reqwest::Client::new();
    let tracker = Tracker::new(NoopSink, EventMapping::Mapped);
    let mut notices = NoticeBoard::default();

    match cli.command {
        Commands::Analyze { file, mode, server, demo, review } => {
            println!("🎨 image-insight - 画像解析\n");

            let overrides = Overrides { mode: mode.map(Into::into), server, demo };
            let load = app::resolve_config(&client, config.app, &overrides).await;
            let runtime = Runtime::new(&client, &load, tracker);
            runtime.tracker.track(events::PAGE_VIEW, serde_json::json!({ "page": "cli" }));
            if runtime.plan.is_demo() {
                println!("(デモモード: 実際の通信は行いません)\n");
            }

            let mut session = Session::new();
            let result = app::run_analyze(&runtime, &mut session, &file, &mut notices).await;
            app::flush_notices(&mut notices);

            if let (Ok(Some(analysis)), true) = (&result, review) {
                let submission = app::prompt_review(analysis)?;
                let sent = app::run_review(&runtime, &submission, &mut notices).await;
                app::flush_notices(&mut notices);
                sent?;
            }
            result?;
        }

        Commands::Interest { email, name, platform, comments, server, demo } => {
            let email = match email {
                Some(email) => email,
                None => dialoguer::Input::new().with_prompt("Email").interact_text()?,
            };

            let overrides = Overrides {
                mode: server.as_ref().map(|_| image_insight_common::TransportMode::Server),
                server,
                demo,
            };
            let load = app::resolve_config(&client, config.app, &overrides).await;
            let runtime = Runtime::new(&client, &load, tracker);
            runtime.tracker.track(events::APP_COMING_SOON_VISIT, serde_json::json!({ "page": "cli" }));

            let interest = InterestSubmission {
                email,
                name: name.as_deref().and_then(non_empty),
                platform: platform.as_deref().and_then(non_empty),
                comments,
                timestamp: app::timestamp(),
            };
            let result = app::run_interest(&runtime, &interest, &mut notices).await;
            app::flush_notices(&mut notices);
            result?;
        }

        Commands::Config { set_api_key, set_webhook, set_mode, show } => {
            // 環境変数を混ぜずにファイルの内容だけを編集する
            let path = Config::config_path()?;
            let mut stored = Config::load_from(&path)?;
            let mut changed = false;

            if let Some(key) = set_api_key {
                stored.set_api_key(key);
                changed = true;
            }
            if let Some(url) = set_webhook {
                stored.set_webhook(url);
                changed = true;
            }
            if let Some(mode) = set_mode {
                stored.app.mode = mode.into();
                changed = true;
            }
            if changed {
                stored.save_to(&path)?;
                println!("✔ 設定を保存しました: {}", path.display());
            }

            if show || !changed {
                let app = Config::load()?.app;
                println!("設定:");
                println!("  通信方式: {:?}", app.mode);
                println!("  モデル: {}", app.model);
                println!("  最大トークン: {}", app.max_tokens);
                println!("  APIキー: {}", if app.api_key_unset() { "未設定" } else { "設定済み" });
                println!("  Webhook: {}", if app.webhook_unset() { "未設定" } else { "設定済み" });
                println!("  サーバURL: {}", if app.server_base_url.is_empty() { "(未設定)" } else { app.server_base_url.as_str() });
            }
        }
    }

    Ok(())
}
