use clap::{Parser, Subcommand, ValueEnum};
use image_insight_common::TransportMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-insight")]
#[command(about = "画像をビジョンAPIで解析し、結果表示とフィードバック送信を行う", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を解析して結果を表示
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 通信方式 (direct/server)。未指定なら設定ファイルの値
        #[arg(short, long)]
        mode: Option<Mode>,

        /// サーバモードのベースURL
        #[arg(short, long)]
        server: Option<String>,

        /// デモモードを強制（通信しない）
        #[arg(long)]
        demo: bool,

        /// 解析後にレビューを送信
        #[arg(short, long)]
        review: bool,
    },

    /// アプリ公開通知に登録
    Interest {
        /// メールアドレス
        #[arg(short, long)]
        email: Option<String>,

        /// 名前
        #[arg(short, long)]
        name: Option<String>,

        /// 利用予定のプラットフォーム (ios/android など)
        #[arg(short, long)]
        platform: Option<String>,

        /// コメント
        #[arg(short, long, default_value = "")]
        comments: String,

        /// サーバモードのベースURL
        #[arg(short, long)]
        server: Option<String>,

        /// デモモードを強制
        #[arg(long)]
        demo: bool,
    },

    /// 設定の表示・変更
    Config {
        /// OpenAI APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// スプレッドシートWebhook URLを設定
        #[arg(long)]
        set_webhook: Option<String>,

        /// 既定の通信方式を設定
        #[arg(long)]
        set_mode: Option<Mode>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Direct,
    Server,
}

impl From<Mode> for TransportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Direct => TransportMode::Direct,
            Mode::Server => TransportMode::Server,
        }
    }
}
