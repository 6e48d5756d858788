//! # Dispatch Service サーバー
//!
//! イベント参加者へ入場証（QR コード）付きのメールを配信するサービス。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DISPATCH_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `DISPATCH_PORT` | **Yes** | ポート番号 |
//! | `REGISTRY_URL` | **Yes** | 参加者レジストリのベース URL |
//! | `REGISTRY_TIMEOUT_MS` | No | レジストリ照会のタイムアウト（デフォルト: `1000`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `ses` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP 送信先（デフォルト: `localhost` / `1025`） |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元アドレス |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! DISPATCH_PORT=3100 REGISTRY_URL=http://localhost:14000 cargo run -p eventpass-dispatch-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use eventpass_dispatch_service::{
    app::build_app,
    config::{DispatchConfig, NotificationBackend, NotificationConfig},
    usecase::{AudienceResolver, CredentialEncoder, DispatchService, MessageComposer},
};
use eventpass_infra::{
    credential::QrCodeImageEncoder,
    notification::{
        NoopNotificationSender,
        NotificationSender,
        SesNotificationSender,
        SmtpNotificationSender,
    },
    registry::HttpRegistryClient,
};
use eventpass_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("dispatch-service");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = %tracing_config.service_name).entered();

    let config = DispatchConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Dispatch Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let registry = HttpRegistryClient::new(&config.registry.base_url, config.registry.timeout)
        .context("レジストリクライアントの初期化に失敗しました")?;
    let sender = build_sender(&config.notification).await;

    let service = Arc::new(DispatchService::new(
        AudienceResolver::new(Arc::new(registry)),
        CredentialEncoder::new(Arc::new(QrCodeImageEncoder)),
        MessageComposer::new(config.notification.from_address.clone()),
        sender,
    ));
    let app = build_app(service);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Dispatch Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 設定に応じた送信バックエンドを構築する
async fn build_sender(config: &NotificationConfig) -> Arc<dyn NotificationSender> {
    match config.backend {
        NotificationBackend::Smtp => {
            tracing::info!(
                "SMTP 送信を使用します: {}:{}",
                config.smtp_host,
                config.smtp_port
            );
            Arc::new(SmtpNotificationSender::new(&config.smtp_host, config.smtp_port))
        }
        NotificationBackend::Ses => {
            tracing::info!("Amazon SES 送信を使用します");
            let aws_config = aws_config::load_from_env().await;
            Arc::new(SesNotificationSender::new(aws_sdk_sesv2::Client::new(
                &aws_config,
            )))
        }
        NotificationBackend::Noop => {
            tracing::info!("通知送信は無効です（Noop）");
            Arc::new(NoopNotificationSender)
        }
    }
}
