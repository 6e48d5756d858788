//! # Dispatch Service 設定
//!
//! 環境変数から Dispatch Service サーバーの設定を読み込む。
//! 起動時に一度だけ構築し、以降は変更しない。

use std::{env, time::Duration};

use anyhow::{Context as _, bail};

/// レジストリ照会のデフォルトタイムアウト（ミリ秒）
const DEFAULT_REGISTRY_TIMEOUT_MS: u64 = 1000;

/// Dispatch Service サーバーの設定
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// 参加者レジストリ設定
    pub registry:     RegistryConfig,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 参加者レジストリの設定
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// レジストリのベース URL
    pub base_url: String,
    /// 1 リクエストあたりのタイムアウト
    pub timeout:  Duration,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationBackend {
    /// Mailpit（開発）/ SMTP サーバー経由で送信
    Smtp,
    /// Amazon SES v2 経由で送信（本番）
    Ses,
    /// 送信しない（ログ出力のみ）
    Noop,
}

impl NotificationBackend {
    /// 文字列から変換する（大文字小文字は区別しない）
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "ses" => Ok(Self::Ses),
            "noop" => Ok(Self::Noop),
            other => bail!("NOTIFICATION_BACKEND の値が不正です: {other}（smtp | ses | noop）"),
        }
    }
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える。
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend:      NotificationBackend,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:    String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:    u16,
    /// 送信元メールアドレス
    pub from_address: String,
}

impl DispatchConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host:         env::var("DISPATCH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port:         env::var("DISPATCH_PORT")
                .context("DISPATCH_PORT が設定されていません")?
                .parse()
                .context("DISPATCH_PORT は有効なポート番号である必要があります")?,
            registry:     RegistryConfig::from_env()?,
            notification: NotificationConfig::from_env()?,
        })
    }
}

impl RegistryConfig {
    fn from_env() -> anyhow::Result<Self> {
        let timeout_ms = match env::var("REGISTRY_TIMEOUT_MS") {
            Ok(value) => parse_timeout_ms(&value)?,
            Err(_) => DEFAULT_REGISTRY_TIMEOUT_MS,
        };
        Ok(Self {
            base_url: env::var("REGISTRY_URL").context("REGISTRY_URL が設定されていません")?,
            timeout:  Duration::from_millis(timeout_ms),
        })
    }
}

impl NotificationConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            backend:      NotificationBackend::parse(
                &env::var("NOTIFICATION_BACKEND").unwrap_or_else(|_| "noop".to_string()),
            )?,
            smtp_host:    env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port:    env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .context("SMTP_PORT は有効なポート番号である必要があります")?,
            from_address: env::var("NOTIFICATION_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@eventpass.example.com".to_string()),
        })
    }
}

/// タイムアウト値（ミリ秒）をパースする。0 は無期限待ちになるため拒否する
fn parse_timeout_ms(value: &str) -> anyhow::Result<u64> {
    let timeout_ms: u64 = value
        .trim()
        .parse()
        .context("REGISTRY_TIMEOUT_MS は正の整数である必要があります")?;
    if timeout_ms == 0 {
        bail!("REGISTRY_TIMEOUT_MS は 1 以上である必要があります");
    }
    Ok(timeout_ms)
}
