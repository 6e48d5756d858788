//! # 通知送信
//!
//! 認証情報付きメールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: SMTP（Mailpit 開発用）、SES（本番用）、Noop（テスト用）
//! - **MIME 組み立ての共通化**: SMTP と SES（raw 送信）は同じ MIME メッセージを使う
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択

mod mime;
mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
use eventpass_domain::notification::{NotificationError, OutboundMessage};
pub use noop::NoopNotificationSender;
pub use ses::SesNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 配信処理の出口。メール送信の具体的な方法を抽象化する。
/// SMTP / SES / Noop の 3 実装を環境変数で切り替える。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, message: &OutboundMessage) -> Result<(), NotificationError>;
}
