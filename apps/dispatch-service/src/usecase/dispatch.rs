//! # 配信ユースケース
//!
//! イベント参加者へ入場証（QR コード画像）付きのメールを配信する。
//!
//! ## 処理の流れ
//!
//! ```text
//! AudienceResolver ──→ 配信先ごとに:
//!   CredentialToken::derive → CredentialEncoder → MessageComposer → NotificationSender
//! ```
//!
//! - **バッチ送信**: 配信対象を解決して件数を即座に返し、送信は別タスクで順に行う
//! - **単一送信**: 指定アドレス 1 件に送信し、結果を呼び出し元に返す
//! - **配信先ごとの失敗の分離**: 1 件の失敗は他の配信先に影響しない。再送はしない

mod audience;
mod batch;
mod composer;
mod credential;
mod direct;
mod service;

pub use audience::AudienceResolver;
pub use composer::{MessageComposer, MessageContent, render_body};
pub use credential::CredentialEncoder;
pub use service::DispatchService;
