//! # EventPass インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **参加者レジストリ**: 配信対象の参加者一覧を HTTP で照会する
//! - **メール送信**: SMTP / SES / Noop の 3 実装を trait で切り替える
//! - **認証情報画像**: トークンを QR コード PNG のデータ URI に描画する
//!
//! ## 依存関係
//!
//! ```text
//! dispatch-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`credential`] - QR コード画像エンコーダ
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信
//! - [`registry`] - 参加者レジストリクライアント

pub mod credential;
pub mod error;
pub mod notification;
pub mod registry;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::InfraError;
