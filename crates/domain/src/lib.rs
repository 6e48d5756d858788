//! # EventPass ドメイン層
//!
//! イベント参加者への認証情報（QR コード）付きメール配信を表現するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋性**: このクレートは I/O を一切行わない。レジストリ照会やメール送信は
//!   インフラ層の責務とし、ここでは入出力の型と純粋な導出ロジックのみを扱う
//! - **リクエストスコープ**: すべての値はリクエスト単位で生成・破棄され、永続化しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! dispatch-service → infra → domain
//!          ↘                   ↑
//!            shared ───────────┘（依存なし）
//! ```
//!
//! ## モジュール構成
//!
//! - [`audience`] - 配信対象フィルタとレジストリ照会ペイロード
//! - [`credential`] - 認証情報トークンの導出と画像データ
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`event`] - イベントコンテキスト
//! - [`notification`] - 送信メッセージと配信結果
//! - [`recipient`] - 配信先

pub mod audience;
pub mod credential;
pub mod error;
pub mod event;
pub mod notification;
pub mod recipient;

pub use error::DomainError;
