//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは入力検証と HTTP 変換のみを行い、配信処理はユースケースに委譲する

pub mod dispatch;
pub mod health;

pub use dispatch::{DispatchState, send_direct_notification, send_event_notifications};
pub use health::health_check;
