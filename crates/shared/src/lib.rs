//! # EventPass 共有ユーティリティ
//!
//! このクレートは、EventPass のサービス全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum などの Web フレームワークには依存しない（`IntoResponse` 変換は各サービスの責務）
//! - 外部クレートへの依存は最小限に抑える

pub mod api_response;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use error_response::{ErrorResponse, FieldError};
pub use health::HealthResponse;
