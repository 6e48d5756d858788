//! # ビジネスイベントログの構造化ヘルパー
//!
//! `jq` で配信結果を追跡できるよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用する。JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const DISPATCH: &str = "dispatch";
    }

    /// イベントアクション
    pub mod action {
        pub const BATCH_ACCEPTED: &str = "dispatch.batch_accepted";
        pub const BATCH_COMPLETED: &str = "dispatch.batch_completed";
        pub const AUDIENCE_EMPTY: &str = "dispatch.audience_empty";
        pub const SENT: &str = "dispatch.sent";
        pub const DELIVERY_FAILED: &str = "dispatch.delivery_failed";
        pub const ENCODING_FAILED: &str = "dispatch.encoding_failed";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部サービス呼び出し（参加者レジストリ、メール送信）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const REGISTRY: &str = "registry";
        pub const DELIVERY: &str = "delivery";
        pub const CREDENTIAL_ENCODING: &str = "credential_encoding";
    }
}
