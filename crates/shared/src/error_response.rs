//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! 全サービスで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）
//! - バリデーションエラーはフィールド単位のエラー一覧（`errors`）を拡張メンバーとして持つ

use serde::{Deserialize, Serialize};

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://eventpass.example.com/errors";

/// フィールド単位のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// フィールド名（ネストしたフィールドは `query.key` のようにドットで連結）
    pub field:   String,
    pub message: String,
}

/// エラーレスポンス（RFC 9457 Problem Details）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors:     Vec<FieldError>,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    ///
    /// `error_type_suffix` はベース URI に付加される（例: `"no-participants"`）。
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
            errors: Vec::new(),
        }
    }

    /// 400 Validation Error（フィールドエラー一覧付き）
    pub fn validation_error(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::new(
                "validation-error",
                "Validation Error",
                400,
                "リクエストの内容が不正です",
            )
        }
    }

    /// 404 No Participants
    pub fn no_participants() -> Self {
        Self::new(
            "no-participants",
            "No Participants",
            404,
            "配信対象の参加者が見つかりません",
        )
    }
}
