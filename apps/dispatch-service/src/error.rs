//! # Dispatch Service エラー定義
//!
//! 配信処理で呼び出し元に返すエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | バリアント | ステータス | type |
//! |---|---|---|
//! | `Validation` | 400 | `validation-error` |
//! | `EmptyAudience` | 404 | `no-participants` |
//! | `DeliveryFailed` | 502 | `delivery-failed` |
//! | `CredentialEncodingFailed` | 500 | `credential-encoding-failed` |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventpass_domain::DomainError;
use eventpass_shared::{ErrorResponse, FieldError};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Dispatch Service で発生するエラー
#[derive(Debug, Error)]
pub enum DispatchError {
    /// リクエストの内容が不正
    #[error("バリデーションエラー: {0:?}")]
    Validation(Vec<FieldError>),

    /// 配信対象の参加者がいない
    #[error("配信対象の参加者がいません")]
    EmptyAudience,

    /// メール送信に失敗（単一送信のみ）
    #[error("メール送信に失敗しました: {0}")]
    DeliveryFailed(String),

    /// 認証情報画像の生成に失敗（単一送信のみ）
    #[error("認証情報画像の生成に失敗しました: {0}")]
    CredentialEncodingFailed(String),
}

impl DispatchError {
    /// 単一フィールドのバリデーションエラーを生成する
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError {
            field:   field.into(),
            message: message.into(),
        }])
    }
}

impl From<DomainError> for DispatchError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => Self::invalid_field("request", message),
        }
    }
}

impl From<JsonRejection> for DispatchError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_field("request", rejection.body_text())
    }
}

/// validator のエラーをフィールド名順のフラットな一覧に変換する
///
/// ネストした構造体のフィールドは `query.key` のようにドットで連結する。
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected = Vec::new();
    collect_field_errors("", errors, &mut collected);
    collected.sort_by(|a, b| a.field.cmp(&b.field));
    collected
}

fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| FieldError {
                    field:   path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), |m| m.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let body = match self {
            DispatchError::Validation(errors) => ErrorResponse::validation_error(errors),
            DispatchError::EmptyAudience => ErrorResponse::no_participants(),
            DispatchError::DeliveryFailed(detail) => {
                tracing::error!(error.detail = %detail, "メール送信に失敗");
                ErrorResponse::new("delivery-failed", "Delivery Failed", 502, detail)
            }
            DispatchError::CredentialEncodingFailed(detail) => {
                tracing::error!(error.detail = %detail, "認証情報画像の生成に失敗");
                ErrorResponse::new(
                    "credential-encoding-failed",
                    "Credential Encoding Failed",
                    500,
                    detail,
                )
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
