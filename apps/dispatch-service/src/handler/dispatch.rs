//! # 配信ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /notifications/events` - 条件に一致する参加者全員へのバッチ送信
//! - `POST /notifications/recipients/{email}` - 指定アドレスへの単一送信
//!
//! バッチ送信は配信対象の件数を返した時点で完了とし、送信結果は返さない。
//! `Authorization` ヘッダーは解釈せず、参加者レジストリへそのまま転送する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
};
use eventpass_domain::{
    DomainError,
    audience::{AudienceFilter, GenderSelector, NarrowingQuery, PresenceSelector},
    event::EventContext,
    recipient::Recipient,
};
use eventpass_shared::{ApiResponse, FieldError};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::{DispatchError, field_errors},
    usecase::{DispatchService, MessageContent},
};

/// 配信ハンドラの State
pub struct DispatchState {
    pub service: Arc<DispatchService>,
}

// --- リクエスト/レスポンス型 ---

/// バッチ送信リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct SendEventRequest {
    #[validate(custom(function = "validate_not_blank", message = "イベント名は必須です"))]
    pub event_name: String,
    #[validate(length(min = 1, message = "件名は必須です"))]
    pub subject:    String,
    #[validate(length(min = 1, message = "本文は必須です"))]
    pub body:       String,
    #[validate(custom(function = "validate_presence"))]
    pub presence:   String,
    #[validate(custom(function = "validate_gender"))]
    pub gender:     String,
    pub is_markup:  bool,
    pub day:        i32,
    #[validate(nested)]
    pub query:      Option<NarrowingQueryRequest>,
}

/// 絞り込み条件
#[derive(Debug, Deserialize, Validate)]
pub struct NarrowingQueryRequest {
    #[validate(length(min = 1, message = "キーは必須です"))]
    pub key:      String,
    pub value:    String,
    #[serde(default)]
    pub specific: bool,
}

/// 単一送信リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct SendDirectRequest {
    #[validate(custom(function = "validate_not_blank", message = "イベント名は必須です"))]
    pub event_name: String,
    #[validate(length(min = 1, message = "件名は必須です"))]
    pub subject:    String,
    #[validate(length(min = 1, message = "本文は必須です"))]
    pub body:       String,
    pub is_markup:  bool,
}

/// 単一送信の宛先（パスパラメータ）
#[derive(Debug, Validate)]
struct DirectTarget {
    #[validate(email(message = "メールアドレスの形式が不正です"))]
    email: String,
}

/// バッチ送信の受付結果
#[derive(Debug, Serialize)]
pub struct BatchAcceptedData {
    pub recipient_count: usize,
}

/// 単一送信の結果
#[derive(Debug, Serialize)]
pub struct DirectSentData {
    pub status: &'static str,
}

impl SendEventRequest {
    fn event_context(&self) -> Result<EventContext, DomainError> {
        let audience = AudienceFilter {
            presence: PresenceSelector::parse(&self.presence)?,
            gender:   GenderSelector::parse(&self.gender)?,
            query:    self.query.as_ref().map(|q| NarrowingQuery {
                key:      q.key.clone(),
                value:    q.value.clone(),
                specific: q.specific,
            }),
        };
        EventContext::new(self.event_name.clone(), self.day, audience)
    }

    fn content(&self) -> MessageContent {
        MessageContent::new(self.subject.clone(), &self.body, self.is_markup)
    }
}

impl SendDirectRequest {
    fn content(&self) -> MessageContent {
        MessageContent::new(self.subject.clone(), &self.body, self.is_markup)
    }
}

// --- カスタムバリデーション ---

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_presence(value: &str) -> Result<(), ValidationError> {
    PresenceSelector::parse(value)
        .map(|_| ())
        .map_err(|e| domain_validation_error("presence", e))
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    GenderSelector::parse(value)
        .map(|_| ())
        .map_err(|e| domain_validation_error("gender", e))
}

fn domain_validation_error(code: &'static str, err: DomainError) -> ValidationError {
    let DomainError::Validation(message) = err;
    ValidationError::new(code).with_message(message.into())
}

fn validation_result_errors(result: Result<(), ValidationErrors>) -> Vec<FieldError> {
    result.err().map(|e| field_errors(&e)).unwrap_or_default()
}

/// 転送する認可トークン。空白のみの値は未指定として扱う
///
/// 値はバイト列のまま転送し、ASCII 以外を含んでいても書き換えない。
fn authorization_token(headers: &HeaderMap) -> Option<HeaderValue> {
    headers
        .get(AUTHORIZATION)
        .filter(|value| !value.as_bytes().trim_ascii().is_empty())
        .cloned()
}

// --- ハンドラ ---

/// POST /notifications/events
///
/// 配信対象を解決し、件数を返す。送信は別タスクで行う。
pub async fn send_event_notifications(
    State(state): State<Arc<DispatchState>>,
    headers: HeaderMap,
    payload: Result<Json<SendEventRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchAcceptedData>>, DispatchError> {
    let Json(req) = payload?;

    let mut errors = validation_result_errors(req.validate());
    let authorization = authorization_token(&headers);
    if authorization.is_none() {
        errors.insert(
            0,
            FieldError {
                field:   "authorization".to_string(),
                message: "Authorization ヘッダーは必須です".to_string(),
            },
        );
    }
    let Some(authorization) = authorization.filter(|_| errors.is_empty()) else {
        return Err(DispatchError::Validation(errors));
    };

    let context = req.event_context()?;
    let recipients = state.service.accept_batch(&context, &authorization).await?;
    let recipient_count = recipients.len();

    Arc::clone(&state.service).spawn_delivery(
        context.event_name().to_string(),
        req.content(),
        recipients,
    );

    Ok(Json(ApiResponse::new(BatchAcceptedData { recipient_count })))
}

/// POST /notifications/recipients/{email}
///
/// 指定アドレスへ送信し、送信結果を返す。
pub async fn send_direct_notification(
    State(state): State<Arc<DispatchState>>,
    Path(email): Path<String>,
    payload: Result<Json<SendDirectRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DirectSentData>>, DispatchError> {
    let Json(req) = payload?;
    let target = DirectTarget { email };

    let mut errors = validation_result_errors(target.validate());
    errors.extend(validation_result_errors(req.validate()));
    if !errors.is_empty() {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(DispatchError::Validation(errors));
    }

    state
        .service
        .dispatch_direct(&Recipient::new(target.email), &req.event_name, &req.content())
        .await?;

    Ok(Json(ApiResponse::new(DirectSentData { status: "sent" })))
}
