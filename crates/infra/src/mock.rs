//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! eventpass-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use eventpass_domain::{
    audience::RegistryQuery,
    credential::CredentialToken,
    notification::{NotificationError, OutboundMessage},
    recipient::Recipient,
};

use reqwest::header::HeaderValue;

use crate::{
    credential::CredentialImageEncoder,
    error::InfraError,
    notification::NotificationSender,
    registry::RegistryClient,
};

// ===== MockNotificationSender =====

/// テスト用のモック NotificationSender
///
/// 送信されたメッセージを記録する。`fail_for` で指定した宛先への送信は失敗する。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:       Arc<Mutex<Vec<OutboundMessage>>>,
    attempts:   Arc<Mutex<usize>>,
    failing_to: Arc<Mutex<HashSet<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, to: &str) {
        self.failing_to.lock().unwrap().insert(to.to_string());
    }

    /// 送信に成功したメッセージ
    pub fn sent_emails(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 成功・失敗を問わない送信試行回数
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        if self.failing_to.lock().unwrap().contains(&message.to) {
            return Err(NotificationError::SendFailed(format!(
                "mock: {} への送信を拒否",
                message.to
            )));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ===== MockRegistryClient =====

/// レジストリ呼び出しの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCall {
    pub query:         RegistryQuery,
    pub authorization: HeaderValue,
}

/// モックレジストリの応答
#[derive(Debug, Clone)]
enum RegistryResponse {
    Participants(Option<Vec<Recipient>>),
    Unavailable(u16),
}

/// テスト用のモック RegistryClient
///
/// あらかじめ設定した一覧（またはエラー）を返し、受け取った照会を記録する。
#[derive(Clone)]
pub struct MockRegistryClient {
    response: RegistryResponse,
    calls:    Arc<Mutex<Vec<RegistryCall>>>,
}

impl MockRegistryClient {
    /// 指定したメールアドレスの参加者を返すモックを作成する
    pub fn with_participants(emails: &[&str]) -> Self {
        Self::with_response(RegistryResponse::Participants(Some(
            emails.iter().map(|email| Recipient::new(*email)).collect(),
        )))
    }

    /// `participants: null` を返すモックを作成する
    pub fn without_list() -> Self {
        Self::with_response(RegistryResponse::Participants(None))
    }

    /// 指定したステータスで失敗するモックを作成する
    pub fn unavailable(status: u16) -> Self {
        Self::with_response(RegistryResponse::Unavailable(status))
    }

    fn with_response(response: RegistryResponse) -> Self {
        Self {
            response,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 受け取った照会
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn fetch_participants(
        &self,
        query: &RegistryQuery,
        authorization: &HeaderValue,
    ) -> Result<Option<Vec<Recipient>>, InfraError> {
        self.calls.lock().unwrap().push(RegistryCall {
            query:         query.clone(),
            authorization: authorization.clone(),
        });
        match &self.response {
            RegistryResponse::Participants(list) => Ok(list.clone()),
            RegistryResponse::Unavailable(status) => {
                Err(InfraError::unexpected_status(*status, "mock: unavailable"))
            }
        }
    }
}

// ===== MockCredentialImageEncoder =====

/// テスト用のモック CredentialImageEncoder
///
/// トークン文字列をそのまま base64 化したデータ URI を返す。
/// `fail_for` で指定したトークンはエンコードに失敗する。
#[derive(Clone, Default)]
pub struct MockCredentialImageEncoder {
    failing_tokens: Arc<Mutex<HashSet<CredentialToken>>>,
}

impl MockCredentialImageEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した配信先・イベントのトークンでエンコードを失敗させる
    pub fn fail_for(&self, email: &str, event_name: &str) {
        self.failing_tokens
            .lock()
            .unwrap()
            .insert(CredentialToken::derive(email, event_name));
    }
}

impl CredentialImageEncoder for MockCredentialImageEncoder {
    fn encode_data_uri(&self, token: &CredentialToken) -> Result<String, NotificationError> {
        if self.failing_tokens.lock().unwrap().contains(token) {
            return Err(NotificationError::EncodingFailed(format!(
                "mock: {token} のエンコードを拒否"
            )));
        }
        Ok(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(token.as_str())
        ))
    }
}
