//! # 参加者レジストリクライアント
//!
//! 外部の参加者レジストリから配信対象の一覧を取得する。
//!
//! ## エンドポイント
//!
//! - `POST /participants/project-absent` - 日付で絞り込んだ参加者一覧
//! - `POST /participants/project-all` - 全参加者一覧
//!
//! ## 設計方針
//!
//! - **認可トークンは素通し**: 呼び出し元から受け取った [`HeaderValue`] を `Authorization`
//!   ヘッダーにバイト列のまま載せる。文字列への変換も検証もしない
//! - **固定の短いタイムアウト**: クライアント生成時に設定し、無期限に待たない
//! - **一覧の有無をそのまま返す**: `participants` が `null` / 欠落の場合は `None` を返し、
//!   空判定は呼び出し側（[`AudienceResolution`](eventpass_domain::audience::AudienceResolution)）に任せる

use std::time::Duration;

use async_trait::async_trait;
use eventpass_domain::{audience::RegistryQuery, recipient::Recipient};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Deserialize;

use crate::error::InfraError;

/// レジストリのレスポンス
#[derive(Debug, Deserialize)]
struct ParticipantsResponse {
    #[serde(default)]
    participants: Option<Vec<Recipient>>,
}

/// 参加者レジストリクライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// 照会条件に一致する参加者一覧を取得する
    ///
    /// レジストリが一覧を返さなかった場合は `Ok(None)` を返す。
    async fn fetch_participants(
        &self,
        query: &RegistryQuery,
        authorization: &HeaderValue,
    ) -> Result<Option<Vec<Recipient>>, InfraError>;
}

/// HTTP 参加者レジストリクライアント
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    base_url: String,
    client:   reqwest::Client,
}

impl HttpRegistryClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: レジストリのベース URL（例: `http://localhost:14000`）
    /// - `timeout`: 1 リクエストあたりのタイムアウト
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn fetch_participants(
        &self,
        query: &RegistryQuery,
        authorization: &HeaderValue,
    ) -> Result<Option<Vec<Recipient>>, InfraError> {
        let url = format!("{}/participants/{}", self.base_url, query.kind.endpoint());

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization.clone())
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfraError::unexpected_status(status.as_u16(), body));
        }

        let body = response.json::<ParticipantsResponse>().await?;
        Ok(body.participants)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use eventpass_domain::audience::UpstreamQueryKind;
    use pretty_assertions::assert_eq;

    use super::*;

    /// レジストリが受け取ったリクエスト
    #[derive(Debug, Clone)]
    struct ReceivedRequest {
        endpoint:      String,
        authorization: Option<HeaderValue>,
        body:          serde_json::Value,
    }

    #[derive(Clone)]
    struct StubState {
        received: Arc<Mutex<Vec<ReceivedRequest>>>,
        response: serde_json::Value,
        status:   StatusCode,
        delay:    Duration,
    }

    async fn handle(
        State(state): State<StubState>,
        Path(endpoint): Path<String>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        tokio::time::sleep(state.delay).await;
        state.received.lock().unwrap().push(ReceivedRequest {
            endpoint,
            authorization: headers.get(AUTHORIZATION).cloned(),
            body,
        });
        (state.status, Json(state.response.clone()))
    }

    /// スタブレジストリを起動し、ベース URL を返す
    async fn spawn_registry(state: StubState) -> String {
        let app = Router::new()
            .route("/participants/{endpoint}", post(handle))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn stub_state(response: serde_json::Value) -> StubState {
        StubState {
            received: Arc::new(Mutex::new(Vec::new())),
            response,
            status: StatusCode::OK,
            delay: Duration::ZERO,
        }
    }

    fn make_query(kind: UpstreamQueryKind, day: Option<i32>) -> RegistryQuery {
        RegistryQuery {
            kind,
            event: "Fest".to_string(),
            day,
            gender: "F",
            query: None,
        }
    }

    fn token() -> HeaderValue {
        HeaderValue::from_static("token")
    }

    #[tokio::test]
    async fn 照会種別に応じたエンドポイントにトークンとペイロードを送る() {
        let state = stub_state(serde_json::json!({
            "participants": [{ "email": "a@example.com" }, { "email": "b@example.com" }]
        }));
        let base_url = spawn_registry(state.clone()).await;
        let client = HttpRegistryClient::new(&base_url, Duration::from_secs(1)).unwrap();

        let result = client
            .fetch_participants(
                &make_query(UpstreamQueryKind::Restricted, Some(2)),
                &HeaderValue::from_static("Bearer opaque-token"),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            Some(vec![
                Recipient::new("a@example.com"),
                Recipient::new("b@example.com"),
            ])
        );
        let received = state.received.lock().unwrap().clone();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].endpoint, "project-absent");
        assert_eq!(
            received[0].authorization,
            Some(HeaderValue::from_static("Bearer opaque-token"))
        );
        assert_eq!(
            received[0].body,
            serde_json::json!({ "event": "Fest", "day": 2, "gender": "F" })
        );
    }

    #[tokio::test]
    async fn ascii以外を含む認可トークンもバイト列のまま転送する() {
        let state = stub_state(serde_json::json!({ "participants": [] }));
        let base_url = spawn_registry(state.clone()).await;
        let client = HttpRegistryClient::new(&base_url, Duration::from_secs(1)).unwrap();
        let authorization = HeaderValue::from_bytes(b"Bearer caf\xc3\xa9").unwrap();

        client
            .fetch_participants(&make_query(UpstreamQueryKind::All, None), &authorization)
            .await
            .unwrap();

        let received = state.received.lock().unwrap().clone();
        assert_eq!(received[0].authorization, Some(authorization));
    }

    #[tokio::test]
    async fn 全件照会はproject_allに日付なしで送る() {
        let state = stub_state(serde_json::json!({ "participants": [] }));
        let base_url = spawn_registry(state.clone()).await;
        let client = HttpRegistryClient::new(&base_url, Duration::from_secs(1)).unwrap();

        let result = client
            .fetch_participants(&make_query(UpstreamQueryKind::All, None), &token())
            .await
            .unwrap();

        assert_eq!(result, Some(vec![]));
        let received = state.received.lock().unwrap().clone();
        assert_eq!(received[0].endpoint, "project-all");
        assert!(received[0].body.get("day").is_none());
    }

    #[tokio::test]
    async fn participantsがnullの場合はnoneを返す() {
        let state = stub_state(serde_json::json!({ "participants": null }));
        let base_url = spawn_registry(state).await;
        let client = HttpRegistryClient::new(&base_url, Duration::from_secs(1)).unwrap();

        let result = client
            .fetch_participants(&make_query(UpstreamQueryKind::All, None), &token())
            .await
            .unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn 成功以外のステータスはunexpected_statusになる() {
        let state = StubState {
            status: StatusCode::UNAUTHORIZED,
            ..stub_state(serde_json::json!({ "message": "invalid token" }))
        };
        let base_url = spawn_registry(state).await;
        let client = HttpRegistryClient::new(&base_url, Duration::from_secs(1)).unwrap();

        let err = client
            .fetch_participants(&make_query(UpstreamQueryKind::All, None), &token())
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind(),
            crate::error::InfraErrorKind::UnexpectedStatus { status: 401, .. }
        ));
    }

    #[tokio::test]
    async fn 応答が遅い場合はタイムアウトする() {
        let state = StubState {
            delay: Duration::from_millis(500),
            ..stub_state(serde_json::json!({ "participants": [] }))
        };
        let base_url = spawn_registry(state).await;
        let client = HttpRegistryClient::new(&base_url, Duration::from_millis(50)).unwrap();

        let err = client
            .fetch_participants(&make_query(UpstreamQueryKind::All, None), &token())
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "タイムアウトとして分類されること: {err}");
    }
}
