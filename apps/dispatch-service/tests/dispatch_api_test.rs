//! # 配信 API のテスト
//!
//! モックのレジストリ・画像エンコーダ・送信器でルーターを組み立て、
//! HTTP レベルのステータスとレスポンスボディを検証する。

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
};
use eventpass_dispatch_service::{
    app::build_app,
    usecase::{AudienceResolver, CredentialEncoder, DispatchService, MessageComposer},
};
use eventpass_infra::mock::{
    MockCredentialImageEncoder,
    MockNotificationSender,
    MockRegistryClient,
};
use http::{HeaderValue, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app(
    registry: &MockRegistryClient,
    image_encoder: &MockCredentialImageEncoder,
    sender: &MockNotificationSender,
) -> Router {
    let service = DispatchService::new(
        AudienceResolver::new(Arc::new(registry.clone())),
        CredentialEncoder::new(Arc::new(image_encoder.clone())),
        MessageComposer::new("noreply@eventpass.example.com"),
        Arc::new(sender.clone()),
    );
    build_app(Arc::new(service))
}

fn event_request_body() -> Value {
    json!({
        "event_name": "Fest",
        "subject": "Fest 入場証",
        "body": "**当日**はこのメールを提示してください",
        "presence": "both",
        "gender": "both",
        "is_markup": true,
        "day": 2
    })
}

fn direct_request_body() -> Value {
    json!({
        "event_name": "Fest",
        "subject": "Fest 入場証",
        "body": "ようこそ",
        "is_markup": false
    })
}

fn post_json(uri: &str, authorization: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = authorization {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// 別タスクの送信が指定件数に達するまで待つ
async fn wait_for_sent(sender: &MockNotificationSender, expected: usize) {
    for _ in 0..100 {
        if sender.sent_emails().len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "送信件数が {expected} 件に達しなかった: {}",
        sender.sent_emails().len()
    );
}

#[tokio::test]
async fn test_ヘルスチェックが200を返す() {
    let sut = test_app(
        &MockRegistryClient::without_list(),
        &MockCredentialImageEncoder::new(),
        &MockNotificationSender::new(),
    );

    let response = sut
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_バッチ送信は件数を返し別タスクで全員に送信する() {
    // Arrange
    let registry =
        MockRegistryClient::with_participants(&["a@example.com", "b@example.com", "c@example.com"]);
    let sender = MockNotificationSender::new();
    let sut = test_app(&registry, &MockCredentialImageEncoder::new(), &sender);

    // Act
    let response = sut
        .oneshot(post_json(
            "/notifications/events",
            Some("Bearer opaque"),
            &event_request_body(),
        ))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({ "data": { "recipient_count": 3 } })
    );
    assert_eq!(registry.calls()[0].authorization, "Bearer opaque");

    wait_for_sent(&sender, 3).await;
    let sent = sender.sent_emails();
    assert!(
        sent.iter()
            .all(|m| m.html_body.contains("<strong>当日</strong>"))
    );
}

#[tokio::test]
async fn test_参加者が0件なら404を返し送信しない() {
    let sender = MockNotificationSender::new();
    let sut = test_app(
        &MockRegistryClient::with_participants(&[]),
        &MockCredentialImageEncoder::new(),
        &sender,
    );

    let response = sut
        .oneshot(post_json(
            "/notifications/events",
            Some("token"),
            &event_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_json(response).await["type"],
        "https://eventpass.example.com/errors/no-participants"
    );
    assert_eq!(sender.attempts(), 0);
}

#[tokio::test]
async fn test_レジストリの失敗も404を返す() {
    let sut = test_app(
        &MockRegistryClient::unavailable(503),
        &MockCredentialImageEncoder::new(),
        &MockNotificationSender::new(),
    );

    let response = sut
        .oneshot(post_json(
            "/notifications/events",
            Some("token"),
            &event_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authorizationヘッダーがなければ400を返しレジストリを呼ばない() {
    let registry = MockRegistryClient::with_participants(&["a@example.com"]);
    let sut = test_app(
        &registry,
        &MockCredentialImageEncoder::new(),
        &MockNotificationSender::new(),
    );

    let response = sut
        .oneshot(post_json(
            "/notifications/events",
            None,
            &event_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["errors"][0]["field"], "authorization");
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_未知の出欠区分は400を返す() {
    let registry = MockRegistryClient::with_participants(&["a@example.com"]);
    let sut = test_app(
        &registry,
        &MockCredentialImageEncoder::new(),
        &MockNotificationSender::new(),
    );
    let mut body = event_request_body();
    body["presence"] = json!("sometimes");

    let response = sut
        .oneshot(post_json("/notifications/events", Some("token"), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(
        body["type"],
        "https://eventpass.example.com/errors/validation-error"
    );
    assert_eq!(body["errors"][0]["field"], "presence");
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_jsonとして不正なボディは400を返す() {
    let sut = test_app(
        &MockRegistryClient::without_list(),
        &MockCredentialImageEncoder::new(),
        &MockNotificationSender::new(),
    );

    let response = sut
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/notifications/events")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "token")
                .body(Body::from("{\"event_name\":"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["errors"][0]["field"], "request");
}

#[rstest]
#[case("is_markup")]
#[case("day")]
#[tokio::test]
async fn test_バッチ送信の必須フィールドが欠けていれば400を返し送信しない(
    #[case] missing: &str,
) {
    let registry = MockRegistryClient::with_participants(&["a@example.com"]);
    let sender = MockNotificationSender::new();
    let sut = test_app(&registry, &MockCredentialImageEncoder::new(), &sender);
    let mut body = event_request_body();
    body.as_object_mut().unwrap().remove(missing);

    let response = sut
        .oneshot(post_json("/notifications/events", Some("token"), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["errors"][0]["field"], "request");
    assert!(registry.calls().is_empty());
    assert_eq!(sender.attempts(), 0);
}

#[tokio::test]
async fn test_ascii以外を含む認可トークンもそのままレジストリに渡す() {
    let registry = MockRegistryClient::with_participants(&["a@example.com"]);
    let sender = MockNotificationSender::new();
    let sut = test_app(&registry, &MockCredentialImageEncoder::new(), &sender);
    let authorization = HeaderValue::from_bytes(b"Bearer caf\xc3\xa9").unwrap();

    let response = sut
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/notifications/events")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, authorization.clone())
                .body(Body::from(event_request_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.calls()[0].authorization, authorization);
    wait_for_sent(&sender, 1).await;
}

#[tokio::test]
async fn test_単一送信は送信結果を返す() {
    let sender = MockNotificationSender::new();
    let sut = test_app(
        &MockRegistryClient::without_list(),
        &MockCredentialImageEncoder::new(),
        &sender,
    );

    let response = sut
        .oneshot(post_json(
            "/notifications/recipients/vip@example.com",
            None,
            &direct_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({ "data": { "status": "sent" } })
    );
    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "vip@example.com");
    assert_eq!(sent[0].html_body, "ようこそ");
}

#[tokio::test]
async fn test_単一送信の宛先が不正なら400を返し送信しない() {
    let sender = MockNotificationSender::new();
    let sut = test_app(
        &MockRegistryClient::without_list(),
        &MockCredentialImageEncoder::new(),
        &sender,
    );

    let response = sut
        .oneshot(post_json(
            "/notifications/recipients/not-an-address",
            None,
            &direct_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(response).await["errors"],
        json!([{ "field": "email", "message": "メールアドレスの形式が不正です" }])
    );
    assert_eq!(sender.attempts(), 0);
}

#[tokio::test]
async fn test_単一送信の送信失敗は502を返す() {
    let sender = MockNotificationSender::new();
    sender.fail_for("vip@example.com");
    let sut = test_app(
        &MockRegistryClient::without_list(),
        &MockCredentialImageEncoder::new(),
        &sender,
    );

    let response = sut
        .oneshot(post_json(
            "/notifications/recipients/vip@example.com",
            None,
            &direct_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert_eq!(
        body["type"],
        "https://eventpass.example.com/errors/delivery-failed"
    );
    assert!(
        body["detail"]
            .as_str()
            .is_some_and(|detail| detail.contains("vip@example.com"))
    );
}

#[tokio::test]
async fn test_単一送信の画像生成失敗は500を返す() {
    let image_encoder = MockCredentialImageEncoder::new();
    image_encoder.fail_for("vip@example.com", "Fest");
    let sender = MockNotificationSender::new();
    let sut = test_app(&MockRegistryClient::without_list(), &image_encoder, &sender);

    let response = sut
        .oneshot(post_json(
            "/notifications/recipients/vip@example.com",
            None,
            &direct_request_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response_json(response).await["type"],
        "https://eventpass.example.com/errors/credential-encoding-failed"
    );
    assert_eq!(sender.attempts(), 0);
}

#[tokio::test]
async fn test_単一送信のis_markupが欠けていれば400を返し送信しない() {
    let sender = MockNotificationSender::new();
    let sut = test_app(
        &MockRegistryClient::without_list(),
        &MockCredentialImageEncoder::new(),
        &sender,
    );
    let mut body = direct_request_body();
    body.as_object_mut().unwrap().remove("is_markup");

    let response = sut
        .oneshot(post_json(
            "/notifications/recipients/vip@example.com",
            None,
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["errors"][0]["field"], "request");
    assert_eq!(sender.attempts(), 0);
}
