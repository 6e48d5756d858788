//! # アプリケーション構築
//!
//! State の組み立てとルーター定義を担当する。
//! `main.rs` は設定読み込み・インフラ初期化・サーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    handler::{DispatchState, health_check, send_direct_notification, send_event_notifications},
    usecase::DispatchService,
};

/// ルーターを構築する
pub fn build_app(service: Arc<DispatchService>) -> Router {
    let dispatch_state = Arc::new(DispatchState { service });

    Router::new()
        .route("/health", get(health_check))
        .route("/notifications/events", post(send_event_notifications))
        .route(
            "/notifications/recipients/{email}",
            post(send_direct_notification),
        )
        .with_state(dispatch_state)
        .layer(TraceLayer::new_for_http())
}
