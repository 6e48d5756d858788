//! バッチ送信
//!
//! 配信対象の解決までを同期的に行い、件数を返す。
//! 送信は [`spawn_delivery`](DispatchService::spawn_delivery) で別タスクに切り離し、
//! 配信先ごとの結果はログにのみ残る。

use std::sync::Arc;

use axum::http::HeaderValue;
use eventpass_domain::{
    audience::AudienceResolution,
    event::EventContext,
    notification::BatchReport,
    recipient::Recipient,
};
use eventpass_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};
use tokio::task::JoinHandle;
use tracing::Instrument as _;

use super::{DispatchService, MessageContent};
use crate::error::DispatchError;

impl DispatchService {
    /// 配信対象を解決し、バッチ送信を受け付ける
    ///
    /// 参加者が 0 件の場合は [`DispatchError::EmptyAudience`] を返す。
    /// レジストリの失敗も 0 件として扱う（エラーログは残す）。
    pub async fn accept_batch(
        &self,
        context: &EventContext,
        authorization: &HeaderValue,
    ) -> Result<Vec<Recipient>, DispatchError> {
        match self.resolver.resolve(context, authorization).await {
            AudienceResolution::Resolved(recipients) => {
                log_business_event!(
                    event.category = event::category::DISPATCH,
                    event.action = event::action::BATCH_ACCEPTED,
                    event.result = event::result::SUCCESS,
                    dispatch.event_name = context.event_name(),
                    dispatch.recipient_count = recipients.len(),
                    "バッチ配信を受け付けました"
                );
                Ok(recipients)
            }
            AudienceResolution::Empty => {
                log_audience_empty(context);
                Err(DispatchError::EmptyAudience)
            }
            AudienceResolution::UpstreamFailed(detail) => {
                tracing::error!(
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::REGISTRY,
                    error.detail = %detail,
                    dispatch.event_name = context.event_name(),
                    "参加者レジストリの照会に失敗したため配信対象なしとして扱います"
                );
                log_audience_empty(context);
                Err(DispatchError::EmptyAudience)
            }
        }
    }

    /// 配信先へ順に送信し、件数を集計する
    ///
    /// 1 件の失敗は記録して次に進む。再送はしない。
    pub async fn deliver_batch(
        &self,
        event_name: &str,
        content: &MessageContent,
        recipients: &[Recipient],
    ) -> BatchReport {
        let mut outcomes = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            outcomes.push(self.dispatch_one(recipient, event_name, content).await);
        }
        let report: BatchReport = outcomes.iter().collect();

        let result = if report.sent == report.total() {
            event::result::SUCCESS
        } else {
            event::result::FAILURE
        };
        log_business_event!(
            event.category = event::category::DISPATCH,
            event.action = event::action::BATCH_COMPLETED,
            event.result = result,
            dispatch.event_name = event_name,
            dispatch.sent = report.sent,
            dispatch.delivery_failed = report.delivery_failed,
            dispatch.encoding_failed = report.encoding_failed,
            "バッチ配信が完了しました"
        );

        report
    }

    /// 送信を別タスクで開始する（fire-and-forget）
    ///
    /// 呼び出し元のスパンを引き継ぐ。返り値の `JoinHandle` は待たなくてよい。
    pub fn spawn_delivery(
        self: Arc<Self>,
        event_name: String,
        content: MessageContent,
        recipients: Vec<Recipient>,
    ) -> JoinHandle<BatchReport> {
        tokio::spawn(
            async move {
                self.deliver_batch(&event_name, &content, &recipients)
                    .await
            }
            .in_current_span(),
        )
    }
}

fn log_audience_empty(context: &EventContext) {
    log_business_event!(
        event.category = event::category::DISPATCH,
        event.action = event::action::AUDIENCE_EMPTY,
        event.result = event::result::FAILURE,
        dispatch.event_name = context.event_name(),
        "配信対象の参加者がいません"
    );
}
