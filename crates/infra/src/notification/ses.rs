//! SES 通知送信実装
//!
//! AWS SES v2 API を使用してメールを送信する。
//! 添付ファイルを含むため、MIME を組み立てて raw メッセージとして送る。
//! 本番環境で使用する。

use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    primitives::Blob,
    types::{Destination, EmailContent, RawMessage},
};
use eventpass_domain::notification::{NotificationError, OutboundMessage};

use super::{NotificationSender, mime::build_mime_message};

/// SES 通知送信
///
/// `aws_sdk_sesv2::Client` をラップする。
/// 送信元アドレスは SES で検証済みであること。
pub struct SesNotificationSender {
    client: Client,
}

impl SesNotificationSender {
    /// 新しい SES 送信インスタンスを作成
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationSender for SesNotificationSender {
    async fn send_email(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        let mime = build_mime_message(message)?;

        let raw = RawMessage::builder()
            .data(Blob::new(mime.formatted()))
            .build()
            .map_err(|e| NotificationError::SendFailed(format!("raw メッセージ構築失敗: {e}")))?;

        let destination = Destination::builder().to_addresses(&message.to).build();

        self.client
            .send_email()
            .from_email_address(&message.from)
            .destination(destination)
            .content(EmailContent::builder().raw(raw).build())
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SES 送信失敗: {e}")))?;

        Ok(())
    }
}
