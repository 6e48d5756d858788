//! 配信サービス本体と配信先 1 件分の処理

use std::sync::Arc;

use eventpass_domain::{
    credential::CredentialToken,
    notification::DispatchOutcome,
    recipient::Recipient,
};
use eventpass_infra::notification::NotificationSender;
use eventpass_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};

use super::{AudienceResolver, CredentialEncoder, MessageComposer, MessageContent};

/// 配信サービス
///
/// バッチ送信（[`accept_batch`](Self::accept_batch) / [`deliver_batch`](Self::deliver_batch)）と
/// 単一送信（[`dispatch_direct`](Self::dispatch_direct)）で同じ配信処理を共有する。
pub struct DispatchService {
    pub(super) resolver: AudienceResolver,
    encoder:             CredentialEncoder,
    composer:            MessageComposer,
    sender:              Arc<dyn NotificationSender>,
}

impl DispatchService {
    pub fn new(
        resolver: AudienceResolver,
        encoder: CredentialEncoder,
        composer: MessageComposer,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            resolver,
            encoder,
            composer,
            sender,
        }
    }

    /// 配信先 1 件分の処理
    ///
    /// トークン導出 → 画像生成 → メッセージ組み立て → 送信。
    /// 画像生成に失敗した場合は送信しない。
    pub(super) async fn dispatch_one(
        &self,
        recipient: &Recipient,
        event_name: &str,
        content: &MessageContent,
    ) -> DispatchOutcome {
        let token = CredentialToken::derive(recipient.email(), event_name);

        let credential = match self.encoder.encode(&token) {
            Ok(image) => image,
            Err(e) => {
                log_business_event!(
                    event.category = event::category::DISPATCH,
                    event.action = event::action::ENCODING_FAILED,
                    event.result = event::result::FAILURE,
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::CREDENTIAL_ENCODING,
                    dispatch.event_name = event_name,
                    dispatch.recipient = %recipient,
                    error = %e,
                    "認証情報画像の生成に失敗したため送信をスキップ"
                );
                return DispatchOutcome::CredentialEncodingFailed(e.to_string());
            }
        };

        let message = self.composer.compose(recipient, content, credential);

        match self.sender.send_email(&message).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::DISPATCH,
                    event.action = event::action::SENT,
                    event.result = event::result::SUCCESS,
                    dispatch.event_name = event_name,
                    dispatch.recipient = %recipient,
                    "入場証メール送信成功"
                );
                DispatchOutcome::Sent
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::DISPATCH,
                    event.action = event::action::DELIVERY_FAILED,
                    event.result = event::result::FAILURE,
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::DELIVERY,
                    dispatch.event_name = event_name,
                    dispatch.recipient = %recipient,
                    error = %e,
                    "入場証メール送信失敗"
                );
                DispatchOutcome::DeliveryFailed(e.to_string())
            }
        }
    }
}
