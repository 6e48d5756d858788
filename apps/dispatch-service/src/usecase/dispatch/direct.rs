//! 単一送信

use eventpass_domain::{notification::DispatchOutcome, recipient::Recipient};

use super::{DispatchService, MessageContent};
use crate::error::DispatchError;

impl DispatchService {
    /// 指定した 1 件に送信し、結果を返す
    ///
    /// アドレスの形式検証は呼び出し元（ハンドラ）で行う。
    pub async fn dispatch_direct(
        &self,
        recipient: &Recipient,
        event_name: &str,
        content: &MessageContent,
    ) -> Result<(), DispatchError> {
        match self.dispatch_one(recipient, event_name, content).await {
            DispatchOutcome::Sent => Ok(()),
            DispatchOutcome::DeliveryFailed(detail) => Err(DispatchError::DeliveryFailed(detail)),
            DispatchOutcome::CredentialEncodingFailed(detail) => {
                Err(DispatchError::CredentialEncodingFailed(detail))
            }
        }
    }
}
