//! MIME メッセージの組み立て
//!
//! HTML 本文 + 認証情報画像の添付からなる `multipart/mixed` を生成する。

use eventpass_domain::notification::{Disposition, NotificationError, OutboundMessage};
use lettre::message::{Attachment, Message, MultiPart, SinglePart, header::ContentType};

/// 送信メッセージから lettre の `Message` を組み立てる
pub(crate) fn build_mime_message(message: &OutboundMessage) -> Result<Message, NotificationError> {
    let attachment = &message.attachment;
    let content_type = ContentType::parse(&attachment.media_type).map_err(|e| {
        NotificationError::SendFailed(format!("添付ファイルのメディアタイプ不正: {e}"))
    })?;

    let attachment_part = match attachment.disposition {
        Disposition::Attachment => Attachment::new(attachment.filename.clone()),
        Disposition::Inline => Attachment::new_inline(attachment.filename.clone()),
    }
    .body(attachment.content.clone(), content_type);

    Message::builder()
        .from(
            message
                .from
                .parse()
                .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?,
        )
        .to(message
            .to
            .parse()
            .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?)
        .subject(&message.subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(message.html_body.clone()),
                )
                .singlepart(attachment_part),
        )
        .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
}
