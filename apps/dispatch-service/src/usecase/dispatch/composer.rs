//! メッセージの組み立て

use eventpass_domain::{
    credential::{CREDENTIAL_FILENAME, CREDENTIAL_MEDIA_TYPE, CredentialImage},
    notification::{Attachment, Disposition, OutboundMessage},
    recipient::Recipient,
};
use pulldown_cmark::{Options, Parser, html};

/// 配信メッセージの内容（件名・変換済み本文）
///
/// リクエスト単位で共通。配信先ごとに変わるのは宛先と添付画像のみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent {
    pub subject:   String,
    pub html_body: String,
}

impl MessageContent {
    /// 本文を一度だけ HTML に変換して保持する
    pub fn new(subject: impl Into<String>, body: &str, is_markup: bool) -> Self {
        Self {
            subject:   subject.into(),
            html_body: render_body(body, is_markup),
        }
    }
}

/// 配信先 1 件分の送信メッセージを組み立てる
#[derive(Debug, Clone)]
pub struct MessageComposer {
    from_address: String,
}

impl MessageComposer {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }

    /// 添付ファイルは認証情報画像 1 つのみ
    pub fn compose(
        &self,
        recipient: &Recipient,
        content: &MessageContent,
        credential: CredentialImage,
    ) -> OutboundMessage {
        OutboundMessage {
            to:         recipient.email().to_string(),
            from:       self.from_address.clone(),
            subject:    content.subject.clone(),
            html_body:  content.html_body.clone(),
            attachment: Attachment {
                content:     credential.into_bytes(),
                filename:    CREDENTIAL_FILENAME.to_string(),
                media_type:  CREDENTIAL_MEDIA_TYPE.to_string(),
                disposition: Disposition::Attachment,
            },
        }
    }
}

/// 本文を HTML に変換する。マークアップでなければそのまま返す
pub fn render_body(body: &str, is_markup: bool) -> String {
    if !is_markup {
        return body.to_string();
    }

    let mut rendered = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new_ext(body, Options::empty()));
    rendered
}
