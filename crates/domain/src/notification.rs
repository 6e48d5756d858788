//! # 通知
//!
//! 送信メッセージと配信結果のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`OutboundMessage`] | 送信メッセージ | 配信先ごとに新しく組み立てる。使い回さない |
//! | [`Attachment`] | 添付ファイル | 認証情報画像（1 通につき 1 つ） |
//! | [`DispatchOutcome`] | 配信結果 | 配信先 1 件ごとの結果 |
//! | [`BatchReport`] | バッチ集計 | 配信結果の件数集計（永続化しない） |
//!
//! ## 配信先ごとの状態遷移
//!
//! ```text
//! Pending → CredentialEncoded → Composed → Delivered   (Sent)
//!    └──────────→ Failed(encode)                       (CredentialEncodingFailed)
//!                                   └────→ Failed(send) (DeliveryFailed)
//! ```

use serde::Serialize;
use strum::IntoStaticStr;
use thiserror::Error;

/// 通知処理のエラー
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// 認証情報画像のエンコードに失敗
    #[error("認証情報画像のエンコードに失敗: {0}")]
    EncodingFailed(String),
}

/// 添付ファイルの Content-Disposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Disposition {
    Attachment,
    Inline,
}

/// 添付ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// バイナリ本体
    pub content:     Vec<u8>,
    pub filename:    String,
    /// メディアタイプ（例: `image/png`）
    pub media_type:  String,
    pub disposition: Disposition,
}

/// 送信メッセージ
///
/// メッセージ組み立ての出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// 送信先メールアドレス
    pub to:         String,
    /// 送信元メールアドレス
    pub from:       String,
    /// 件名
    pub subject:    String,
    /// HTML 本文
    pub html_body:  String,
    /// 認証情報画像
    pub attachment: Attachment,
}

/// 配信先 1 件ごとの配信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 送信成功
    Sent,
    /// 送信プロバイダがエラーを返した
    DeliveryFailed(String),
    /// 認証情報画像を生成できず、送信をスキップした
    CredentialEncodingFailed(String),
}

/// バッチ配信の件数集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub sent:            usize,
    pub delivery_failed: usize,
    pub encoding_failed: usize,
}

impl BatchReport {
    /// 1 件分の配信結果を加えた集計を返す
    pub fn record(self, outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Sent => Self {
                sent: self.sent + 1,
                ..self
            },
            DispatchOutcome::DeliveryFailed(_) => Self {
                delivery_failed: self.delivery_failed + 1,
                ..self
            },
            DispatchOutcome::CredentialEncodingFailed(_) => Self {
                encoding_failed: self.encoding_failed + 1,
                ..self
            },
        }
    }

    /// 処理した配信先の総数
    pub fn total(&self) -> usize {
        self.sent + self.delivery_failed + self.encoding_failed
    }
}

impl<'a> FromIterator<&'a DispatchOutcome> for BatchReport {
    fn from_iter<I: IntoIterator<Item = &'a DispatchOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::record)
    }
}
