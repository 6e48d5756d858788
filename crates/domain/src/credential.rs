//! # 認証情報
//!
//! 参加者ごとの認証情報トークンと、それを描画した画像を表現する。
//!
//! ## 設計方針
//!
//! - **純粋関数による導出**: トークンは (メールアドレス, イベント名) のみから決まる。
//!   保存も採番もせず、同じ入力からは常に同じ値が得られる
//! - **秘匿値ではない**: 出欠確認用 QR コードの元データであり、認証には使わない
//! - **データ URI の除去**: 画像エンコーダは `data:<mime>;base64,` 形式を返すため、
//!   配信層へ渡す前にヘッダーを取り除く

use derive_more::Display;
use sha2::{Digest, Sha256};

/// 添付ファイル名（固定）
pub const CREDENTIAL_FILENAME: &str = "qrcode.png";

/// 添付ファイルのメディアタイプ
pub const CREDENTIAL_MEDIA_TYPE: &str = "image/png";

/// 認証情報トークン
///
/// メールアドレスとイベント名を連結した文字列の SHA-256（16 進小文字、64 文字）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct CredentialToken(String);

impl CredentialToken {
    /// 配信先とイベントからトークンを導出する
    pub fn derive(email: &str, event_name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(email.as_bytes());
        hasher.update(event_name.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 認証情報画像（PNG バイト列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialImage(Vec<u8>);

impl CredentialImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// データ URI のヘッダー（`data:...,`）を取り除いたペイロードを返す
///
/// ヘッダーがない場合は入力をそのまま返す。
pub fn strip_data_uri_header(value: &str) -> &str {
    match value.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, payload)| payload),
        None => value,
    }
}
