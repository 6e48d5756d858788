//! 認証情報画像の生成

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use eventpass_domain::{
    credential::{CredentialImage, CredentialToken, strip_data_uri_header},
    notification::NotificationError,
};
use eventpass_infra::credential::CredentialImageEncoder;

/// 認証情報トークンを添付用の画像バイト列に変換する
///
/// 画像エンコーダが返すデータ URI のヘッダーを取り除き、base64 をデコードする。
/// ヘッダーがない場合はペイロードとしてそのまま扱う。
pub struct CredentialEncoder {
    image_encoder: Arc<dyn CredentialImageEncoder>,
}

impl CredentialEncoder {
    pub fn new(image_encoder: Arc<dyn CredentialImageEncoder>) -> Self {
        Self { image_encoder }
    }

    pub fn encode(&self, token: &CredentialToken) -> Result<CredentialImage, NotificationError> {
        let data_uri = self.image_encoder.encode_data_uri(token)?;
        let bytes = STANDARD
            .decode(strip_data_uri_header(&data_uri))
            .map_err(|e| NotificationError::EncodingFailed(format!("base64 デコード失敗: {e}")))?;
        Ok(CredentialImage::new(bytes))
    }
}
