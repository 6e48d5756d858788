//! # 認証情報画像エンコーダ
//!
//! 認証情報トークンを QR コードの PNG 画像に描画し、データ URI として返す。

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use eventpass_domain::{
    credential::{CREDENTIAL_MEDIA_TYPE, CredentialToken},
    notification::NotificationError,
};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

/// QR コードの最小描画サイズ（ピクセル）
const MIN_DIMENSION: u32 = 240;

/// 認証情報画像エンコーダトレイト
///
/// 出力は `data:<mime>;base64,<payload>` 形式のデータ URI。
pub trait CredentialImageEncoder: Send + Sync {
    /// トークンを画像のデータ URI に変換する
    fn encode_data_uri(&self, token: &CredentialToken) -> Result<String, NotificationError>;
}

/// QR コード画像エンコーダ
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeImageEncoder;

impl CredentialImageEncoder for QrCodeImageEncoder {
    fn encode_data_uri(&self, token: &CredentialToken) -> Result<String, NotificationError> {
        let code = QrCode::new(token.as_str().as_bytes())
            .map_err(|e| NotificationError::EncodingFailed(format!("QR コード生成失敗: {e}")))?;

        let rendered = code
            .render::<Luma<u8>>()
            .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
            .build();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(rendered)
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| NotificationError::EncodingFailed(format!("PNG 書き出し失敗: {e}")))?;

        Ok(format!(
            "data:{CREDENTIAL_MEDIA_TYPE};base64,{}",
            STANDARD.encode(png.into_inner())
        ))
    }
}
