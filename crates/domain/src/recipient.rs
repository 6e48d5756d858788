//! # 配信先

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 配信先
///
/// レジストリから解決されるか、直接送信で指定される。
/// メールアドレス以外の情報は持たない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{email}")]
pub struct Recipient {
    email: String,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// メールアドレスを返す
    pub fn email(&self) -> &str {
        &self.email
    }
}
