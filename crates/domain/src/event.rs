//! # イベントコンテキスト
//!
//! 1 回の配信リクエストを通じて不変なイベント情報。

use crate::{
    DomainError,
    audience::{AudienceFilter, RegistryQuery, UpstreamQueryKind},
};

/// イベントコンテキスト
///
/// リクエスト単位で生成され、配信処理の間は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    event_name: String,
    day:        i32,
    audience:   AudienceFilter,
}

impl EventContext {
    /// 新しいイベントコンテキストを作成する
    ///
    /// # エラー
    ///
    /// イベント名が空（空白のみを含む）の場合は `DomainError::Validation` を返す。
    pub fn new(
        event_name: impl Into<String>,
        day: i32,
        audience: AudienceFilter,
    ) -> Result<Self, DomainError> {
        let event_name = event_name.into();
        if event_name.trim().is_empty() {
            return Err(DomainError::Validation("イベント名は必須です".to_string()));
        }
        Ok(Self {
            event_name,
            day,
            audience,
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn day(&self) -> i32 {
        self.day
    }

    pub fn audience(&self) -> &AudienceFilter {
        &self.audience
    }

    /// レジストリ照会ペイロードを組み立てる
    ///
    /// 照会種別が [`UpstreamQueryKind::All`] の場合は日付を送らない。
    pub fn registry_query(&self) -> RegistryQuery {
        let kind = self.audience.presence.query_kind();
        let day = match kind {
            UpstreamQueryKind::Restricted => Some(self.day),
            UpstreamQueryKind::All => None,
        };

        RegistryQuery {
            kind,
            event: self.event_name.clone(),
            day,
            gender: self.audience.gender.code(),
            query: self.audience.query.clone(),
        }
    }
}
