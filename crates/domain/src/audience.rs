//! # 配信対象（オーディエンス）
//!
//! 参加者レジストリへの照会条件と、その結果を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`PresenceSelector`] | 出欠区分 | absent / present / both |
//! | [`GenderSelector`] | 性別区分 | male / female / both |
//! | [`NarrowingQuery`] | 絞り込み条件 | key / value / specific の 3 つ組 |
//! | [`UpstreamQueryKind`] | 照会種別 | レジストリ側のエンドポイント（restricted / all） |
//! | [`RegistryQuery`] | 照会ペイロード | レジストリへ送る JSON 本体 |
//! | [`AudienceResolution`] | 照会結果 | Resolved / Empty / UpstreamFailed |
//!
//! ## 設計方針
//!
//! - **出欠区分 → 照会種別の明示的な写像**: absent と present は同じ照会種別
//!   （[`UpstreamQueryKind::Restricted`]）に写像される。この重複は意図的に保持しており、
//!   [`PresenceSelector::query_kind`] の 1 箇所に集約してテストで固定している
//! - **性別コード**: female のみ `F`、それ以外（male / both）は `M` を送る
//! - **3 値の照会結果**: レジストリ障害を空の結果と区別できる形で返し、
//!   畳み込むかどうかは呼び出し側（バッチ配信）が決める

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{DomainError, recipient::Recipient};

/// 出欠区分
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PresenceSelector {
    /// 欠席者
    Absent,
    /// 出席者
    Present,
    /// 全員
    Both,
}

impl PresenceSelector {
    /// 文字列から出欠区分をパースする
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        value.parse().map_err(|_| {
            DomainError::Validation(format!(
                "出欠区分は absent / present / both のいずれかである必要があります: {value}"
            ))
        })
    }

    /// レジストリの照会種別に写像する
    ///
    /// absent と present はどちらも [`UpstreamQueryKind::Restricted`] に写像される。
    pub fn query_kind(self) -> UpstreamQueryKind {
        match self {
            Self::Absent | Self::Present => UpstreamQueryKind::Restricted,
            Self::Both => UpstreamQueryKind::All,
        }
    }
}

/// 性別区分
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenderSelector {
    Male,
    Female,
    Both,
}

impl GenderSelector {
    /// 文字列から性別区分をパースする
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        value.parse().map_err(|_| {
            DomainError::Validation(format!(
                "性別区分は male / female / both のいずれかである必要があります: {value}"
            ))
        })
    }

    /// レジストリに送る 1 文字の性別コードを返す
    ///
    /// female → `F`、それ以外 → `M`。
    pub fn code(self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male | Self::Both => "M",
        }
    }
}

/// 絞り込み条件
///
/// レジストリにそのまま渡される。ドメイン層では中身を解釈しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowingQuery {
    pub key:      String,
    pub value:    String,
    /// 完全一致で絞り込むかどうか
    pub specific: bool,
}

/// 配信対象フィルタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceFilter {
    pub presence: PresenceSelector,
    pub gender:   GenderSelector,
    pub query:    Option<NarrowingQuery>,
}

/// レジストリの照会種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
pub enum UpstreamQueryKind {
    /// 日付で絞り込む照会（`project-absent`）
    #[strum(serialize = "project-absent")]
    Restricted,
    /// 全参加者の照会（`project-all`）。日付は送らない
    #[strum(serialize = "project-all")]
    All,
}

impl UpstreamQueryKind {
    /// レジストリのエンドポイント名を返す
    pub fn endpoint(self) -> &'static str {
        self.into()
    }
}

/// レジストリ照会ペイロード
///
/// `kind` はエンドポイントの選択に使われ、JSON 本体には含まれない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryQuery {
    #[serde(skip)]
    pub kind:   UpstreamQueryKind,
    pub event:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day:    Option<i32>,
    pub gender: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query:  Option<NarrowingQuery>,
}

/// 配信対象の照会結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudienceResolution {
    /// 1 件以上の参加者が見つかった
    Resolved(Vec<Recipient>),
    /// 参加者が 0 件（またはレジストリが一覧を返さなかった）
    Empty,
    /// レジストリ呼び出しが失敗またはタイムアウトした
    UpstreamFailed(String),
}

impl AudienceResolution {
    /// レジストリが返した一覧から照会結果を作る
    ///
    /// 一覧が存在しない、または空の場合は [`AudienceResolution::Empty`] になる。
    pub fn from_participants(participants: Option<Vec<Recipient>>) -> Self {
        match participants {
            Some(list) if !list.is_empty() => Self::Resolved(list),
            _ => Self::Empty,
        }
    }
}
