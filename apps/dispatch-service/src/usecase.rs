//! # ユースケース層
//!
//! Dispatch Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: レジストリ・画像エンコーダ・送信器を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは入力検証に徹し、配信の流れはユースケースに集約

pub mod dispatch;

pub use dispatch::{
    AudienceResolver,
    CredentialEncoder,
    DispatchService,
    MessageComposer,
    MessageContent,
};
