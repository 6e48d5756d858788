//! # Dispatch Service ライブラリ
//!
//! イベント参加者への入場証メール配信サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app`: ルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: サービスエラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: 配信ユースケース（参加者解決 → 認証情報生成 → メール組み立て → 送信）

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
