//! # ログ出力の初期化
//!
//! Dispatch Service のトレーシング購読者を組み立てる。
//!
//! - `LOG_FORMAT=json`: 1 行 1 JSON。`dispatch.*` フィールドと `event.kind` がフラットなキーになる
//! - それ以外: 開発向けの Pretty 形式
//!
//! `ErrorLayer` を登録するため、レジストリ呼び出し失敗時の `SpanTrace` に
//! `app` スパンからの呼び出し経路が残る。

/// ログ形式を指定する環境変数
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// `RUST_LOG` 未設定時のフィルタ
#[cfg(feature = "observability")]
const DEFAULT_DIRECTIVES: &str = "info,eventpass=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// 大文字小文字と前後の空白を無視して解釈する。未知の値は `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `app` スパンの `service` フィールド
    pub service_name:        String,
    pub log_format:          LogFormat,
    /// 解釈できなかった `LOG_FORMAT` の値。購読者の登録後に警告として出力する
    pub rejected_log_format: Option<String>,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            rejected_log_format: None,
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る。未設定・不正な値は Pretty
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::with_log_format_value(service_name, std::env::var(LOG_FORMAT_VAR).ok())
    }

    fn with_log_format_value(service_name: impl Into<String>, value: Option<String>) -> Self {
        let mut config = Self::new(service_name, LogFormat::default());
        if let Some(value) = value {
            match LogFormat::parse(&value) {
                Some(format) => config.log_format = format,
                None => config.rejected_log_format = Some(value),
            }
        }
        config
    }
}

/// グローバルなトレーシング購読者を登録する
///
/// `RUST_LOG` が未設定なら `info,eventpass=debug`。
/// プロセス内で一度だけ呼び出すこと。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_DIRECTIVES.into());

    // 業務イベントを jq で抽出できるよう、イベントのフィールドはトップレベルに展開する
    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    if let Some(value) = &config.rejected_log_format {
        tracing::warn!(
            log_format = %value,
            "LOG_FORMAT の値を解釈できないため pretty で出力します"
        );
    }
    tracing::debug!(
        service = %config.service_name,
        log_format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("json", Some(LogFormat::Json))]
    #[case("JSON", Some(LogFormat::Json))]
    #[case(" pretty\n", Some(LogFormat::Pretty))]
    #[case("yaml", None)]
    #[case("", None)]
    fn test_ログ形式のパース(#[case] input: &str, #[case] expected: Option<LogFormat>) {
        assert_eq!(LogFormat::parse(input), expected);
    }

    #[test]
    fn test_未設定ならprettyで警告もしない() {
        let config = TracingConfig::with_log_format_value("dispatch-service", None);

        assert_eq!(config, TracingConfig::new("dispatch-service", LogFormat::Pretty));
    }

    #[test]
    fn test_不正な値はprettyにして元の値を残す() {
        let config =
            TracingConfig::with_log_format_value("dispatch-service", Some("yaml".to_string()));

        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.rejected_log_format.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_jsonを指定すればjsonになる() {
        let config =
            TracingConfig::with_log_format_value("dispatch-service", Some("json".to_string()));

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.rejected_log_format, None);
    }
}
