//! 配信対象の解決

use std::sync::Arc;

use axum::http::HeaderValue;
use eventpass_domain::{audience::AudienceResolution, event::EventContext};
use eventpass_infra::registry::RegistryClient;

/// 参加者レジストリに照会して配信対象を解決する
pub struct AudienceResolver {
    registry: Arc<dyn RegistryClient>,
}

impl AudienceResolver {
    pub fn new(registry: Arc<dyn RegistryClient>) -> Self {
        Self { registry }
    }

    /// イベントコンテキストに一致する参加者を解決する
    ///
    /// 認可トークンはそのままレジストリに転送する。
    /// レジストリの失敗・タイムアウトは [`AudienceResolution::UpstreamFailed`] になる。
    pub async fn resolve(
        &self,
        context: &EventContext,
        authorization: &HeaderValue,
    ) -> AudienceResolution {
        let query = context.registry_query();

        match self.registry.fetch_participants(&query, authorization).await {
            Ok(participants) => AudienceResolution::from_participants(participants),
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    endpoint = query.kind.endpoint(),
                    "参加者レジストリの呼び出しに失敗"
                );
                AudienceResolution::UpstreamFailed(e.to_string())
            }
        }
    }
}
