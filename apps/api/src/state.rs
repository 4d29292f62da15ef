use crate::ollama::OllamaClient;
use crate::providers::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum
/// extractors. The parsing core itself is stateless; this only carries the
/// outbound clients.
#[derive(Clone)]
pub struct AppState {
    pub providers: ProviderRegistry,
    pub ollama: OllamaClient,
}
