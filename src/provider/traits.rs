use crate::model::{Candidate, ProviderError, Source};

#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Catalog the candidates are attributed to.
    fn source(&self) -> Source;

    /// Human-readable origin for logs (URL or file path).
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<Candidate>, ProviderError>;
}
