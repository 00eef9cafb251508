use crate::model::{Candidate, ProviderError, Source};
use crate::parser::{JsonCandidateParser, Parser};
use crate::provider::CandidateSource;
use std::path::PathBuf;
use tracing::debug;

/// A JSON export on disk, in any shape the tolerant parser accepts.
pub struct FileSource {
    source: Source,
    path: PathBuf,
    parser: JsonCandidateParser,
}

impl FileSource {
    pub fn new(source: Source, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            path: path.into(),
            parser: JsonCandidateParser::new(source),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for FileSource {
    fn source(&self) -> Source {
        self.source
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<Candidate>, ProviderError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        debug!("read {} bytes from {}", body.len(), self.path.display());
        Ok(self.parser.parse(&body)?)
    }
}
