pub mod file;
pub mod http;
pub mod traits;

pub use file::FileSource;
pub use http::{ApiKey, HttpSource};
pub use traits::CandidateSource;
