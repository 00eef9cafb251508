// Provider payloads into candidates
pub mod json_parser;

use crate::model::{Candidate, ParserError};

pub use json_parser::JsonCandidateParser;

pub trait Parser {
    fn parse(&self, body: &str) -> Result<Vec<Candidate>, ParserError>;
}
