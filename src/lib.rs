pub mod classifier;
pub mod config;
pub mod geo;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod provider;
pub mod review;
pub mod search;
pub mod storage;
pub mod utils;
