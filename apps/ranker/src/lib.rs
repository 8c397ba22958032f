//! Client side of the resume ranking service: upload validation and
//! submission, job-status polling, and presentation of ranked candidates.
//!
//! The ranking itself (parsing, embeddings, scoring) happens in the external
//! service; this crate only talks to it over HTTP.

pub mod config;
pub mod errors;
pub mod models;
pub mod ranking_client;
pub mod results;
pub mod routes;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use errors::AppError;
pub use ranking_client::{ClientConfig, ClientError, PollHandle, RankingClient};
