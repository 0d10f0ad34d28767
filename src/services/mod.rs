//! Provider clients and the discovery pipeline built on top of them.

pub mod cache;
pub mod discovery;
pub mod google;
pub mod normalize;
pub mod youtube;

use thiserror::Error;

/// Transport-level failure from either search provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
}
