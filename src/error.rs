use thiserror::Error;

/// Failures talking to a label provider. All of these degrade to an empty
/// label list at the adapter boundary; none of them abort a batch.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}: {1}")]
    Status(u16, String),
    #[error("unexpected response: {0}")]
    Malformed(String),
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Catalog (media store) failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("catalog file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("could not find a free name for {0}")]
    Collision(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
