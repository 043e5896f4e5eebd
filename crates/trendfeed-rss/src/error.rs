use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing feed: {0}")]
    Io(#[from] std::io::Error),
}
