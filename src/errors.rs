use thiserror::Error;


/// Errors raised while building or querying a road graph
#[derive(Error, Debug)]
pub enum RoadGraphError {
    /// Caller broke the ingestion or query contract
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Malformed line in a road map file
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    /// Reading a road map failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Spatial index rejected a point
    #[error("spatial index error: {0}")]
    Spatial(String),
    /// Search observer asked to abort the search
    #[error("observer aborted search: {0}")]
    Observer(String),
}

pub type Result<T> = std::result::Result<T, RoadGraphError>;


impl From<kdtree::ErrorKind> for RoadGraphError {
    fn from(error: kdtree::ErrorKind) -> Self {
        RoadGraphError::Spatial(error.to_string())
    }
}

impl RoadGraphError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RoadGraphError::InvalidArgument(msg.into())
    }
}
