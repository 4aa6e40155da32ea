use thiserror::Error;

/// Top-level error type for toolpath generation.
#[derive(Debug, Error)]
pub enum MillpathError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric primitives and their connectivity.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    /// A segment or contour could not be joined to the structure being built.
    #[error("no matching endpoint: {0}")]
    Mismatch(String),

    /// A boundary primitive other than a line or an arc.
    #[error("unsupported geometry: {0}")]
    Unsupported(String),

    #[error("malformed text form: {0}")]
    Parse(String),
}

/// Errors raised by offsetting, clipping and path generation.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),

    /// The requested offset cannot be realized; the region is used up.
    #[error("offset exhausted at distance {0}")]
    OffsetExhausted(f64),

    /// A segment classified as crossing the stock has no trim point in range.
    #[error("clip ambiguous: {0}")]
    ClipAmbiguous(String),
}

/// Errors related to machining parameter files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML parameters: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to write TOML parameters: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("parameter file must be .json or .toml: {0}")]
    UnknownFormat(String),

    #[error("invalid parameter {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl MillpathError {
    /// Returns true for the expected end of an offset sequence.
    #[must_use]
    pub fn is_offset_exhausted(&self) -> bool {
        matches!(self, Self::Operation(OperationError::OffsetExhausted(_)))
    }
}

/// Convenience type alias for results using [`MillpathError`].
pub type Result<T> = std::result::Result<T, MillpathError>;
