pub type KaravidResult<T> = Result<T, KaravidError>;

#[derive(thiserror::Error, Debug)]
pub enum KaravidError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("sink error: {0}")]
    Sink(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KaravidError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// True for the "produced nothing" failure class, which callers must treat
    /// as an error distinct from encoder failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::Export(msg) if msg.starts_with("empty result"))
    }

    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::Export(format!("empty result: {}", msg.into()))
    }
}
