#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("line {line}: `{directive}` appears before any User-agent line")]
    DirectiveBeforeAgent { line: usize, directive: String },

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error(transparent)]
    InvalidOrigin(#[from] url::ParseError),
}
