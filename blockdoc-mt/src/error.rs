use blockdoc::{ParseError, RenderError};

/// Error types for block document translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Network failure or timeout while calling the translation API
    Transport(String),
    /// The API answered with a status other than 200
    Api { status: u16, message: String },
    /// The API answered 200 with a body that has no translation in it
    Format(String),
    /// Missing or unusable configuration (API key, endpoint, client)
    Config(String),
    /// Input is not in the state the operation requires
    Precondition(String),
    /// Language code that cannot be sent to the API
    InvalidLocale(String),
    /// The document body could not be split into blocks
    Parse(ParseError),
    /// The translated block tree could not be serialized
    Render(RenderError),
    /// The overall time budget for a document ran out
    DeadlineExceeded,
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::Transport(msg) => write!(f, "Transport error: {}", msg),
            MtError::Api { status, message } => {
                write!(f, "API error (HTTP {}): {}", status, message)
            }
            MtError::Format(msg) => write!(f, "Invalid API response: {}", msg),
            MtError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MtError::Precondition(msg) => write!(f, "Precondition failed: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::Parse(e) => write!(f, "Document parse error: {}", e),
            MtError::Render(e) => write!(f, "Document render error: {}", e),
            MtError::DeadlineExceeded => write!(f, "Translation time budget exceeded"),
        }
    }
}

impl std::error::Error for MtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MtError::Parse(e) => Some(e),
            MtError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl MtError {
    /// Failures of a single translation call; the caller keeps the original text
    pub fn is_call_failure(&self) -> bool {
        matches!(
            self,
            MtError::Transport(_)
                | MtError::Api { .. }
                | MtError::Format(_)
                | MtError::DeadlineExceeded
        )
    }
}

impl From<reqwest::Error> for MtError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MtError::Transport(format!("request timed out: {}", e))
        } else if e.is_decode() {
            MtError::Format(e.to_string())
        } else {
            MtError::Transport(e.to_string())
        }
    }
}

impl From<ParseError> for MtError {
    fn from(e: ParseError) -> Self {
        MtError::Parse(e)
    }
}

impl From<RenderError> for MtError {
    fn from(e: RenderError) -> Self {
        MtError::Render(e)
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;

/// Outcome of one translation call: the translated text, or why it failed
pub type TranslationOutcome = MtResult<String>;
