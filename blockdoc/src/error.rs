/// Errors raised while splitting a serialized document into blocks
///
/// Malformed delimiters are recovered from while parsing; only input the
/// parser refuses to descend into is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blocks nested deeper than the parser accepts
    TooDeep { offset: usize, limit: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::TooDeep { offset, limit } => write!(
                f,
                "Blocks nested deeper than {} levels at byte {}",
                limit, offset
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while serializing a block tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A block's child placeholders and its children disagree
    ChildCountMismatch {
        kind: String,
        slots: usize,
        children: usize,
    },
    /// Attributes could not be written as JSON
    Attributes { kind: String, message: String },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::ChildCountMismatch {
                kind,
                slots,
                children,
            } => write!(
                f,
                "Block '{}' has {} child slots but {} children",
                kind, slots, children
            ),
            RenderError::Attributes { kind, message } => {
                write!(f, "Failed to serialize attributes of '{}': {}", kind, message)
            }
        }
    }
}

impl std::error::Error for RenderError {}
