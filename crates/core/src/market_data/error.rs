use std::fmt;

#[derive(Debug, Clone)]
pub enum ProviderError {
    /// The provider does not know the symbol.
    NotFound { symbol: String },
    /// Non-success HTTP status.
    Http { status: u16, detail: String },
    /// Request never completed (connect, timeout, body read).
    Transport { detail: String },
    /// Response arrived but did not have the expected shape.
    Decode { detail: String },
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn transport(err: impl fmt::Display) -> Self {
        Self::Transport {
            detail: err.to_string(),
        }
    }

    pub(crate) fn decode(err: impl fmt::Display) -> Self {
        Self::Decode {
            detail: err.to_string(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { symbol } => write!(f, "symbol not found: {symbol}"),
            Self::Http { status, detail } => {
                write!(f, "market data HTTP {status}: {detail}")
            }
            Self::Transport { detail } => write!(f, "market data request failed: {detail}"),
            Self::Decode { detail } => {
                write!(f, "market data response could not be decoded: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}
