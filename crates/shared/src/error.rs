/// Classification of a failed purchase attempt.
///
/// Every failure mode collapses into a rejected outcome at the client
/// boundary; the kind records where in the request lifecycle it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No farm endpoint configured; detected before any network I/O.
    Configuration,
    /// Structured failure with transport status 429.
    RateLimited,
    /// Any other structured failure reported by the farm.
    Server,
    /// Response body was not the expected JSON shape.
    MalformedResponse,
    /// Connection, DNS, or timeout failure before a response arrived.
    Transport,
}

impl FailureKind {
    /// Classifies a structured failure response by its transport status.
    pub fn from_status(status: u16) -> Self {
        if status == 429 {
            Self::RateLimited
        } else {
            Self::Server
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::RateLimited => "rate limited",
            Self::Server => "server",
            Self::MalformedResponse => "malformed response",
            Self::Transport => "transport",
        }
    }
}
