/// Errors a component can surface to the frame loop.
#[derive(Debug)]
pub enum CoreError {
    /// An asset could not be located or decoded by the resource collaborator.
    Asset(String),
    /// A component hit a state it cannot recover from (a malformed frame is
    /// not auto-corrected; the shell decides whether to abort or restart).
    Fatal(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset(m) => write!(f, "asset error: {m}"),
            Self::Fatal(m) => write!(f, "fatal component error: {m}"),
        }
    }
}

impl std::error::Error for CoreError {}
