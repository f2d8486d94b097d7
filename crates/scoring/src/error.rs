#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    NotFound { id: String },
    DuplicateGuess { id: String },
    AlreadySolved,
    /// A restored guess whose `exact_match` disagrees with the target.
    InconsistentGuess { id: String },
    InvalidConfig(String),
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::NotFound { id } => write!(f, "region not found: {id}"),
            ScoringError::DuplicateGuess { id } => write!(f, "region already guessed: {id}"),
            ScoringError::AlreadySolved => write!(f, "target already solved"),
            ScoringError::InconsistentGuess { id } => {
                write!(f, "restored guess {id} disagrees with the target")
            }
            ScoringError::InvalidConfig(msg) => write!(f, "invalid scoring config: {msg}"),
        }
    }
}

impl std::error::Error for ScoringError {}
