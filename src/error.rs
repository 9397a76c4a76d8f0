use std::fmt;
use std::path::PathBuf;

/// Errors from reading puzzle input. Failing to find a fill is not one of these; see
/// [`crate::FillFailure`].
#[derive(Debug)]
pub enum LoadError {
    /// A structure or word file couldn't be read.
    Io { path: PathBuf, source: std::io::Error },

    /// The structure file contains no grid rows.
    EmptyStructure { path: Option<PathBuf> },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "Failed to read '{}': {source}", path.display())
            }
            LoadError::EmptyStructure { path: Some(path) } => {
                write!(f, "Structure file '{}' has no grid rows", path.display())
            }
            LoadError::EmptyStructure { path: None } => write!(f, "Structure has no grid rows"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::EmptyStructure { .. } => None,
        }
    }
}
