use thiserror::Error;

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("malformed record at index {index}: missing `{field}`")]
    MalformedRecord { index: usize, field: &'static str },

    #[error("failed to fetch comparison data: {0}")]
    Fetch(String),

    #[error("failed to render comparison image: {0}")]
    Render(String),

    #[error("failed to save comparison image: {0}")]
    Dispatch(String),

    #[error("an export is already in progress")]
    ExportInFlight,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl CompareError {
    /// Text shown to the user in a blocking alert or inline error banner.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "Could not load card comparison data. Please retry.",
            Self::Render(_) | Self::Dispatch(_) | Self::InvalidData(_) => {
                "Failed to generate the comparison image. Please try again."
            }
            Self::ExportInFlight => "An image is already being generated.",
            Self::MalformedRecord { .. } => "Some cards could not be displayed.",
            Self::InvalidConfig(_) => "Comparison export is misconfigured.",
        }
    }

    /// Only fetch failures offer a retry affordance.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
