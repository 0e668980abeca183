use thiserror::Error;

use crate::llm_client::{AiFailure, ServiceErrorKind};

/// Broad category of a failed tailoring request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ExtractionFailure,
    ConfigurationError,
    AiService,
    EmptyResult,
    Unexpected,
}

/// Why a tailoring request stopped. `Display` is the notice shown to the user;
/// detail for the server log travels in the variant payloads.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("No resume file part selected.")]
    MissingFilePart,

    #[error("No resume file selected.")]
    EmptyFilename,

    #[error("Invalid resume file type (.docx only).")]
    UnsupportedFileType,

    #[error("Invalid resume file name.")]
    UnsafeFilename,

    #[error("Could not read the submitted form.")]
    MalformedForm(String),

    #[error("File too large (Max: {max_mb}MB).")]
    PayloadTooLarge { max_mb: usize },

    #[error("Error saving uploaded file.")]
    SaveFailed(#[source] std::io::Error),

    #[error("Invalid Job Link URL format.")]
    InvalidJobLink,

    #[error("Could not extract details from link. Enter manually.")]
    JobLinkExtraction,

    #[error("Job Role and Description required if no link.")]
    MissingJobFields,

    #[error("Could not read resume file or it is empty.")]
    UnreadableResume,

    #[error(transparent)]
    Ai(#[from] AiFailure),

    #[error("AI processing finished but no content generated.")]
    NoContent,

    #[error("An unexpected error occurred. Please try again.")]
    Unexpected(String),
}

impl TailorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TailorError::MissingFilePart
            | TailorError::EmptyFilename
            | TailorError::UnsupportedFileType
            | TailorError::UnsafeFilename
            | TailorError::MalformedForm(_)
            | TailorError::PayloadTooLarge { .. }
            | TailorError::InvalidJobLink
            | TailorError::MissingJobFields => ErrorKind::InvalidInput,
            TailorError::JobLinkExtraction | TailorError::UnreadableResume => {
                ErrorKind::ExtractionFailure
            }
            TailorError::Ai(AiFailure::NotConfigured) => ErrorKind::ConfigurationError,
            TailorError::Ai(AiFailure::EmptyResponse) | TailorError::NoContent => {
                ErrorKind::EmptyResult
            }
            TailorError::Ai(AiFailure::Blocked(_) | AiFailure::Service(_)) => ErrorKind::AiService,
            TailorError::SaveFailed(_) | TailorError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Sub-category for AI service failures.
    pub fn service_error(&self) -> Option<&ServiceErrorKind> {
        match self {
            TailorError::Ai(AiFailure::Service(kind)) => Some(kind),
            _ => None,
        }
    }
}
