use thiserror::Error;

/// A rejected piece of user input.
///
/// The `Display` text is the message shown to the person filling in the
/// form, so every variant reads as an instruction rather than a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter a valid image URL")]
    EmptyImageUrl,

    #[error("Please enter a valid Dropbox URL")]
    InvalidImageUrl,

    #[error("This image was already added")]
    DuplicateImage,

    #[error("Please enter a valid video URL")]
    EmptyVideoUrl,

    #[error("Please enter a valid Dropbox or YouTube URL")]
    InvalidVideoUrl,

    #[error("This video was already added")]
    DuplicateVideo,

    #[error("Please enter a valid date (YYYY-MM-DD): '{0}'")]
    InvalidDate(String),

    #[error("Please enter a valid time (HH:MM): '{0}'")]
    InvalidTime(String),

    #[error("Please enter a valid color (#rrggbb): '{0}'")]
    InvalidColor(String),

    #[error("Please enter a valid URL: '{0}'")]
    InvalidUrl(String),

    #[error("Please select one of the available categories")]
    UnknownCategory(String),

    #[error("Unknown form field: '{0}'")]
    UnknownField(String),

    #[error("Please fill in the {0} field")]
    MissingRequired(&'static str),
}
