use std::borrow::Cow;

/// A specialized [`BuildingsError`] enum of this crate.
#[skyline_derive::skyline_error]
pub enum BuildingsError {
    /// Attributes rejected by the validating lookup.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// The output stream refused a display record.
    #[error("Output error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal buildings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
