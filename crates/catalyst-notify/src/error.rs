/// Errors that can occur while sending mail.
///
/// # Examples
///
/// ```rust
/// use catalyst_notify::error::NotifyError;
///
/// let err = NotifyError::InvalidConfig("missing api_key".to_string());
/// assert!(err.to_string().contains("api_key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Transport configuration is missing a required field or contains an invalid value.
    #[error("Notify: invalid mail configuration: {0}")]
    InvalidConfig(String),

    /// An HTTP request to the mail API failed.
    #[error("Notify: HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// SMTP transport error when sending email.
    #[error("Notify: SMTP error: {0}")]
    SmtpError(String),

    /// A sender or recipient address did not parse.
    #[error("Notify: invalid address '{0}'")]
    InvalidAddress(String),

    /// The mail API returned a non-success response.
    #[error("Notify: API error from {service}: status={status}, body={body}")]
    ApiError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Notify: {0}")]
    Other(String),
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
