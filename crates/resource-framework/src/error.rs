//! # Framework Errors
//!
//! This module defines the error types shared by the store, the upload pipeline and the
//! controllers. By centralizing error definitions, every screen reports failures the same way.
//!
//! - [`StoreError`]: remote store and channel failures.
//! - [`UploadError`]: local upload rejections and staging failures.
//! - [`SessionError`]: what a dialog or delete session reports back to its caller.

/// Fallback shown to the user when the server gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors returned by the resource store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The server rejected the input; recoverable by editing and resubmitting.
    #[error("{0}")]
    ValidationFailed(String),
    /// The target record no longer exists.
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Network or server unavailable. Carries the server's message when it sent one.
    #[error("Transport failed: {}", .0.as_deref().unwrap_or("no response"))]
    TransportFailed(Option<String>),
    /// A list refresh failed; the previous collection was kept.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
}

impl StoreError {
    /// The message a user should see for this failure.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::ValidationFailed(message) => message.clone(),
            StoreError::TransportFailed(Some(message)) => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Errors raised while validating or staging a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The declared MIME type is not in the policy's allow-list.
    #[error("Only {} files are allowed", human_list(.allowed))]
    UnsupportedType {
        /// Display names of the accepted formats, in policy order.
        allowed: Vec<String>,
    },
    /// The file exceeds the policy's byte ceiling.
    #[error("{kind} size must be less than {}", human_size(.max_bytes))]
    TooLarge { kind: String, max_bytes: u64 },
    /// Temporary storage could not be written.
    #[error("Could not store the uploaded file: {0}")]
    StorageUnavailable(String),
}

/// Errors reported by dialog and delete sessions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The form failed a local check; nothing was sent.
    #[error("{0}")]
    ValidationFailed(String),
    /// A create needs a file and none was staged.
    #[error("Please attach a {0} before saving")]
    MissingRequiredFile(&'static str),
    /// The dialog was closed before the operation finished; its result was dropped.
    #[error("The form was closed before the file was stored")]
    Detached,
    /// The acting identity tried to delete itself.
    #[error("You cannot delete your own account")]
    SelfDeletion,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// The message a user should see for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Store(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Joins names the way a sentence would: `A`, `A and B`, `A, B, and C`.
fn human_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

fn human_size(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    let bytes = *bytes;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_messages_read_like_sentences() {
        let err = UploadError::UnsupportedType {
            allowed: vec!["JPG".into(), "JPEG".into(), "PNG".into()],
        };
        assert_eq!(err.to_string(), "Only JPG, JPEG, and PNG files are allowed");

        let err = UploadError::UnsupportedType {
            allowed: vec!["MP4".into(), "WEBM".into()],
        };
        assert_eq!(err.to_string(), "Only MP4 and WEBM files are allowed");

        let err = UploadError::TooLarge {
            kind: "Image".into(),
            max_bytes: 5 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "Image size must be less than 5MB");
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = StoreError::TransportFailed(Some("Airport code already exists".into()));
        assert_eq!(err.user_message(), "Airport code already exists");

        let err = StoreError::TransportFailed(None);
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = SessionError::Store(StoreError::StoreClosed);
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
