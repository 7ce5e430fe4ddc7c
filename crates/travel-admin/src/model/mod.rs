//! # Admin Resources
//!
//! One module per manageable collection. Each defines the persisted record, its form
//! payload and its [`AdminResource`](resource_framework::AdminResource) impl; nothing else
//! is screen-specific.
//!
//! | Resource | Collection | File |
//! |----------|------------|------|
//! | [`Airport`] | `airports` | - |
//! | [`BoardBasis`] | `board-basis` | - |
//! | [`Holiday`] | `holidays` | image, required on create |
//! | [`Faq`] | `faqs` | - |
//! | [`Term`] | `terms` | - |
//! | [`CarouselSlide`] | `carousel` | image or video, required on create |
//! | [`User`] | `users` | - |
//! | [`Subscriber`] | `newsletter` | - |

/// Declares a type-safe, server-assigned numeric identifier.
///
/// Serializes as the bare number and displays as it too, since it is used as a URL
/// path segment.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
pub(crate) use record_id;

pub mod airport;
pub mod board_basis;
pub mod carousel;
pub mod faq;
pub mod holiday;
pub mod newsletter;
pub mod term;
pub mod user;

pub use airport::*;
pub use board_basis::*;
pub use carousel::*;
pub use faq::*;
pub use holiday::*;
pub use newsletter::*;
pub use term::*;
pub use user::*;

/// First-failure helper for `validate` impls.
pub(crate) fn require(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_numbers() {
        let id = AirportId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::from_str::<AirportId>("7").unwrap(), AirportId(7));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("  ", "Name is required").is_err());
        assert!(require("Gatwick", "Name is required").is_ok());
    }
}
