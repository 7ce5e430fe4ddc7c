//! # Upload Validation
//!
//! Checks a candidate file's declared type and size against an [`UploadPolicy`] before it
//! is accepted for staging. Validation is pure: no I/O, and the same candidate and policy
//! always produce the same verdict.
//!
//! A [`PendingUpload`] can only be obtained from [`validate`] or [`validate_any`], so
//! holding one proves the file passed its policy.
//!
//! A field that takes several kinds of file (a carousel slide is an image or a video) keeps
//! one policy per kind. The declared type picks the policy, and the size is checked against
//! that policy's own ceiling.

use crate::error::UploadError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Type allow-list and size ceiling for one kind of upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// What the file is called in messages, e.g. `"Image"`.
    pub kind: String,
    /// Accepted MIME types, in display order.
    pub allowed_types: Vec<String>,
    pub max_bytes: u64,
}

impl UploadPolicy {
    pub fn new(
        kind: impl Into<String>,
        allowed_types: impl IntoIterator<Item = impl Into<String>>,
        max_bytes: u64,
    ) -> Self {
        Self {
            kind: kind.into(),
            allowed_types: allowed_types.into_iter().map(Into::into).collect(),
            max_bytes,
        }
    }

    /// JPG, JPEG and PNG up to 5MB.
    pub fn images() -> Self {
        Self::new("Image", ["image/jpg", "image/jpeg", "image/png"], 5 * MIB)
    }

    /// MP4, WEBM and MOV up to 50MB.
    pub fn videos() -> Self {
        Self::new("Video", ["video/mp4", "video/webm", "video/quicktime"], 50 * MIB)
    }

    pub fn allows(&self, declared_type: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(declared_type.trim()))
    }

    /// Display names for the allow-list: `image/jpeg` becomes `JPEG`.
    pub fn display_types(&self) -> Vec<String> {
        self.allowed_types
            .iter()
            .map(|mime| match mime.rsplit_once('/') {
                Some((_, "quicktime")) => "MOV".to_string(),
                Some((_, subtype)) => subtype.to_ascii_uppercase(),
                None => mime.to_ascii_uppercase(),
            })
            .collect()
    }
}

/// A file picked by the user, not yet checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub original_name: String,
    pub declared_type: String,
    pub data: Bytes,
}

impl UploadCandidate {
    pub fn new(
        original_name: impl Into<String>,
        declared_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            declared_type: declared_type.into(),
            data: data.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A candidate that passed its policy and may be staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    candidate: UploadCandidate,
}

impl PendingUpload {
    pub fn original_name(&self) -> &str {
        &self.candidate.original_name
    }

    pub fn declared_type(&self) -> &str {
        &self.candidate.declared_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.candidate.size_bytes()
    }

    pub fn data(&self) -> &Bytes {
        &self.candidate.data
    }
}

/// Pure verdict for a candidate. The type is checked before the size.
pub fn check(candidate: &UploadCandidate, policy: &UploadPolicy) -> Result<(), UploadError> {
    check_descriptor(&candidate.declared_type, candidate.size_bytes(), policy)
}

/// Same verdict as [`check`], from the declared type and size alone.
pub fn check_descriptor(
    declared_type: &str,
    size_bytes: u64,
    policy: &UploadPolicy,
) -> Result<(), UploadError> {
    if !policy.allows(declared_type) {
        return Err(UploadError::UnsupportedType {
            allowed: policy.display_types(),
        });
    }
    if size_bytes > policy.max_bytes {
        return Err(UploadError::TooLarge {
            kind: policy.kind.clone(),
            max_bytes: policy.max_bytes,
        });
    }
    Ok(())
}

/// Accepts the candidate into a [`PendingUpload`] or says why it was rejected.
pub fn validate(
    candidate: UploadCandidate,
    policy: &UploadPolicy,
) -> Result<PendingUpload, UploadError> {
    check(&candidate, policy)?;
    Ok(PendingUpload { candidate })
}

/// The first policy whose allow-list contains `declared_type`.
pub fn select<'a>(policies: &'a [UploadPolicy], declared_type: &str) -> Option<&'a UploadPolicy> {
    policies.iter().find(|policy| policy.allows(declared_type))
}

/// Validates against whichever policy accepts the declared type.
///
/// A type no policy accepts is rejected with every accepted format listed.
pub fn validate_any(
    candidate: UploadCandidate,
    policies: &[UploadPolicy],
) -> Result<PendingUpload, UploadError> {
    match select(policies, &candidate.declared_type) {
        Some(policy) => validate(candidate, policy),
        None => Err(UploadError::UnsupportedType {
            allowed: policies.iter().flat_map(UploadPolicy::display_types).collect(),
        }),
    }
}
