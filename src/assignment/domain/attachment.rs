//! Attachment references with a fixed extension allow-list.
//!
//! The tracker stores only a reference to the uploaded document; raw bytes
//! live with the external file-storage collaborator.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions accepted for task attachments.
const ALLOWED_EXTENSIONS: [&str; 6] = ["doc", "docx", "pdf", "jpg", "jpeg", "png"];

/// Validated reference to a stored attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentRef(String);

impl AttachmentRef {
    /// Creates a validated attachment reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UnsupportedAttachmentExtension`] when the
    /// path has no extension or one outside the allow-list.
    pub fn new(path: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = path.into();
        let trimmed = raw.trim();
        let extension = trimmed
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let is_allowed =
            !extension.is_empty() && ALLOWED_EXTENSIONS.contains(&extension.as_str());
        if !is_allowed {
            return Err(TaskDomainError::UnsupportedAttachmentExtension(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the stored path reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AttachmentRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AttachmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
