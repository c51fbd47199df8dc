//! Ticket attachment uploads.

use std::path::Path;

/// Largest accepted attachment, in bytes.
pub const ATTACHMENT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// File extensions accepted for attachments.
pub const ATTACHMENT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

/// Errors raised while validating an uploaded attachment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentValidationError {
    #[error("attachment must not be empty")]
    Empty,
    #[error("attachment exceeds {max} bytes")]
    TooLarge { max: usize },
    #[error("attachment must be one of jpg, jpeg, png, pdf")]
    UnsupportedType { file_name: String },
}

/// An uploaded file awaiting storage.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    extension: String,
    bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Validate an upload by its client-supplied file name and contents.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::AttachmentUpload;
    ///
    /// let upload = AttachmentUpload::new("Screenshot.PNG", vec![1, 2, 3]).expect("valid upload");
    /// assert_eq!(upload.extension(), "png");
    /// assert!(AttachmentUpload::new("notes.exe", vec![1]).is_err());
    /// ```
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Result<Self, AttachmentValidationError> {
        if bytes.is_empty() {
            return Err(AttachmentValidationError::Empty);
        }
        if bytes.len() > ATTACHMENT_MAX_BYTES {
            return Err(AttachmentValidationError::TooLarge {
                max: ATTACHMENT_MAX_BYTES,
            });
        }
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .filter(|ext| ATTACHMENT_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| AttachmentValidationError::UnsupportedType {
                file_name: file_name.to_owned(),
            })?;

        Ok(Self { extension, bytes })
    }

    /// Normalised lower-case extension without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.extension.as_str()
    }

    /// Raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

impl std::fmt::Debug for AttachmentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentUpload")
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.jpg", "jpg")]
    #[case("scan.JPEG", "jpeg")]
    #[case("form.pdf", "pdf")]
    fn accepts_known_extensions(#[case] name: &str, #[case] extension: &str) {
        let upload = AttachmentUpload::new(name, vec![0_u8; 16]).expect("accepted");
        assert_eq!(upload.extension(), extension);
    }

    #[rstest]
    #[case("script.sh")]
    #[case("no_extension")]
    #[case("archive.pdf.zip")]
    fn rejects_unknown_extensions(#[case] name: &str) {
        assert!(matches!(
            AttachmentUpload::new(name, vec![1]),
            Err(AttachmentValidationError::UnsupportedType { .. })
        ));
    }

    #[rstest]
    fn rejects_empty_and_oversized_files() {
        assert_eq!(
            AttachmentUpload::new("a.png", Vec::new()),
            Err(AttachmentValidationError::Empty)
        );
        assert_eq!(
            AttachmentUpload::new("a.png", vec![0_u8; ATTACHMENT_MAX_BYTES + 1]),
            Err(AttachmentValidationError::TooLarge {
                max: ATTACHMENT_MAX_BYTES
            })
        );
    }
}
