//! Input form state and submission validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Url,
    Text,
    Image,
}

impl SubmissionKind {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionKind::Url => "URL",
            SubmissionKind::Text => "Text",
            SubmissionKind::Image => "Image",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmissionKind::Url => "url",
            SubmissionKind::Text => "text",
            SubmissionKind::Image => "image",
        })
    }
}

/// An image picked by the user, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A validated request for the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Url {
        url: String,
        max_pages: u32,
        scan_depth: u32,
    },
    Image(ImageUpload),
    Text {
        text: String,
    },
}

impl Submission {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Submission::Url { .. } => SubmissionKind::Url,
            Submission::Image(_) => SubmissionKind::Image,
            Submission::Text { .. } => SubmissionKind::Text,
        }
    }

    /// Check kind-specific preconditions. Runs before anything reaches the network.
    pub fn validate(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        match self {
            Submission::Url {
                url,
                max_pages,
                scan_depth,
            } => {
                let trimmed = url.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyUrl);
                }
                let parsed =
                    Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ValidationError::UnsupportedScheme(parsed.scheme().to_string()));
                }
                if *max_pages == 0 || *max_pages > config.max_pages_limit {
                    return Err(ValidationError::MaxPagesOutOfRange {
                        value: *max_pages,
                        max: config.max_pages_limit,
                    });
                }
                if *scan_depth == 0 || *scan_depth > config.max_scan_depth {
                    return Err(ValidationError::ScanDepthOutOfRange {
                        value: *scan_depth,
                        max: config.max_scan_depth,
                    });
                }
                Ok(())
            }
            Submission::Image(upload) => {
                if upload.bytes.is_empty() {
                    return Err(ValidationError::NoImage);
                }
                if upload.bytes.len() > config.max_upload_bytes {
                    return Err(ValidationError::ImageTooLarge {
                        size: upload.bytes.len(),
                        max: config.max_upload_bytes,
                    });
                }
                Ok(())
            }
            Submission::Text { text } => {
                if text.trim().is_empty() {
                    return Err(ValidationError::EmptyText);
                }
                let len = text.chars().count();
                if len > config.max_text_chars {
                    return Err(ValidationError::TextTooLong {
                        len,
                        max: config.max_text_chars,
                    });
                }
                Ok(())
            }
        }
    }

    /// Human-readable form of the submission for logs.
    pub fn describe(&self) -> String {
        match self {
            Submission::Url {
                url,
                max_pages,
                scan_depth,
            } => format!("url {} (pages={}, depth={})", url, max_pages, scan_depth),
            Submission::Image(upload) => {
                format!("image {} ({} bytes)", upload.file_name, upload.bytes.len())
            }
            Submission::Text { text } => format!("text ({} chars)", text.chars().count()),
        }
    }
}

/// Everything the input section holds between submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputForm {
    pub kind: SubmissionKind,
    pub url: String,
    pub max_pages: u32,
    pub scan_depth: u32,
    pub text: String,
    pub image: Option<ImageUpload>,
}

impl InputForm {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            kind: SubmissionKind::Url,
            url: String::new(),
            max_pages: config.default_max_pages,
            scan_depth: config.default_scan_depth,
            text: String::new(),
            image: None,
        }
    }

    /// Reset every field, keeping the selected input tab.
    pub fn clear(&mut self, config: &ClientConfig) {
        let kind = self.kind;
        *self = Self::new(config);
        self.kind = kind;
    }

    /// Build a submission for `kind` from the current field values.
    pub fn to_submission(&self, kind: SubmissionKind) -> Result<Submission, ValidationError> {
        match kind {
            SubmissionKind::Url => Ok(Submission::Url {
                url: self.url.trim().to_string(),
                max_pages: self.max_pages,
                scan_depth: self.scan_depth,
            }),
            SubmissionKind::Text => Ok(Submission::Text {
                text: self.text.clone(),
            }),
            SubmissionKind::Image => self
                .image
                .clone()
                .map(Submission::Image)
                .ok_or(ValidationError::NoImage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    fn url(u: &str) -> Submission {
        Submission::Url {
            url: u.into(),
            max_pages: 5,
            scan_depth: 2,
        }
    }

    #[test]
    fn test_url_validation() {
        let cfg = config();
        assert_eq!(url("  ").validate(&cfg), Err(ValidationError::EmptyUrl));
        assert!(matches!(
            url("not a url").validate(&cfg),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert_eq!(
            url("ftp://example.com").validate(&cfg),
            Err(ValidationError::UnsupportedScheme("ftp".into()))
        );
        assert!(url("https://example.com").validate(&cfg).is_ok());
    }

    #[test]
    fn test_crawl_bounds() {
        let cfg = config();
        let too_many = Submission::Url {
            url: "https://example.com".into(),
            max_pages: 21,
            scan_depth: 2,
        };
        assert_eq!(
            too_many.validate(&cfg),
            Err(ValidationError::MaxPagesOutOfRange { value: 21, max: 20 })
        );
        let too_deep = Submission::Url {
            url: "https://example.com".into(),
            max_pages: 5,
            scan_depth: 0,
        };
        assert!(matches!(
            too_deep.validate(&cfg),
            Err(ValidationError::ScanDepthOutOfRange { .. })
        ));
    }

    #[test]
    fn test_text_validation() {
        let cfg = config();
        let blank = Submission::Text { text: " \n ".into() };
        assert_eq!(blank.validate(&cfg), Err(ValidationError::EmptyText));
        let long = Submission::Text {
            text: "a".repeat(cfg.max_text_chars + 1),
        };
        assert!(matches!(long.validate(&cfg), Err(ValidationError::TextTooLong { .. })));
        let ok = Submission::Text {
            text: "Click here".into(),
        };
        assert!(ok.validate(&cfg).is_ok());
    }

    #[test]
    fn test_image_validation() {
        let cfg = config();
        let empty = Submission::Image(ImageUpload {
            file_name: "a.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![],
        });
        assert_eq!(empty.validate(&cfg), Err(ValidationError::NoImage));
    }

    #[test]
    fn test_form_without_image_is_invalid() {
        let form = InputForm::new(&config());
        assert_eq!(
            form.to_submission(SubmissionKind::Image),
            Err(ValidationError::NoImage)
        );
    }

    #[test]
    fn test_clear_restores_defaults_and_keeps_tab() {
        let cfg = config();
        let mut form = InputForm::new(&cfg);
        form.kind = SubmissionKind::Text;
        form.text = "hello".into();
        form.url = "https://example.com".into();
        form.max_pages = 9;
        form.clear(&cfg);
        assert_eq!(form.kind, SubmissionKind::Text);
        assert!(form.text.is_empty());
        assert!(form.url.is_empty());
        assert_eq!(form.max_pages, cfg.default_max_pages);
    }
}
