use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::ScreeningError;

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Extension of `filename` used as its format tag; "" when there is none.
pub fn file_extension(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

impl FromStr for DocumentFormat {
    type Err = ScreeningError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ScreeningError::UnsupportedFormat(tag.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw uploaded document. Immutable; consumed once by text extraction.
#[derive(Debug, Clone)]
pub struct Document {
    content: Bytes,
    format: DocumentFormat,
}

impl Document {
    pub fn new(content: impl Into<Bytes>, format: DocumentFormat) -> Self {
        Self {
            content: content.into(),
            format,
        }
    }

    /// Builds a document from a caller-declared format tag, rejecting unknown tags.
    pub fn from_tag(content: impl Into<Bytes>, tag: &str) -> Result<Self, ScreeningError> {
        let format = tag.parse()?;
        Ok(Self::new(content, format))
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn into_parts(self) -> (Bytes, DocumentFormat) {
        (self.content, self.format)
    }
}

/// Normalized plain-text rendition of a `Document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText(String);

impl PlainText {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
