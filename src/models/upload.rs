use bytes::Bytes;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Syllabus,
    Pyqs,
}

impl UploadCategory {
    /// Directory under the upload root, also the multipart field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Syllabus => "syllabus",
            UploadCategory::Pyqs => "pyqs",
        }
    }

    pub fn accepts_many(&self) -> bool {
        matches!(self, UploadCategory::Pyqs)
    }

    pub fn missing_message(&self) -> &'static str {
        match self {
            UploadCategory::Syllabus => "No syllabus file",
            UploadCategory::Pyqs => "No PYQ files",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            UploadCategory::Syllabus => "Syllabus uploaded successfully",
            UploadCategory::Pyqs => "PYQs uploaded successfully",
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Bytes,
    pub category: UploadCategory,
}
