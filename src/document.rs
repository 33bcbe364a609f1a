//! The document record produced by a successful upload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One processed upload. Created once per successful request; never updated.
///
/// The same record is written to every participating store — MongoDB takes
/// it whole, PostgreSQL flattens the lists to JSON text, Elasticsearch
/// indexes the searchable subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Sanitised filename the upload was stored under.
    pub filename: String,
    /// Filename exactly as the client sent it.
    pub original_filename: String,
    /// Where the raw upload lives on disk.
    pub file_path: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: u64,
    pub pages: usize,
    /// Always "processed" on the success path.
    pub status: String,
    /// Concatenated page text with `--- PAGE N ---` delimiters.
    pub extracted_text: String,
    /// Always empty — kept for schema stability across stores.
    pub entities: Vec<String>,
    /// At most 20 deduplicated lowercase tokens.
    pub keywords: Vec<String>,
}

impl DocumentRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filename: String,
        original_filename: String,
        file_path: String,
        file_size: u64,
        pages: usize,
        extracted_text: String,
        entities: Vec<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            filename,
            original_filename,
            file_path,
            upload_date: Utc::now(),
            file_size,
            pages,
            status: "processed".to_string(),
            extracted_text,
            entities,
            keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_marked_processed() {
        let r = DocumentRecord::new(
            "scan.pdf".into(),
            "scan.pdf".into(),
            "uploads/scan.pdf".into(),
            1024,
            2,
            "--- PAGE 1 ---\nhello\n\n".into(),
            vec![],
            vec!["hello".into()],
        );
        assert_eq!(r.status, "processed");
        assert_eq!(r.pages, 2);
        assert!(r.entities.is_empty());
    }
}
