use docchat_llm_api::DocumentExtractor;
use serde::Serialize;

use crate::error::IngestError;

/// Shorter extractions almost always mean a scanned or empty PDF
pub const MIN_EXTRACTED_CHARS: usize = 50;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Text pulled out of an uploaded PDF, ready to be used as chat context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub file_name: String,
    pub extracted_text: String,
    pub text_length: usize,
}

/// Validate an upload, hand it to `extractor` and check the text that comes back
pub async fn ingest_pdf(
    extractor: &dyn DocumentExtractor,
    file_name: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<ExtractedDocument, IngestError> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(IngestError::MissingFileName);
    }
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(IngestError::NotPdf(file_name.to_string()));
    }
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    if bytes.len() > max_bytes {
        return Err(IngestError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    tracing::info!(file = file_name, bytes = bytes.len(), "extracting text from PDF");
    let text = extractor.extract_text(PDF_MIME_TYPE, bytes).await?;
    let text = text.trim().to_string();

    let chars = text.chars().count();
    if chars < MIN_EXTRACTED_CHARS {
        tracing::warn!(file = file_name, chars, "extraction returned too little text");
        return Err(IngestError::InsufficientText { chars });
    }

    tracing::info!(file = file_name, chars, "PDF text extracted");
    Ok(ExtractedDocument {
        file_name: file_name.to_string(),
        extracted_text: text,
        text_length: chars,
    })
}
