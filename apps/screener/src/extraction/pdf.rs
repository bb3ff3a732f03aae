use crate::errors::ScreeningError;

/// Text of every page, in page order. Pages without a text layer yield "".
pub fn page_texts(content: &[u8]) -> Result<Vec<String>, ScreeningError> {
    pdf_extract::extract_text_from_mem_by_pages(content)
        .map_err(|e| ScreeningError::extraction(format!("PDF parse error: {e}")))
}
