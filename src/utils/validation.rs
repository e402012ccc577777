use std::path::Path;

use crate::models::DocumentType;

pub fn validate_document_type(document_type: &str) -> bool {
    DocumentType::from_label(document_type).is_some()
}

fn get_extension_from_filename(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn is_valid_document_extension(ext: &str) -> bool {
    matches!(ext, "pdf" | "jpg" | "jpeg" | "png")
}

/// A file reference must name a PDF or image upload.
pub fn validate_file_ref(file_ref: &str) -> bool {
    let file_ref = file_ref.trim();
    !file_ref.is_empty()
        && get_extension_from_filename(file_ref)
            .map(|ext| is_valid_document_extension(&ext))
            .unwrap_or(false)
}
