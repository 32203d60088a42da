//! Object-name derivation: path-segment extraction, the PDF filter, and the
//! `.pdf` → `.txt` output-name rewrite.

/// Extract the object name from a slash-delimited resource name.
///
/// Edge cases are explicit: a name with no `/` is returned whole; a trailing
/// `/` yields an empty name (which the PDF filter then skips); an empty
/// input stays empty.
pub fn object_name_from_resource(resource_name: &str) -> &str {
    match resource_name.rsplit_once('/') {
        Some((_, name)) => name,
        None => resource_name,
    }
}

/// Whether the object name passes the PDF filter (case-insensitive suffix).
pub fn is_pdf_object(object_name: &str) -> bool {
    has_pdf_suffix(object_name)
}

/// Derive the output object name by rewriting the trailing `.pdf` to `.txt`.
///
/// Only the trailing suffix is rewritten, case-insensitively; interior
/// occurrences of `.pdf` are untouched. Names without the suffix are
/// returned unchanged (unreachable behind the filter, but defined).
pub fn output_object_name(object_name: &str) -> String {
    if has_pdf_suffix(object_name) {
        let stem = &object_name[..object_name.len() - ".pdf".len()];
        format!("{stem}.txt")
    } else {
        object_name.to_string()
    }
}

fn has_pdf_suffix(object_name: &str) -> bool {
    // Byte-wise comparison: names may end in non-ASCII and must not panic
    // on a char boundary.
    let bytes = object_name.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".pdf")
}
