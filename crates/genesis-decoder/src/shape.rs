use crate::error::ShapeError;

/// Outer shape of a decoded genesis document.
///
/// This is a payload integrity check, not a schema check: it confirms
/// the bytes are UTF-8 and bracketed by a JSON object, nothing more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentShape {
    /// Total document length in bytes.
    pub len: usize,
    /// Length once leading and trailing ASCII whitespace is removed.
    pub trimmed_len: usize,
}

/// Check that `document` is UTF-8 and looks like a JSON object.
///
/// # Errors
///
/// - [`ShapeError::Empty`] if nothing but whitespace is present.
/// - [`ShapeError::InvalidUtf8`] if the bytes are not UTF-8.
/// - [`ShapeError::MissingOpenBrace`] / [`ShapeError::MissingCloseBrace`]
///   if the first or last non-whitespace character is not a brace.
pub fn check_shape(document: &[u8]) -> Result<DocumentShape, ShapeError> {
    let text = std::str::from_utf8(document).map_err(|e| ShapeError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    let trimmed = text.trim_ascii();

    let (Some(first), Some(last)) = (trimmed.chars().next(), trimmed.chars().next_back()) else {
        return Err(ShapeError::Empty);
    };
    if first != '{' {
        return Err(ShapeError::MissingOpenBrace { found: first });
    }
    // A lone "{" satisfies both ends; it is still not an object.
    if last != '}' || trimmed.len() < 2 {
        return Err(ShapeError::MissingCloseBrace { found: last });
    }

    Ok(DocumentShape {
        len: document.len(),
        trimmed_len: trimmed.len(),
    })
}
