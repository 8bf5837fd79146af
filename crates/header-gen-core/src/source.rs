// crates/header-gen-core/src/source.rs
// ============================================================================
// Module: Header Source Loading
// Description: Bounded header file reads with Latin-1 decoding.
// Purpose: Turn a header path into a named header model.
// Dependencies: crate::parser, crate::error
// ============================================================================

//! ## Overview
//! Headers are read as raw bytes under a hard size limit and decoded as
//! ISO-8859-1, so every byte maps to one character and no input is rejected
//! for its encoding. The resulting model is named after the file name.
//!
//! Security posture: header files are untrusted; reads never allocate more
//! than the configured limit plus one byte.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::HeaderError;
use crate::model::HeaderFileModel;
use crate::parser::ParseOptions;
use crate::parser::parse_unbounded;

// ============================================================================
// SECTION: File Parsing
// ============================================================================

/// Reads and parses a header file.
///
/// # Errors
///
/// Returns [`HeaderError::Io`] when the file cannot be read,
/// [`HeaderError::TooLarge`] when it exceeds `options.max_input_bytes`, and
/// [`HeaderError::Parse`] when its contents cannot be parsed.
pub fn parse_header_file(
    path: &Path,
    options: &ParseOptions,
) -> Result<HeaderFileModel, HeaderError> {
    let bytes = read_header_bytes(path, options.max_input_bytes)?;
    let text = decode_latin1(&bytes);
    let mut model = parse_unbounded(&text, options).map_err(|source| HeaderError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    model.name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Ok(model)
}

/// Decodes ISO-8859-1 bytes.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

/// Reads a header with a size limit to avoid memory exhaustion.
fn read_header_bytes(path: &Path, max_bytes: usize) -> Result<Vec<u8>, HeaderError> {
    let too_large = || HeaderError::TooLarge {
        path: path.display().to_string(),
        max_bytes,
    };
    let limit = u64::try_from(max_bytes).map_err(|_| too_large())?;
    let file = fs::File::open(path).map_err(|err| HeaderError::Io(err.to_string()))?;
    let metadata = file.metadata().map_err(|err| HeaderError::Io(err.to_string()))?;
    if metadata.len() > limit {
        return Err(too_large());
    }
    let mut bytes = Vec::new();
    let mut limited = file.take(limit + 1);
    limited.read_to_end(&mut bytes).map_err(|err| HeaderError::Io(err.to_string()))?;
    if bytes.len() > max_bytes {
        return Err(too_large());
    }
    Ok(bytes)
}
