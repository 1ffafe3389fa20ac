//! File encoding - turns uploaded files into transport-ready inline parts
//!
//! Files are read and base64-encoded concurrently. Encodings share no
//! state; the batch waits for all of them and fails as soon as one fails.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use base64::{engine::general_purpose::STANDARD, Engine};
use futures::future::try_join_all;
use gleaner_domain::MediaPart;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media type prefixes accepted for upload
const ACCEPTED_PREFIXES: &[&str] = &["image/", "audio/"];

/// Exact media types accepted for upload
const ACCEPTED_TYPES: &[&str] = &["application/pdf", "text/plain", "text/csv"];

/// Whether a media type is accepted for extraction
pub fn is_supported_media_type(media_type: &str) -> bool {
    let media_type = media_type.to_ascii_lowercase();
    ACCEPTED_PREFIXES.iter().any(|p| media_type.starts_with(p))
        || ACCEPTED_TYPES.contains(&media_type.as_str())
}

/// Where a file's bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    /// A file on disk, read at encoding time
    Path(PathBuf),
    /// A `data:<mime>;base64,<payload>` string
    DataUri(String),
    /// Bytes already in memory
    Bytes(Vec<u8>),
}

/// An uploaded file awaiting encoding
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Display name, sent to the model so it can cite sources
    pub name: String,

    /// Declared media type; guessed from the name when absent
    pub media_type: Option<String>,

    /// File content
    pub content: FileContent,
}

impl SourceFile {
    /// A file on disk, named after its final path component
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            media_type: None,
            content: FileContent::Path(path),
        }
    }

    /// A file supplied as a data URI; the media type comes from its header
    pub fn from_data_uri(name: impl Into<String>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let media_type = split_data_uri(&uri).and_then(|header| header.media_type);
        Self {
            name: name.into(),
            media_type,
            content: FileContent::DataUri(uri),
        }
    }

    /// A file already held in memory
    pub fn from_bytes(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: Some(media_type.into()),
            content: FileContent::Bytes(bytes),
        }
    }

    /// Declared media type, or one guessed from the file name
    pub fn resolved_media_type(&self) -> String {
        match &self.media_type {
            Some(declared) => declared.clone(),
            None => mime_guess::from_path(Path::new(&self.name))
                .first_or_octet_stream()
                .to_string(),
        }
    }

    /// Reject files outside the accepted media types
    pub fn check_supported(&self) -> Result<(), ExtractorError> {
        let media_type = self.resolved_media_type();
        if is_supported_media_type(&media_type) {
            Ok(())
        } else {
            Err(ExtractorError::UnsupportedMediaType {
                name: self.name.clone(),
                media_type,
            })
        }
    }
}

/// A file re-encoded for transport
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFile {
    /// Display name
    pub name: String,

    /// Decoded size in bytes
    pub size: usize,

    /// Base64 payload and media type
    pub part: MediaPart,
}

/// Parsed header of a data URI
#[derive(Debug, PartialEq)]
struct DataUriHeader<'a> {
    media_type: Option<String>,
    base64: bool,
    payload: &'a str,
}

/// Split a `data:` URI into its header and payload
fn split_data_uri(input: &str) -> Option<DataUriHeader<'_>> {
    let rest = input.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;

    let mut params = meta.split(';');
    let media_type = params
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    Some(DataUriHeader {
        media_type,
        base64,
        payload,
    })
}

/// Strip a data-URI envelope, returning the bare payload
///
/// Input without a `data:` header is returned unchanged.
///
/// # Examples
///
/// ```
/// use gleaner_extractor::strip_data_uri;
///
/// assert_eq!(strip_data_uri("data:image/png;base64,iVBORw0KGgo="), "iVBORw0KGgo=");
/// assert_eq!(strip_data_uri("iVBORw0KGgo="), "iVBORw0KGgo=");
/// ```
pub fn strip_data_uri(input: &str) -> &str {
    match split_data_uri(input) {
        Some(header) => header.payload,
        None => input.trim(),
    }
}

/// Encode one file
pub async fn encode_file(
    file: &SourceFile,
    config: &ExtractorConfig,
) -> Result<EncodedFile, ExtractorError> {
    let read_error = |reason: String| ExtractorError::FileRead {
        name: file.name.clone(),
        reason,
    };

    let too_large = |size: usize| ExtractorError::FileTooLarge {
        name: file.name.clone(),
        size,
        max: config.max_file_size,
    };

    let (size, data) = match &file.content {
        FileContent::Path(path) => {
            let on_disk = tokio::fs::metadata(path)
                .await
                .map_err(|e| read_error(e.to_string()))?
                .len();
            let on_disk = usize::try_from(on_disk).unwrap_or(usize::MAX);
            if on_disk > config.max_file_size {
                return Err(too_large(on_disk));
            }
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| read_error(e.to_string()))?;
            (bytes.len(), STANDARD.encode(&bytes))
        }
        FileContent::Bytes(bytes) => (bytes.len(), STANDARD.encode(bytes)),
        FileContent::DataUri(uri) => {
            let header = split_data_uri(uri)
                .ok_or_else(|| read_error("not a data URI".to_string()))?;
            if header.base64 {
                let payload: String = header.payload.split_whitespace().collect();
                let decoded = STANDARD
                    .decode(payload.as_bytes())
                    .map_err(|e| read_error(format!("invalid base64 payload: {}", e)))?;
                (decoded.len(), payload)
            } else {
                let bytes = header.payload.as_bytes();
                (bytes.len(), STANDARD.encode(bytes))
            }
        }
    };

    if size > config.max_file_size {
        return Err(too_large(size));
    }

    let mime_type = file.resolved_media_type();
    debug!(file = %file.name, %mime_type, size, "Encoded file");

    Ok(EncodedFile {
        name: file.name.clone(),
        size,
        part: MediaPart { mime_type, data },
    })
}

/// Encode all files concurrently, preserving input order
///
/// Fails with the first error encountered; no partial batch is returned.
pub async fn encode_all(
    files: &[SourceFile],
    config: &ExtractorConfig,
) -> Result<Vec<EncodedFile>, ExtractorError> {
    let encoded = try_join_all(files.iter().map(|f| encode_file(f, config))).await?;

    let total: usize = encoded.iter().map(|e| e.size).sum();
    if total > config.max_total_size {
        return Err(ExtractorError::BatchTooLarge(total, config.max_total_size));
    }

    Ok(encoded)
}
