//! Candidate file enumeration and loading.
//!
//! # Enumeration
//!
//! Every search directory is crossed with a fixed catalogue of file names:
//! each root in [`FILENAME_ROOTS`] with each extension in
//! [`FILENAME_EXTENSIONS`] (the empty extension meaning a bare name), and each
//! of those both as-is and as a hidden dotfile. Caller-supplied files go first.
//! Only paths that exist and are regular files survive the filter.
//!
//! The order of the result is the merge order: explicit files, then
//! directory-major, root-major, extension-minor, plain before hidden.
//!
//! # Loading
//!
//! [`load_config_files`] reads every candidate and decodes it with its paired
//! encoding. A file that vanished or became unreadable since enumeration is an
//! error, not a skip: enumeration already proved it existed.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::ConnfigError;
use crate::types::{CandidateFile, ExplicitFile, SearchDirectories};

/// Conventional config file names, without extension.
pub const FILENAME_ROOTS: &[&str] = &[
    "cfg",
    "cfgs",
    "config",
    "configs",
    "configure",
    "connect",
    "connection",
    "connections",
    "database",
    "databases",
    "db",
    "dbs",
    "server",
    "servers",
    "setup",
];

/// Conventional extensions. The empty string stands for "no extension".
pub const FILENAME_EXTENSIONS: &[&str] = &["cfg", "txt", "ini", ""];

/// The encoding used when the caller doesn't name one.
pub fn system_encoding() -> &'static Encoding {
    encoding_rs::UTF_8
}

/// Look up an encoding by WHATWG label (`"utf-8"`, `"latin1"`, `"utf-16le"`, ...).
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, ConnfigError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConnfigError::UnknownEncoding(label.to_string()))
}

/// Every conventional file name, in search order.
pub fn candidate_filenames() -> Vec<String> {
    let mut out = Vec::with_capacity(FILENAME_ROOTS.len() * FILENAME_EXTENSIONS.len() * 2);
    for root in FILENAME_ROOTS {
        for extension in FILENAME_EXTENSIONS {
            let name = if extension.is_empty() {
                (*root).to_string()
            } else {
                format!("{root}.{extension}")
            };
            let hidden = format!(".{name}");
            out.push(name);
            out.push(hidden);
        }
    }
    out
}

/// Build the full, unfiltered candidate list.
pub fn possible_files(
    dirs: &SearchDirectories,
    explicit: &[ExplicitFile],
    default_encoding: &'static Encoding,
) -> Result<Vec<CandidateFile>, ConnfigError> {
    let mut out = Vec::new();
    for file in explicit {
        out.push(match file {
            ExplicitFile::Path(path) => CandidateFile::new(path.clone(), default_encoding),
            ExplicitFile::Encoded { path, encoding } => {
                CandidateFile::new(path.clone(), resolve_encoding(encoding)?)
            }
        });
    }

    let names = candidate_filenames();
    for dir in dirs.iter() {
        for name in &names {
            out.push(CandidateFile::new(dir.join(name), default_encoding));
        }
    }
    Ok(out)
}

/// The candidate files that exist on disk, in merge order.
///
/// Fails only when an explicit file names an unknown encoding.
pub fn enumerate(
    dirs: &SearchDirectories,
    explicit: &[ExplicitFile],
    default_encoding: &'static Encoding,
) -> Result<Vec<CandidateFile>, ConnfigError> {
    let found: Vec<CandidateFile> = possible_files(dirs, explicit, default_encoding)?
        .into_iter()
        .filter(|candidate| candidate.path.is_file())
        .collect();
    for candidate in &found {
        debug!(
            path = %candidate.path.display(),
            encoding = candidate.encoding.name(),
            "found config file"
        );
    }
    Ok(found)
}

/// Read and decode every candidate, keeping the given order.
pub fn load_config_files(files: &[CandidateFile]) -> Result<Vec<(PathBuf, String)>, ConnfigError> {
    files
        .iter()
        .map(|file| Ok((file.path.clone(), read_candidate(file)?)))
        .collect()
}

/// Read one candidate and decode it with its paired encoding.
///
/// A byte-order mark matching the encoding is stripped. Malformed byte
/// sequences are an error rather than being replaced.
pub fn read_candidate(file: &CandidateFile) -> Result<String, ConnfigError> {
    let bytes = std::fs::read(&file.path).map_err(|e| ConnfigError::IoError {
        path: file.path.clone(),
        source: e,
    })?;
    decode(&bytes, file.encoding, &file.path)
}

fn decode(bytes: &[u8], encoding: &'static Encoding, path: &Path) -> Result<String, ConnfigError> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(ConnfigError::DecodeError {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}
