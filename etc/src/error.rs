// SPDX-License-Identifier: MPL-2.0

//! Error types for descriptor resolution, loading and decoding.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure to turn a byte buffer into a typed descriptor.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("descriptor is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected element type <{expected}> but have <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    /// The file exists neither verbatim nor under any search directory.
    #[error("file {file_name} not found in search dirs: {}", join_dirs(.search_dirs))]
    NotFound {
        file_name: String,
        search_dirs: Vec<PathBuf>,
    },
    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The root element could not be identified.
    #[error("unmarshaling root name: {0}")]
    Malformed(#[source] DecodeError),
    #[error("unexpected root <{0}>")]
    UnsupportedRoot(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("parsing {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: Box<Error>,
    },
    #[error("parsing included {href}: {source}")]
    Include {
        href: String,
        #[source]
        source: Box<Error>,
    },
    #[error("parsing {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Walks through the `Load`, `Include` and `Scan` context wrappers and
    /// returns the error that actually stopped the operation.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        loop {
            match current {
                Error::Load { source, .. }
                | Error::Include { source, .. }
                | Error::Scan { source, .. } => current = &**source,
                _ => return current,
            }
        }
    }

    /// The chain of files being loaded when the error occurred, outermost first.
    #[must_use]
    pub fn load_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        loop {
            match current {
                Error::Load { path, source } => {
                    chain.push(path.as_str());
                    current = &**source;
                }
                Error::Include { source, .. } | Error::Scan { source, .. } => current = &**source,
                _ => return chain,
            }
        }
    }
}

fn join_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
