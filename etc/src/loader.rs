// SPDX-License-Identifier: MPL-2.0

//! Resolving, reading and decoding descriptor files, following `<Include>`s.

use std::{collections::HashSet, fs};

use tracing::debug;

use crate::{
    decoder::{DecoderRegistry, global_registry},
    descriptor::Descriptor,
    error::{Error, Result},
    resolve::resolve,
    search_dirs::SearchDirs,
};

/// Loads descriptor files by name through a set of search directories.
#[derive(Debug, Clone)]
#[must_use]
pub struct Loader {
    search_dirs: SearchDirs,
    registry: DecoderRegistry,
}

impl Loader {
    /// A loader using `search_dirs` and a snapshot of the process-wide
    /// decoder registry.
    pub fn new(search_dirs: SearchDirs) -> Self {
        Self {
            search_dirs,
            registry: global_registry(),
        }
    }

    /// Replaces the decoder registry.
    pub fn with_registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn search_dirs(&self) -> &SearchDirs {
        &self.search_dirs
    }

    /// Resolves and decodes one file. Its includes are not followed.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], [`Error::Read`] or any decode error from the
    /// registry.
    pub fn load(&self, file_name: &str) -> Result<Box<dyn Descriptor>> {
        let path = resolve(file_name, &self.search_dirs)?;
        let data = fs::read(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = data.len(), "read descriptor");
        self.registry.decode(&data)
    }

    /// Loads `file_name` and everything it includes, transitively.
    ///
    /// Descriptors come back in pre-order: a file before its includes, the
    /// includes in document order. A path string seen before is skipped, so
    /// include cycles terminate. Paths are compared as written, not
    /// canonicalized, which means two spellings of the same file are both
    /// loaded.
    ///
    /// # Errors
    ///
    /// The first file in the tree that cannot be resolved, read or decoded
    /// fails the whole call. The error names every file on the include chain
    /// down to it.
    pub fn load_recursive(&self, file_name: &str) -> Result<Vec<Box<dyn Descriptor>>> {
        let mut visited = HashSet::new();
        let mut descriptors = Vec::new();
        self.load_into(file_name, &mut visited, &mut descriptors)?;
        Ok(descriptors)
    }

    fn load_into(
        &self,
        path: &str,
        visited: &mut HashSet<String>,
        descriptors: &mut Vec<Box<dyn Descriptor>>,
    ) -> Result<()> {
        if !visited.insert(path.to_owned()) {
            debug!(path, "already loaded, skipping");
            return Ok(());
        }

        let descriptor = self.load(path).map_err(|source| Error::Load {
            path: path.to_owned(),
            source: Box::new(source),
        })?;

        let hrefs: Vec<String> = descriptor
            .includes()
            .iter()
            .map(|include| include.href.clone())
            .collect();
        descriptors.push(descriptor);

        for href in hrefs {
            debug!(parent = path, href, "following include");
            if let Err(source) = self.load_into(&href, visited, descriptors) {
                return Err(Error::Load {
                    path: path.to_owned(),
                    source: Box::new(Error::Include {
                        href,
                        source: Box::new(source),
                    }),
                });
            }
        }

        Ok(())
    }
}

impl Default for Loader {
    /// The stock Android directories and the process-wide registry.
    fn default() -> Self {
        Self::new(SearchDirs::default())
    }
}

/// Resolves and decodes `file_name` with the process-wide registry.
///
/// An empty `search_dirs` means the stock Android directories.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn parse_file(file_name: &str, search_dirs: &SearchDirs) -> Result<Box<dyn Descriptor>> {
    Loader::new(search_dirs.clone()).load(file_name)
}

/// Loads `file_name` and its includes with the process-wide registry.
///
/// # Errors
///
/// See [`Loader::load_recursive`].
pub fn parse_file_recursively(
    file_name: &str,
    search_dirs: &SearchDirs,
) -> Result<Vec<Box<dyn Descriptor>>> {
    Loader::new(search_dirs.clone()).load_recursive(file_name)
}
