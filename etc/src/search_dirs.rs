// SPDX-License-Identifier: MPL-2.0

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directories checked for descriptor files on a stock Android image,
/// highest priority first.
pub const DEFAULT_SEARCH_DIRS: &[&str] = &[
    "/vendor/etc",
    "/odm/etc",
    "/system/etc",
    "/product/etc",
    "/apex/com.android.media.swcodec/etc",
    "/system/apex/com.android.media.swcodec/etc",
];

/// Ordered list of directories used to resolve bare descriptor file names.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
#[must_use]
pub struct SearchDirs(Vec<PathBuf>);

impl SearchDirs {
    /// An explicit list. Resolution treats an empty list as [`SearchDirs::fallback`].
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(dirs.into_iter().map(Into::into).collect())
    }

    /// The stock Android directory list.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_SEARCH_DIRS.iter().copied())
    }

    /// Appends a directory with the lowest priority so far.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.0.push(dir.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    /// `self`, or the stock list when `self` is empty.
    pub(crate) fn or_fallback(&self) -> std::borrow::Cow<'_, SearchDirs> {
        if self.is_empty() {
            std::borrow::Cow::Owned(Self::fallback())
        } else {
            std::borrow::Cow::Borrowed(self)
        }
    }
}

impl Default for SearchDirs {
    fn default() -> Self {
        Self::fallback()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchDirs {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let dirs: Vec<_> = SearchDirs::default()
            .iter()
            .map(|dir| dir.to_string_lossy().into_owned())
            .collect();
        assert_eq!(dirs, DEFAULT_SEARCH_DIRS);
    }

    #[test]
    fn test_empty_falls_back() {
        let empty = SearchDirs::new(Vec::<PathBuf>::new());
        assert!(empty.is_empty());
        assert_eq!(*empty.or_fallback(), SearchDirs::fallback());

        let custom = SearchDirs::new(["/tmp/a"]).with_dir("/tmp/b");
        assert_eq!(custom.or_fallback().as_slice().len(), 2);
    }
}
