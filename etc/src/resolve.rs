// SPDX-License-Identifier: MPL-2.0

//! Locating descriptor files across the prioritized search directories.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    search_dirs::SearchDirs,
};

/// Returns the path of `file_name`.
///
/// A `file_name` that already names an existing file is returned unchanged.
/// Otherwise each search directory is tried in order and the first
/// `dir/file_name` that is a regular file wins. An empty `search_dirs` means
/// the stock Android list.
///
/// # Errors
///
/// [`Error::NotFound`] listing every searched directory.
pub fn resolve(file_name: &str, search_dirs: &SearchDirs) -> Result<PathBuf> {
    let literal = Path::new(file_name);
    if is_file(literal) {
        debug!(file_name, "resolved verbatim");
        return Ok(literal.to_path_buf());
    }

    let search_dirs = search_dirs.or_fallback();
    for dir in search_dirs.iter() {
        let candidate = join(dir, literal);
        if is_file(&candidate) {
            debug!(file_name, path = %candidate.display(), "resolved in search dir");
            return Ok(candidate);
        }
    }

    debug!(file_name, "not found in any search dir");
    Err(Error::NotFound {
        file_name: file_name.to_owned(),
        search_dirs: search_dirs.as_slice().to_vec(),
    })
}

/// Directories do not count as a match.
fn is_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| !meta.is_dir())
}

/// Appends `file_name` below `dir` even when it is absolute.
fn join(dir: &Path, file_name: &Path) -> PathBuf {
    let relative: PathBuf = file_name
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
        .collect();
    dir.join(relative)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_literal_path_wins() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("media_codecs.xml");
        fs::write(&file, "<MediaCodecs />").unwrap();
        let file_name = file.to_str().unwrap();

        let other = tempdir().unwrap();
        fs::write(other.path().join("media_codecs.xml"), "<MediaCodecs />").unwrap();

        for dirs in [
            SearchDirs::new(Vec::<PathBuf>::new()),
            SearchDirs::new([other.path()]),
        ] {
            assert_eq!(resolve(file_name, &dirs).unwrap(), file);
        }
    }

    #[test]
    fn test_first_search_dir_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let third = tempdir().unwrap();
        fs::write(second.path().join("codecs_test.xml"), "").unwrap();
        fs::write(third.path().join("codecs_test.xml"), "").unwrap();

        let dirs = SearchDirs::new([first.path(), second.path(), third.path()]);
        assert_eq!(
            resolve("codecs_test.xml", &dirs).unwrap(),
            second.path().join("codecs_test.xml")
        );
    }

    #[test]
    fn test_directory_is_not_a_match() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::create_dir(first.path().join("codecs_test.xml")).unwrap();
        fs::write(second.path().join("codecs_test.xml"), "").unwrap();

        let dirs = SearchDirs::new([first.path(), second.path()]);
        assert_eq!(
            resolve("codecs_test.xml", &dirs).unwrap(),
            second.path().join("codecs_test.xml")
        );
    }

    #[test]
    fn test_absolute_name_joined_under_search_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("no/such")).unwrap();
        fs::write(dir.path().join("no/such/codecs_test.xml"), "").unwrap();

        let dirs = SearchDirs::new([dir.path()]);
        assert_eq!(
            resolve("/no/such/codecs_test.xml", &dirs).unwrap(),
            dir.path().join("no/such/codecs_test.xml")
        );
    }

    #[test]
    fn test_not_found_lists_every_dir() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let dirs = SearchDirs::new([first.path(), second.path()]);

        let err = resolve("missing_codecs_test.xml", &dirs).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing_codecs_test.xml"));
        assert!(message.contains(&first.path().display().to_string()));
        assert!(message.contains(&second.path().display().to_string()));
        match err {
            Error::NotFound {
                file_name,
                search_dirs,
            } => {
                assert_eq!(file_name, "missing_codecs_test.xml");
                assert_eq!(search_dirs, dirs.as_slice());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
