// SPDX-License-Identifier: MPL-2.0

//! Best-effort discovery of every `media_codecs*.xml` on the device.

use std::path::PathBuf;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    descriptor::parse_file_as,
    error::{Error, Result},
    media_codecs::{MediaCodecsDescriptor, MediaCodecsDescriptors},
    search_dirs::SearchDirs,
};

const FILE_PREFIX: &str = "media_codecs";
const FILE_SUFFIX: &str = ".xml";

/// Decodes every `media_codecs*.xml` found in the stock Android directories.
///
/// # Errors
///
/// See [`scan_media_codecs_in`].
pub fn scan_media_codecs() -> Result<MediaCodecsDescriptors> {
    scan_media_codecs_in(&SearchDirs::fallback())
}

/// Decodes every `media_codecs*.xml` found directly inside `search_dirs`.
///
/// Each file is decoded on its own; `<Include>` elements are kept on the
/// descriptors but not followed. Directories that cannot be listed are
/// skipped.
///
/// # Errors
///
/// [`Error::Scan`] naming the first candidate file that cannot be read or
/// decoded.
pub fn scan_media_codecs_in(search_dirs: &SearchDirs) -> Result<MediaCodecsDescriptors> {
    let (files, listed_dirs) = list_candidates(search_dirs);

    let mut descriptors = MediaCodecsDescriptors::new();
    for path in files {
        let descriptor = parse_file_as::<MediaCodecsDescriptor>(&path).map_err(|source| {
            Error::Scan {
                path: path.clone(),
                source: Box::new(source),
            }
        })?;
        debug!(
            path = %path.display(),
            decoders = descriptor.decoders.len(),
            encoders = descriptor.encoders.len(),
            "decoded media codecs file"
        );
        descriptors.push(descriptor);
    }

    info!(
        dirs = listed_dirs,
        files = descriptors.len(),
        decoders = descriptors.decoders().len(),
        encoders = descriptors.encoders().len(),
        "Scanned media codecs"
    );

    Ok(descriptors)
}

/// Candidate files in directory order, then file name order within a directory.
#[must_use]
pub fn find_media_codecs_files(search_dirs: &SearchDirs) -> Vec<PathBuf> {
    list_candidates(search_dirs).0
}

/// Candidate files plus the number of directories that could be listed.
fn list_candidates(search_dirs: &SearchDirs) -> (Vec<PathBuf>, usize) {
    let mut files = Vec::new();
    let mut listed_dirs = 0;

    for dir in search_dirs.iter() {
        let entries: Result<Vec<_>, walkdir::Error> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .collect();

        let entries = match entries {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        listed_dirs += 1;

        files.extend(
            entries
                .into_iter()
                .filter(|entry| !entry.file_type().is_dir())
                .filter(|entry| {
                    entry
                        .file_name()
                        .to_str()
                        .is_some_and(is_media_codecs_file_name)
                })
                .map(walkdir::DirEntry::into_path),
        );
    }

    (files, listed_dirs)
}

fn is_media_codecs_file_name(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}
