// SPDX-License-Identifier: MPL-2.0

//! Locating and decoding Android `media_codecs` XML descriptors.
//!
//! # Module Structure
//!
//! - [`search_dirs`]: the prioritized directory list used to find files
//! - [`resolve`]: turning a file name into an existing path
//! - [`descriptor`]: the abstract descriptor capability and typed decoding
//! - [`decoder`]: root-name dispatch to registered decode functions
//! - [`loader`]: loading a file and its `<Include>`s recursively
//! - [`media_codecs`]: the `<MediaCodecs>` schema and hardware heuristic
//! - [`scan`]: discovery of every `media_codecs*.xml` on the device
//!
//! Everything is synchronous and performs blocking filesystem reads.

pub mod decoder;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod media_codecs;
pub mod resolve;
pub mod scan;
pub mod search_dirs;

pub use decoder::{DecodeFn, DecoderRegistry, decode, register_decoder};
pub use descriptor::{DecodeXml, Descriptor, Include, parse_as, parse_file_as};
pub use error::{DecodeError, Error, Result};
pub use loader::{Loader, parse_file, parse_file_recursively};
pub use media_codecs::{
    Attribute, CodecType, Feature, Limit, MediaCodec, MediaCodecsDescriptor,
    MediaCodecsDescriptors, Quirk, Setting,
};
pub use resolve::resolve;
pub use scan::{scan_media_codecs, scan_media_codecs_in};
pub use search_dirs::{DEFAULT_SEARCH_DIRS, SearchDirs};
