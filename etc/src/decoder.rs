// SPDX-License-Identifier: MPL-2.0

//! Root-name dispatch from raw bytes to a typed descriptor.
//!
//! The root element is identified first, then the decode function
//! registered for that name builds the concrete descriptor. New schemas are
//! added by registering another root name; callers of [`decode`] and the
//! loader do not change.

use std::{
    collections::HashMap,
    fmt,
    sync::{LazyLock, PoisonError, RwLock},
};

use tracing::debug;

use crate::{
    descriptor::{DecodeXml, Descriptor, parse_as, parse_document},
    error::{DecodeError, Error, Result},
    media_codecs::MediaCodecsDescriptor,
};

/// Builds a descriptor from the full byte buffer of a document.
pub type DecodeFn = fn(&[u8]) -> Result<Box<dyn Descriptor>, DecodeError>;

/// Process-wide registry used by [`decode`] and [`register_decoder`].
static REGISTRY: LazyLock<RwLock<DecoderRegistry>> =
    LazyLock::new(|| RwLock::new(DecoderRegistry::default()));

/// Mapping from root element name to its decode function.
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl DecoderRegistry {
    /// A registry that recognizes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registers `decode_fn` for documents rooted at `root`, returning the
    /// function it replaces.
    pub fn register(&mut self, root: impl Into<String>, decode_fn: DecodeFn) -> Option<DecodeFn> {
        self.decoders.insert(root.into(), decode_fn)
    }

    /// Registers `T` under its own root name.
    pub fn register_type<T: DecodeXml + Descriptor>(&mut self) -> Option<DecodeFn> {
        self.register(T::ROOT, decode_boxed::<T>)
    }

    #[must_use]
    pub fn contains(&self, root: &str) -> bool {
        self.decoders.contains_key(root)
    }

    /// Decodes `data` with the function registered for its root element.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`] if the root cannot be identified,
    /// [`Error::UnsupportedRoot`] if nothing is registered for it and
    /// [`Error::Decode`] if the registered function fails.
    pub fn decode(&self, data: &[u8]) -> Result<Box<dyn Descriptor>> {
        let root = root_element_name(data).map_err(Error::Malformed)?;
        let Some(decode_fn) = self.decoders.get(&root) else {
            return Err(Error::UnsupportedRoot(root));
        };
        debug!(root, "decoding descriptor");
        Ok(decode_fn(data)?)
    }
}

impl Default for DecoderRegistry {
    /// Recognizes `<MediaCodecs>`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_type::<MediaCodecsDescriptor>();
        registry
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut roots: Vec<_> = self.decoders.keys().collect();
        roots.sort();
        f.debug_struct("DecoderRegistry")
            .field("roots", &roots)
            .finish()
    }
}

/// [`DecodeFn`] for any shape that decodes from its root element.
///
/// # Errors
///
/// See [`parse_as`].
pub fn decode_boxed<T: DecodeXml + Descriptor>(
    data: &[u8],
) -> Result<Box<dyn Descriptor>, DecodeError> {
    Ok(Box::new(parse_as::<T>(data)?))
}

/// Local name of the document's root element.
///
/// # Errors
///
/// Fails if the bytes are not UTF-8 or not well-formed XML.
pub fn root_element_name(data: &[u8]) -> Result<String, DecodeError> {
    let text = std::str::from_utf8(data)?;
    let doc = parse_document(text)?;
    Ok(doc.root_element().tag_name().name().to_owned())
}

/// Adds a root schema to the process-wide registry.
///
/// Register before the first call to [`decode`] or to a loader using the
/// global registry; registering concurrently with lookups is not supported.
pub fn register_decoder(root: impl Into<String>, decode_fn: DecodeFn) -> Option<DecodeFn> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(root, decode_fn)
}

/// Decodes `data` through the process-wide registry.
///
/// # Errors
///
/// See [`DecoderRegistry::decode`].
pub fn decode(data: &[u8]) -> Result<Box<dyn Descriptor>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .decode(data)
}

/// Snapshot of the process-wide registry.
#[must_use]
pub fn global_registry() -> DecoderRegistry {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use roxmltree::Node;

    use super::*;
    use crate::descriptor::Include;

    #[derive(Debug, Default)]
    struct AudioPolicy {
        includes: Vec<Include>,
    }

    impl DecodeXml for AudioPolicy {
        const ROOT: &'static str = "audioPolicyConfiguration";

        fn from_root(root: Node<'_, '_>) -> Self {
            Self {
                includes: root
                    .children()
                    .filter(|n| n.has_tag_name("Include"))
                    .map(Include::from_node)
                    .collect(),
            }
        }
    }

    impl Descriptor for AudioPolicy {
        fn root_name(&self) -> &str {
            Self::ROOT
        }

        fn includes(&self) -> &[Include] {
            &self.includes
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    #[test]
    fn test_decode_media_codecs() {
        let descriptor = decode(b"<MediaCodecs><Include href=\"a.xml\"/></MediaCodecs>").unwrap();
        assert_eq!(descriptor.root_name(), "MediaCodecs");
        assert_eq!(descriptor.includes()[0].href, "a.xml");
        assert!(descriptor.downcast_ref::<MediaCodecsDescriptor>().is_some());
    }

    #[test]
    fn test_unsupported_root() {
        let err = decode(b"<FooCodecs><Decoders/></FooCodecs>").unwrap_err();
        assert!(matches!(err, Error::UnsupportedRoot(ref root) if root == "FooCodecs"));
        assert_eq!(err.to_string(), "unexpected root <FooCodecs>");
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            decode(b"not xml at all"),
            Err(Error::Malformed(DecodeError::Xml(_)))
        ));
        assert!(matches!(
            decode(&[0x3c, 0xff, 0xfe]),
            Err(Error::Malformed(DecodeError::Utf8(_)))
        ));
    }

    #[test]
    fn test_doctype_is_accepted() {
        let data = b"<?xml version=\"1.0\"?>\n<!DOCTYPE MediaCodecs>\n<MediaCodecs><Decoders><MediaCodec name=\"c2.qti.avc.decoder\"/></Decoders></MediaCodecs>";
        assert_eq!(root_element_name(data).unwrap(), "MediaCodecs");

        let descriptor = decode(data).unwrap();
        let codecs = descriptor.downcast_ref::<MediaCodecsDescriptor>().unwrap();
        assert_eq!(codecs.decoders[0].name, "c2.qti.avc.decoder");
    }

    #[test]
    fn test_register_new_root() {
        let mut registry = DecoderRegistry::default();
        assert!(!registry.contains(AudioPolicy::ROOT));
        assert!(registry.register_type::<AudioPolicy>().is_none());

        let descriptor = registry
            .decode(br#"<audioPolicyConfiguration><Include href="x.xml"/></audioPolicyConfiguration>"#)
            .unwrap();
        assert_eq!(descriptor.root_name(), "audioPolicyConfiguration");
        assert_eq!(descriptor.includes().len(), 1);
        assert!(descriptor.downcast_ref::<MediaCodecsDescriptor>().is_none());

        let descriptor = registry.decode(b"<MediaCodecs/>").unwrap();
        assert_eq!(descriptor.root_name(), "MediaCodecs");
    }

    #[test]
    fn test_empty_registry() {
        let registry = DecoderRegistry::empty();
        assert!(matches!(
            registry.decode(b"<MediaCodecs/>"),
            Err(Error::UnsupportedRoot(_))
        ));
    }

    #[test]
    fn test_downcast_owned() {
        let descriptor = decode(b"<MediaCodecs/>").unwrap();
        let concrete = descriptor.downcast::<MediaCodecsDescriptor>().unwrap();
        assert!(concrete.decoders.is_empty());
    }

    #[test]
    fn test_downcast_mismatch() {
        let mut registry = DecoderRegistry::default();
        registry.register_type::<AudioPolicy>();
        let descriptor = registry.decode(b"<audioPolicyConfiguration/>").unwrap();
        assert!(descriptor.downcast::<MediaCodecsDescriptor>().is_none());
    }
}
