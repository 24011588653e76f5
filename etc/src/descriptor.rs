// SPDX-License-Identifier: MPL-2.0

//! The abstract descriptor capability shared by every recognized root schema.

use std::{any::Any, fmt, fs, path::Path};

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Error, Result};

/// A decoded XML document conforming to one of the recognized root schemas.
pub trait Descriptor: fmt::Debug + Send + Sync + 'static {
    /// Local name of the document's root element.
    fn root_name(&self) -> &str;

    /// `<Include>` children, in document order.
    fn includes(&self) -> &[Include];

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Descriptor {
    /// Returns the concrete descriptor if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Descriptor>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Converts into the concrete descriptor, or `None` if it is not a `T`.
    #[must_use]
    pub fn downcast<T: Descriptor>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast().ok()
    }
}

/// A reference to another descriptor file, resolved through the search dirs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Include {
    pub href: String,
}

impl Include {
    pub(crate) fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            href: attr(node, "href"),
        }
    }
}

/// A typed shape that can be decoded straight from its root element.
pub trait DecodeXml: Sized {
    /// Root element name this shape binds to.
    const ROOT: &'static str;

    fn from_root(root: Node<'_, '_>) -> Self;
}

/// Decodes `data` as a `T`, bypassing root-name dispatch.
///
/// # Errors
///
/// Fails if the bytes are not UTF-8, are not well-formed XML, or the root
/// element is not `T::ROOT`.
pub fn parse_as<T: DecodeXml>(data: &[u8]) -> Result<T, DecodeError> {
    let text = std::str::from_utf8(data)?;
    let doc = parse_document(text)?;
    let root = doc.root_element();
    let found = root.tag_name().name();
    if found != T::ROOT {
        return Err(DecodeError::UnexpectedRoot {
            expected: T::ROOT,
            found: found.to_owned(),
        });
    }
    Ok(T::from_root(root))
}

/// Reads the file at the literal `path` and decodes it as a `T`.
///
/// No search directory fallback is applied.
///
/// # Errors
///
/// Fails with [`Error::Read`] if the file cannot be read and with
/// [`Error::Decode`] if its contents do not decode as a `T`.
pub fn parse_file_as<T: DecodeXml>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_as(&data)?)
}

/// Parses `text`, accepting a `<!DOCTYPE>` declaration as vendor files may carry one.
pub(crate) fn parse_document(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse_with_options(
        text,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
}

/// Value of the attribute `name`, or an empty string when it is absent.
pub(crate) fn attr(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_owned()
}

/// Element children of `node` named `name`, in document order.
pub(crate) fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}
