// SPDX-License-Identifier: MPL-2.0

//! Typed representation of the Android `media_codecs.xml` schema.
//!
//! ```xml
//! <MediaCodecs>
//!     <Include href="media_codecs_google_audio.xml" />
//!     <Settings>
//!         <Setting name="max-video-encoder-input-buffers" value="11" />
//!     </Settings>
//!     <Decoders>
//!         <MediaCodec name="OMX.qcom.video.decoder.avc" type="video/avc">
//!             <Quirk name="requires-allocate-on-input-ports" />
//!             <Limit name="size" min="64x64" max="4096x2160" />
//!             <Feature name="adaptive-playback" />
//!         </MediaCodec>
//!     </Decoders>
//! </MediaCodecs>
//! ```

use std::any::Any;

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::descriptor::{DecodeXml, Descriptor, Include, attr, children_named};

/// Root element name of the media codecs schema.
pub const MEDIA_CODECS_ROOT: &str = "MediaCodecs";

/// Codec name prefixes used by the platform's software codecs.
const SW_PREFIXES: &[&str] = &["omx.google.", "c2.android."];

/// Codec name prefixes used by SoC vendors for hardware codecs.
const HW_PREFIXES: &[&str] = &[
    "omx.qcom.",   // Qualcomm, OMX
    "omx.exynos.", // Samsung, OMX
    "omx.mtk.",    // MediaTek, OMX
    "omx.hisi.",   // HiSilicon, OMX
    "c2.qti.",     // Qualcomm, Codec2
    "c2.exynos.",  // Samsung, Codec2
    "c2.mtk.",     // MediaTek, Codec2
    "c2.hisi.",    // HiSilicon, Codec2
];

/// One parsed `<MediaCodecs>` document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaCodecsDescriptor {
    pub includes: Vec<Include>,
    pub decoders: Vec<MediaCodec>,
    pub encoders: Vec<MediaCodec>,
    pub settings: Vec<Setting>,
}

impl MediaCodecsDescriptor {
    /// Value of the global setting `name`, if declared.
    #[must_use]
    pub fn setting(&self, name: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|setting| setting.name == name)
            .map(|setting| setting.value.as_str())
    }
}

impl DecodeXml for MediaCodecsDescriptor {
    const ROOT: &'static str = MEDIA_CODECS_ROOT;

    fn from_root(root: Node<'_, '_>) -> Self {
        let codecs_in = |section: &str| {
            children_named(root, section)
                .flat_map(|block| children_named(block, "MediaCodec"))
                .map(MediaCodec::from_node)
                .collect::<Vec<_>>()
        };

        Self {
            includes: children_named(root, "Include")
                .map(Include::from_node)
                .collect(),
            decoders: codecs_in("Decoders"),
            encoders: codecs_in("Encoders"),
            settings: children_named(root, "Settings")
                .flat_map(|block| children_named(block, "Setting"))
                .map(|node| Setting {
                    name: attr(node, "name"),
                    value: attr(node, "value"),
                })
                .collect(),
        }
    }
}

impl Descriptor for MediaCodecsDescriptor {
    fn root_name(&self) -> &str {
        MEDIA_CODECS_ROOT
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

/// An ordered collection of media codecs descriptors.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MediaCodecsDescriptors(Vec<MediaCodecsDescriptor>);

impl MediaCodecsDescriptors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the `MediaCodecs` variants of a recursive load, in order.
    #[must_use]
    pub fn from_descriptors(descriptors: Vec<Box<dyn Descriptor>>) -> Self {
        descriptors
            .into_iter()
            .filter_map(|descriptor| descriptor.downcast::<MediaCodecsDescriptor>())
            .map(|descriptor| *descriptor)
            .collect()
    }

    pub fn push(&mut self, descriptor: MediaCodecsDescriptor) {
        self.0.push(descriptor);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaCodecsDescriptor> {
        self.0.iter()
    }

    /// All decoders of every descriptor, in descriptor order then document order.
    #[must_use]
    pub fn decoders(&self) -> Vec<&MediaCodec> {
        self.0.iter().flat_map(|d| &d.decoders).collect()
    }

    /// All encoders of every descriptor, in descriptor order then document order.
    #[must_use]
    pub fn encoders(&self) -> Vec<&MediaCodec> {
        self.0.iter().flat_map(|d| &d.encoders).collect()
    }

    #[must_use]
    pub fn hardware_decoders(&self) -> Vec<&MediaCodec> {
        self.0
            .iter()
            .flat_map(|d| &d.decoders)
            .filter(|codec| codec.is_hardware())
            .collect()
    }

    #[must_use]
    pub fn hardware_encoders(&self) -> Vec<&MediaCodec> {
        self.0
            .iter()
            .flat_map(|d| &d.encoders)
            .filter(|codec| codec.is_hardware())
            .collect()
    }
}

impl FromIterator<MediaCodecsDescriptor> for MediaCodecsDescriptors {
    fn from_iter<I: IntoIterator<Item = MediaCodecsDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MediaCodecsDescriptors {
    type Item = MediaCodecsDescriptor;
    type IntoIter = std::vec::IntoIter<MediaCodecsDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MediaCodecsDescriptors {
    type Item = &'a MediaCodecsDescriptor;
    type IntoIter = std::slice::Iter<'a, MediaCodecsDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A global `<Setting name=".." value=".." />`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Setting {
    pub name: String,
    pub value: String,
}

/// A single encoder or decoder entry.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaCodec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub types: Vec<CodecType>,
    pub quirks: Vec<Quirk>,
    pub limits: Vec<Limit>,
    pub features: Vec<Feature>,
}

impl MediaCodec {
    fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            name: attr(node, "name"),
            domain: node.attribute("domain").map(str::to_owned),
            types: children_named(node, "Type")
                .map(CodecType::from_node)
                .collect(),
            quirks: children_named(node, "Quirk")
                .map(|quirk| Quirk {
                    name: attr(quirk, "name"),
                })
                .collect(),
            limits: children_named(node, "Limit").map(Limit::from_node).collect(),
            features: children_named(node, "Feature")
                .map(Feature::from_node)
                .collect(),
        }
    }

    /// Heuristic guess at whether this codec is hardware-accelerated.
    ///
    /// An explicit `domain="software"` wins, then well-known software name
    /// prefixes, then well-known SoC vendor prefixes. Codecs from any other
    /// vendor are reported as not hardware, which may be wrong for them.
    #[must_use]
    pub fn is_hardware(&self) -> bool {
        if self
            .domain
            .as_deref()
            .is_some_and(|domain| domain.eq_ignore_ascii_case("software"))
        {
            return false;
        }

        let name = self.name.to_lowercase();
        if SW_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
            return false;
        }

        HW_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
    }

    #[must_use]
    pub fn codec_type(&self, name: &str) -> Option<&CodecType> {
        self.types.iter().find(|ty| ty.name == name)
    }

    #[must_use]
    pub fn limit(&self, name: &str) -> Option<&Limit> {
        self.limits.iter().find(|limit| limit.name == name)
    }

    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.name == name)
    }

    #[must_use]
    pub fn has_quirk(&self, name: &str) -> bool {
        self.quirks.iter().any(|quirk| quirk.name == name)
    }
}

/// A media type handled by a codec, with its own overrides.
///
/// Limits and features here are not merged with the codec-level ones.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodecType {
    pub name: String,
    pub limits: Vec<Limit>,
    pub features: Vec<Feature>,
}

impl CodecType {
    fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            name: attr(node, "name"),
            limits: children_named(node, "Limit").map(Limit::from_node).collect(),
            features: children_named(node, "Feature")
                .map(Feature::from_node)
                .collect(),
        }
    }

    #[must_use]
    pub fn limit(&self, name: &str) -> Option<&Limit> {
        self.limits.iter().find(|limit| limit.name == name)
    }

    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.name == name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quirk {
    pub name: String,
}

/// An arbitrary XML attribute kept verbatim.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Every attribute of `node` except `name`, in document order.
fn extra_attributes(node: Node<'_, '_>) -> Vec<Attribute> {
    node.attributes()
        .filter(|attribute| attribute.name() != "name")
        .map(|attribute| Attribute {
            name: attribute.name().to_owned(),
            value: attribute.value().to_owned(),
        })
        .collect()
}

fn lookup<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attribute| attribute.name == name)
        .map(|attribute| attribute.value.as_str())
}

/// A `<Limit>` such as `<Limit name="size" min="64x64" max="4096x2160" />`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Limit {
    pub name: String,
    pub attrs: Vec<Attribute>,
}

impl Limit {
    fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            name: attr(node, "name"),
            attrs: extra_attributes(node),
        }
    }

    /// Value of the attribute `name` (e.g. `min`, `max`, `value`).
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        lookup(&self.attrs, name)
    }
}

/// A `<Feature>` such as `<Feature name="adaptive-playback" required="true" />`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Feature {
    pub name: String,
    pub params: Vec<Attribute>,
}

impl Feature {
    fn from_node(node: Node<'_, '_>) -> Self {
        Self {
            name: attr(node, "name"),
            params: extra_attributes(node),
        }
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        lookup(&self.params, name)
    }
}
