// SPDX-License-Identifier: MPL-2.0

//! Line-delimited JSON records written to stdout.

use std::io::Write;

use android_etc::{MediaCodec, MediaCodecsDescriptors};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    Decoder,
    Encoder,
}

/// A flattened codec with its classification.
#[derive(Debug, Serialize)]
pub struct CodecRecord<'a> {
    pub kind: CodecKind,
    pub hardware: bool,
    #[serde(flatten)]
    pub codec: &'a MediaCodec,
}

impl<'a> CodecRecord<'a> {
    pub fn new(kind: CodecKind, codec: &'a MediaCodec) -> Self {
        Self {
            kind,
            hardware: codec.is_hardware(),
            codec,
        }
    }
}

/// Decoders first, then encoders, each in descriptor order.
pub fn codec_records(descriptors: &MediaCodecsDescriptors) -> Vec<CodecRecord<'_>> {
    let decoders = descriptors
        .decoders()
        .into_iter()
        .map(|codec| CodecRecord::new(CodecKind::Decoder, codec));
    let encoders = descriptors
        .encoders()
        .into_iter()
        .map(|codec| CodecRecord::new(CodecKind::Encoder, codec));
    decoders.chain(encoders).collect()
}

/// Writes each item as one JSON object per line.
pub fn write_lines<W: Write, T: Serialize>(
    mut out: W,
    items: impl IntoIterator<Item = T>,
) -> eyre::Result<()> {
    for item in items {
        serde_json::to_writer(&mut out, &item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
