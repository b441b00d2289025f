//! Fingerprint template buffer

use std::fmt;

use bytes::{Bytes, BytesMut};

/// Size of one character-file template, in bytes
///
/// The sensor's char buffers are fixed-size; every template crossing the
/// host boundary is exactly this long.
pub const TEMPLATE_SIZE: usize = 512;

/// An opaque, fixed-length fingerprint template
///
/// A `Template` can only be built through [`Template::normalized`], so any
/// value of this type is guaranteed to hold exactly [`TEMPLATE_SIZE`] bytes.
/// Normalization therefore happens exactly once, at construction, and the
/// transfer and matching layers never re-check sizes.
///
/// The bytes themselves are sensor-defined feature data and are never
/// interpreted by this library.
#[derive(Clone, PartialEq, Eq)]
pub struct Template(Bytes);

impl Template {
    /// Build a template from raw bytes, padding or truncating to
    /// [`TEMPLATE_SIZE`]
    ///
    /// Short buffers are extended with trailing zero bytes; long buffers
    /// keep their first [`TEMPLATE_SIZE`] bytes. Both adjustments are
    /// deterministic, so the same raw read always yields the same template.
    pub fn normalized(raw: impl AsRef<[u8]>) -> Self {
        let raw = raw.as_ref();

        let mut buf = BytesMut::with_capacity(TEMPLATE_SIZE);
        if raw.len() >= TEMPLATE_SIZE {
            buf.extend_from_slice(&raw[..TEMPLATE_SIZE]);
        } else {
            buf.extend_from_slice(raw);
            buf.resize(TEMPLATE_SIZE, 0);
        }

        Self(buf.freeze())
    }

    /// Template contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes, always [`TEMPLATE_SIZE`]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is all zeros (never produced by a real capture)
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl AsRef<[u8]> for Template {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Template> for Bytes {
    fn from(template: Template) -> Bytes {
        template.0
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Biometric data; log length only
        f.debug_tuple("Template")
            .field(&format!("{} bytes", self.0.len()))
            .finish()
    }
}
