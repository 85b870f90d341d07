//! The in-memory representation of one archive member.

use bon::Builder;
use flate2::read::GzDecoder;
use std::{
    fmt::{self, Debug},
    io::Read,
    path::Path,
    sync::Arc,
};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    read::ReadAt,
    sniff::{self, TextureFormat},
};

/// One texture held by a BIN archive.
///
/// A texture starts out unloaded, knowing only its byte range within the
/// backing store. [`Texture::load`] fetches the payload and identifies its
/// embedded format exactly once; afterwards the bytes are owned by the
/// texture and the backing store is no longer consulted.
#[derive(Builder)]
pub struct Texture {
    /// Non-owning reference to the backing store for lazy loads
    source: Option<Arc<dyn ReadAt>>,

    /// Absolute byte offset of the payload within the backing store
    #[builder(default)]
    pub offset: u64,

    /// Byte length of the payload within the backing store
    pub size: u64,

    /// Declared uncompressed size; overridden by the gzip trailer on load
    #[builder(default)]
    pub uncompressed_size: u32,

    /// Original position in the archive, a stable sort key independent of
    /// any later display or edit order
    pub index: usize,

    /// Original filename, from gzip metadata or the imported file
    pub filename: Option<String>,

    /// Embedded format identified on load
    #[builder(default)]
    pub format: TextureFormat,

    #[builder(skip)]
    bytes: Option<Vec<u8>>,
}

impl Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("uncompressed_size", &self.uncompressed_size)
            .field("index", &self.index)
            .field("filename", &self.filename)
            .field("format", &self.format)
            .field("loaded", &self.bytes.is_some())
            .finish()
    }
}

impl Texture {
    /// Import a standalone file as a texture.
    ///
    /// The whole file becomes the payload, loaded and sniffed immediately;
    /// `index` is the position the texture takes in the caller's sequence.
    #[instrument(err)]
    pub fn from_file(path: impl AsRef<Path> + Debug, index: usize) -> Result<Texture> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        let mut texture = Texture::builder()
            .size(bytes.len() as u64)
            .index(index)
            .maybe_filename(path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .build();
        texture.adopt(bytes);

        Ok(texture)
    }

    /// Whether the payload bytes have been fetched yet
    pub fn is_loaded(&self) -> bool {
        self.bytes.is_some()
    }

    /// The payload bytes, if loaded
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Fetch the payload bytes and identify their embedded format.
    ///
    /// Loading happens at most once; calling this on an already loaded
    /// texture is a no-op. For gzip payloads the embedded filename (when
    /// present) and the trailer's true uncompressed size are extracted, the
    /// latter replacing whatever the offset table declared.
    pub fn load(&mut self) -> Result<&[u8]> {
        if self.bytes.is_none() {
            let source = self
                .source
                .as_ref()
                .ok_or(Error::MissingPayload(self.index))?;
            let bytes = source.read_at(self.offset, self.size as usize)?;
            self.adopt(bytes);
        }

        Ok(self.bytes.as_deref().unwrap_or_default())
    }

    /// Swap in a new payload, keeping this texture's position.
    ///
    /// The original `index` survives, everything derived from the payload is
    /// taken from the new bytes.
    pub fn replace_with(&mut self, bytes: Vec<u8>) {
        self.source = None;
        self.filename = None;
        self.adopt(bytes);
    }

    fn adopt(&mut self, bytes: Vec<u8>) {
        self.size = bytes.len() as u64;
        self.format = sniff::identify(&bytes);

        match self.format {
            TextureFormat::Gzip => {
                if let Some(name) = sniff::gzip_filename(&bytes) {
                    self.filename = Some(name);
                }
                if let Some(size) = sniff::gzip_trailer_size(&bytes) {
                    self.uncompressed_size = size;
                }
            }
            TextureFormat::TaggedImage => {
                self.uncompressed_size = bytes.len() as u32;
            }
            // No verified semantics for the declared size of unknown
            // payloads; keep the table's value as is.
            TextureFormat::Unknown => {}
        }

        self.bytes = Some(bytes);
    }

    /// File extension matching the identified format
    pub fn extension(&self) -> Option<&'static str> {
        self.format.extension()
    }

    /// A usable filename for this texture.
    ///
    /// Returns the resolved filename when one exists, otherwise a name
    /// synthesized from the texture's original position.
    pub fn name(&self) -> String {
        match &self.filename {
            Some(name) => name.clone(),
            None => format!("texture_{:04}", self.index),
        }
    }

    /// Decompress the payload.
    ///
    /// Gzip payloads are inflated; any other format is returned as-is, since
    /// it was never compressed to begin with.
    #[instrument(skip(self), err)]
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let bytes = self.bytes().ok_or(Error::MissingPayload(self.index))?;

        match self.format {
            TextureFormat::Gzip => {
                let mut decoded = Vec::with_capacity(self.uncompressed_size as usize);
                GzDecoder::new(bytes).read_to_end(&mut decoded)?;
                Ok(decoded)
            }
            _ => Ok(bytes.to_vec()),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Error;
    use crate::sniff::TextureFormat;
    use crate::texture::Texture;

    fn gzip_member(filename: &str, content: &[u8]) -> Vec<u8> {
        use flate2::{Compression, GzBuilder};
        use std::io::Write;

        let mut encoder = GzBuilder::new()
            .filename(filename)
            .write(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn adopt_gzip_payload() {
        let payload = gzip_member("rock.img", b"some raw image data");

        let mut texture = Texture::builder().size(0).index(3).build();
        texture.replace_with(payload);

        assert_eq!(texture.format, TextureFormat::Gzip);
        assert_eq!(texture.filename.as_deref(), Some("rock.img"));
        assert_eq!(texture.uncompressed_size, 19);
        assert_eq!(texture.name(), "rock.img");
        assert_eq!(texture.extension(), Some("gz"));
        assert_eq!(texture.decompress().unwrap(), b"some raw image data");
    }

    #[test]
    fn adopt_tagged_image_payload() {
        let mut texture = Texture::builder().size(0).index(0).build();
        texture.replace_with(b"Tex1\x01\x02\x03\x04".to_vec());

        assert_eq!(texture.format, TextureFormat::TaggedImage);
        assert_eq!(texture.uncompressed_size, 8);
        assert_eq!(texture.filename, None);
        assert_eq!(texture.name(), "texture_0000");
        assert_eq!(texture.extension(), Some("img"));
    }

    #[test]
    fn adopt_unknown_payload_keeps_declared_size() {
        let mut texture = Texture::builder()
            .size(0)
            .uncompressed_size(777)
            .index(12)
            .build();
        texture.replace_with(vec![0x00, 0x01, 0x02]);

        assert_eq!(texture.format, TextureFormat::Unknown);
        assert_eq!(texture.uncompressed_size, 777);
        assert_eq!(texture.extension(), None);
        assert_eq!(texture.name(), "texture_0012");
    }

    #[test]
    fn replace_preserves_index() {
        let mut texture = Texture::builder().size(0).index(5).build();
        texture.replace_with(gzip_member("old.img", b"old"));
        texture.replace_with(b"Tex1new".to_vec());

        assert_eq!(texture.index, 5);
        assert_eq!(texture.format, TextureFormat::TaggedImage);
        assert_eq!(texture.filename, None);
    }

    #[test]
    fn load_without_source_or_bytes() {
        let mut texture = Texture::builder().size(4).index(9).build();
        assert!(matches!(texture.load(), Err(Error::MissingPayload(9))));
    }
}
