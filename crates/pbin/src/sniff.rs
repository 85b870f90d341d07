//! Payload format detection.
//!
//! A BIN container stores no per-texture type information, so the embedded
//! format is recovered by inspecting the payload bytes themselves. Detection
//! is a pure function of the byte block: it always classifies, never fails.

use byteorder::{ByteOrder, LittleEndian};

/// Leading two bytes of a gzip member
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Leading four bytes of a raw tagged image
pub const TAGGED_IMAGE_MAGIC: &[u8; 4] = b"Tex1";

/// FNAME bit of the gzip flag byte
const GZIP_FLAG_FNAME: u8 = 0x08;

/// Offset of the first byte past the fixed gzip header
const GZIP_HEADER_SIZE: usize = 10;

/// The embedded format of a texture payload
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TextureFormat {
    /// A gzip-wrapped blob, extension `gz`
    Gzip,

    /// A raw "Tex1"-tagged image, extension `img`
    TaggedImage,

    /// Anything else; preserved verbatim
    #[default]
    Unknown,
}

impl TextureFormat {
    /// File extension used when extracting a payload of this format
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            TextureFormat::Gzip => Some("gz"),
            TextureFormat::TaggedImage => Some("img"),
            TextureFormat::Unknown => None,
        }
    }
}

/// Classify a payload by its leading bytes.
///
/// Blocks too short to carry either signature classify as
/// [`TextureFormat::Unknown`]. The gzip check only needs the two magic
/// bytes, so a bare `1F 8B` block already classifies as gzip; only the
/// tagged-image check requires four bytes.
pub fn identify(bytes: &[u8]) -> TextureFormat {
    if bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC {
        return TextureFormat::Gzip;
    }

    if bytes.len() >= 4 && &bytes[..4] == TAGGED_IMAGE_MAGIC {
        return TextureFormat::TaggedImage;
    }

    TextureFormat::Unknown
}

/// Extract the original filename from a gzip member's header.
///
/// The filename is only present when the FNAME flag is set, as a
/// NUL-terminated string following the fixed 10-byte header. Extraction is
/// best-effort: a missing terminator or unset flag yields `None`.
pub fn gzip_filename(bytes: &[u8]) -> Option<String> {
    if bytes.len() < GZIP_HEADER_SIZE || bytes[3] & GZIP_FLAG_FNAME == 0 {
        return None;
    }

    let name = &bytes[GZIP_HEADER_SIZE..];
    let end = name.iter().position(|&b| b == 0x00)?;

    Some(String::from_utf8_lossy(&name[..end]).into_owned())
}

/// Read the uncompressed size from a gzip member's trailer.
///
/// The last four bytes of any gzip member encode the original size modulo
/// 2^32 (the ISIZE field). This value is authoritative and overrides whatever
/// size the container's offset table declared.
pub fn gzip_trailer_size(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < 4 {
        return None;
    }

    Some(LittleEndian::read_u32(&bytes[bytes.len() - 4..]))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::sniff::{gzip_filename, gzip_trailer_size, identify, TextureFormat};

    #[test]
    fn identify_gzip() {
        assert_eq!(identify(&[0x1F, 0x8B, 0x08, 0x00]), TextureFormat::Gzip);
    }

    #[test]
    fn identify_tagged_image() {
        assert_eq!(identify(b"Tex1\x00\x01\x02"), TextureFormat::TaggedImage);
    }

    #[test]
    fn identify_unknown() {
        assert_eq!(identify(b"DDS |some data"), TextureFormat::Unknown);
    }

    #[test]
    fn identify_short_blocks() {
        assert_eq!(identify(&[]), TextureFormat::Unknown);
        assert_eq!(identify(&[0x1F]), TextureFormat::Unknown);
        assert_eq!(identify(b"Tex"), TextureFormat::Unknown);
        assert_eq!(identify(&[0x1F, 0x8B]), TextureFormat::Gzip);
    }

    #[test]
    fn filename_with_fname_flag() {
        #[rustfmt::skip]
        let mut input = vec![
            0x1F, 0x8B, 0x08, 0x08,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x03,
        ];
        input.extend_from_slice(b"rock.img\x00");
        input.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        assert_eq!(gzip_filename(&input), Some("rock.img".into()));
    }

    #[test]
    fn filename_without_fname_flag() {
        #[rustfmt::skip]
        let input = vec![
            0x1F, 0x8B, 0x08, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x03,
            0xDE, 0xAD, 0xBE, 0xEF,
        ];

        assert_eq!(gzip_filename(&input), None);
    }

    #[test]
    fn filename_missing_terminator() {
        let mut input = vec![0x1F, 0x8B, 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03];
        input.extend_from_slice(b"unterminated");

        assert_eq!(gzip_filename(&input), None);
    }

    #[test]
    fn trailer_size() {
        let mut input = vec![0x1F, 0x8B, 0x08, 0x00];
        input.extend_from_slice(&[0x00; 10]);
        input.extend_from_slice(&[0x40, 0xE2, 0x01, 0x00]);

        assert_eq!(gzip_trailer_size(&input), Some(123456));
        assert_eq!(gzip_trailer_size(&[0x01, 0x02]), None);
    }
}
