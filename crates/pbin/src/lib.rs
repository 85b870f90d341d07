//! This library handles reading from and creating **BIN** texture archives.
//!
//! # BIN Archive Format Documentation
//!
//! This crate provides utilities to read, edit and rebuild the **BIN** texture
//! container format. A BIN file bundles an arbitrary number of variable-length
//! texture payloads behind a small header and an offset table. Each payload is
//! either a gzip-wrapped blob or a raw tagged image.
//!
//! ## File Structure
//!
//! A BIN file consists of a 16-byte header, an offset table and the
//! concatenated texture payloads.
//!
//! | Offset (bytes) | Field             | Description                                          |
//! |----------------|-------------------|------------------------------------------------------|
//! | 0x0000         | Magic number      | 4 bytes: 0x50 0x42 0x49 0x4E ("PBIN")                |
//! | 0x0004         | Reserved          | 4 bytes: unused, zero in every observed file         |
//! | 0x0008         | Texture Count     | 4 bytes: number of offset-table rows                 |
//! | 0x000C         | Table Offset      | 4 bytes: where the offset table starts (always 16)   |
//!
//! ### Offset Table
//!
//! The offset table holds **Texture Count** rows of 8 bytes each, starting at
//! **Table Offset**:
//!
//! | Offset (bytes) | Field             | Description                                          |
//! |----------------|-------------------|------------------------------------------------------|
//! | 0x0000         | Uncompressed Size | 4 bytes: size of the payload once decompressed       |
//! | 0x0004         | Data Offset       | 4 bytes: payload start, from the beginning of file   |
//!
//! Rows are ordered by ascending data offset and payload regions are
//! contiguous. A payload's byte length is not stored: it is the distance to
//! the next row's offset, or to the end of the file for the last row. The
//! container's total size is therefore load-bearing metadata.
//!
//! ### Payloads
//!
//! Payload contents are opaque to the container. Two embedded formats are
//! recognised by inspecting the payload bytes themselves:
//!
//! - **gzip**: leading bytes `1F 8B`. The gzip header may carry the original
//!   filename (FNAME flag), and the trailer's ISIZE field holds the true
//!   uncompressed size, which overrides whatever the offset table declares.
//! - **tagged image**: leading bytes `Tex1`, a raw uncompressed image. Its
//!   uncompressed size equals its payload length.
//!
//! Anything else is left untouched and round-trips verbatim, including the
//! size the offset table declared for it.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.bin`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod sniff;
pub mod texture;
pub mod types;
pub mod write;

pub use read::{BinArchive, ReadAt};
pub use sniff::TextureFormat;
pub use texture::Texture;
pub use write::BinWriter;
