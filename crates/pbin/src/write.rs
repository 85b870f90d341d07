//! Types for writing BIN archives
//!

use binrw::BinWrite;
use std::fmt::Debug;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::texture::Texture;
use crate::types::{BinHeader, BinTableRow, HEADER_SIZE, TABLE_ROW_SIZE};

/// BIN archive generator
///
/// Textures are laid out in the order they are added, which is the caller's
/// display or edit order, not necessarily the order they held in a source
/// archive. The writer is pure size and offset accounting plus a byte copy;
/// payload contents are never reinterpreted or re-encoded.
///
/// ```
/// # fn doit() -> pbin::error::Result<()>
/// # {
/// use pbin::{BinWriter, Texture};
///
/// let mut texture = Texture::builder().size(0).index(0).build();
/// texture.replace_with(b"Tex1 payload".to_vec());
///
/// // We use a buffer here, though you'd normally use a `File`
/// let mut bin = BinWriter::new(std::io::Cursor::new(Vec::new()));
/// bin.add_texture(&texture)?;
///
/// let buffer = bin.finish()?.into_inner();
/// assert_eq!(buffer.len(), 16 + 8 + 12);
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct BinWriter<W: Write + Seek> {
    inner: W,
    header: BinHeader,
    table: Vec<BinTableRow>,
    data_block: Vec<u8>,
}

impl<W: Write + Seek> BinWriter<W> {
    /// Initializes the archive.
    pub fn new(inner: W) -> BinWriter<W> {
        BinWriter {
            inner,
            header: BinHeader::default(),
            table: Vec::new(),
            data_block: Vec::new(),
        }
    }

    /// Number of textures added so far
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether any texture has been added yet
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Append one texture's payload to the archive.
    ///
    /// The texture must be loaded. Its table row carries the texture's
    /// uncompressed size verbatim: loading already replaced it with the
    /// gzip trailer value or the payload length where those apply, and a
    /// declared zero is a value like any other, not an absence.
    #[instrument(skip_all, err, fields(index = texture.index))]
    pub fn add_texture(&mut self, texture: &Texture) -> Result<()> {
        let bytes = texture
            .bytes()
            .ok_or(Error::MissingPayload(texture.index))?;

        self.table.push(BinTableRow {
            uncompressed_size: texture.uncompressed_size,
            // Relative to the payload region until finish() knows the
            // final texture count.
            data_offset: self.data_block.len() as u32,
        });
        self.data_block.extend_from_slice(bytes);
        self.header.textures += 1;

        Ok(())
    }

    /// Write the header, offset table and payload region.
    ///
    /// This will return the writer, but one should normally not append any
    /// data to the end of the file.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        let base = (HEADER_SIZE + TABLE_ROW_SIZE * self.table.len() as u64) as u32;
        for row in &mut self.table {
            row.data_offset += base;
        }

        self.header.write(&mut self.inner)?;
        for row in &self.table {
            row.write(&mut self.inner)?;
        }
        self.inner.write_all(&self.data_block)?;

        Ok(self.inner)
    }
}

/// Serialize an ordered sequence of loaded textures into a byte buffer.
///
/// `progress` is invoked once per texture, in writer order, after its
/// payload has been placed. Fails with [`Error::MissingPayload`] if any
/// texture was never loaded; nothing is produced in that case.
pub fn serialize<F>(textures: &[Texture], mut progress: F) -> Result<Vec<u8>>
where
    F: FnMut(&Texture, usize),
{
    let mut writer = BinWriter::new(Cursor::new(Vec::new()));
    let total = textures.len();

    for texture in textures {
        writer.add_texture(texture)?;
        progress(texture, total);
    }

    Ok(writer.finish()?.into_inner())
}

/// Serialize textures and write the result to `path`.
///
/// The buffer is assembled in full before anything touches the disk, so a
/// failing texture never leaves a half-written file behind.
#[instrument(skip(textures, progress), err)]
pub fn save<F>(path: impl AsRef<Path> + Debug, textures: &[Texture], progress: F) -> Result<()>
where
    F: FnMut(&Texture, usize),
{
    let buffer = serialize(textures, progress)?;
    std::fs::write(path, buffer)?;

    Ok(())
}
