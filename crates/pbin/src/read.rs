//! Types for reading BIN archives
//!

use binrw::BinRead;
use rayon::prelude::*;
use std::{
    fs::File,
    io::{self, Cursor},
    path::Path,
    sync::Arc,
};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    texture::Texture,
    types::{BinHeader, BinTableRow, HEADER_SIZE, TABLE_ROW_SIZE},
};

/// Read-only access to byte ranges of a backing store.
///
/// Every texture in an open archive holds a shared reference to one of these
/// instead of a raw file handle. Reads are positional and do not touch any
/// shared cursor, so disjoint ranges can be read concurrently without
/// locking.
pub trait ReadAt: Send + Sync {
    /// Read exactly `len` bytes starting at absolute offset `offset`.
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>>;
}

impl ReadAt for File {
    #[cfg(unix)]
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        use std::os::unix::fs::FileExt;

        let mut buffer = vec![0u8; len];
        self.read_exact_at(&mut buffer, offset)?;
        Ok(buffer)
    }

    #[cfg(windows)]
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        use std::os::windows::fs::FileExt;

        let mut buffer = vec![0u8; len];
        let mut read = 0;
        while read < len {
            let n = self.seek_read(&mut buffer[read..], offset + read as u64)?;
            if n == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            read += n;
        }
        Ok(buffer)
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let start = usize::try_from(offset).map_err(|_| io::ErrorKind::UnexpectedEof)?;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.len())
            .ok_or(io::ErrorKind::UnexpectedEof)?;

        Ok(self[start..end].to_vec())
    }
}

/// BIN archive reader
///
/// ```no_run
/// fn list_bin_contents(path: &str) -> pbin::error::Result<()> {
///     let archive = pbin::BinArchive::open(path)?;
///
///     for texture in archive.load_all(|_, _| {})? {
///         println!("{}: {} bytes", texture.name(), texture.size);
///     }
///
///     Ok(())
/// }
/// ```
pub struct BinArchive {
    source: Arc<dyn ReadAt>,
    size: u64,
    header: BinHeader,
    table: Vec<BinTableRow>,
}

impl BinArchive {
    /// Open a BIN archive from a path.
    ///
    /// The file handle stays owned by the returned archive; textures borrow
    /// it through [`ReadAt`] for lazy loads and must not outlive it.
    #[instrument(err)]
    pub fn open(path: impl AsRef<Path> + std::fmt::Debug) -> Result<BinArchive> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                path: path.to_path_buf(),
            },
            _ => Error::IOError(e),
        })?;

        let file = File::open(path)?;
        Self::with_source(Arc::new(file), metadata.len())
    }

    /// Read a BIN archive held entirely in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<BinArchive> {
        let size = bytes.len() as u64;
        Self::with_source(Arc::new(bytes), size)
    }

    /// Read a BIN archive from any byte-range source.
    ///
    /// `size` is the total length of the backing store. It is load-bearing:
    /// the last payload's length is defined as the distance from its offset
    /// to the end of the file.
    pub fn with_source(source: Arc<dyn ReadAt>, size: u64) -> Result<BinArchive> {
        if size < HEADER_SIZE {
            return Err(Error::TruncatedFile);
        }

        let header_bytes = source.read_at(0, HEADER_SIZE as usize)?;
        let header = BinHeader::read(&mut Cursor::new(header_bytes)).map_err(|e| match e {
            binrw::Error::BadMagic { .. } => Error::BadMagic,
            e => Error::BinRWError(e),
        })?;

        let table_len = u64::from(header.textures) * TABLE_ROW_SIZE;
        let table_end = u64::from(header.table_start)
            .checked_add(table_len)
            .ok_or(Error::TruncatedFile)?;
        if table_end > size {
            return Err(Error::TruncatedFile);
        }

        let table_bytes = source.read_at(u64::from(header.table_start), table_len as usize)?;
        let mut cursor = Cursor::new(table_bytes);
        let table = (0..header.textures)
            .map(|_| BinTableRow::read(&mut cursor).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        Ok(BinArchive {
            source,
            size,
            header,
            table,
        })
    }

    /// Number of textures contained in this archive.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether this archive contains no textures
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Total size of the backing file in bytes
    pub fn total_size(&self) -> u64 {
        self.size
    }

    /// The header's reserved word, preserved verbatim
    pub fn reserved(&self) -> u32 {
        self.header.reserved
    }

    /// The raw offset table
    pub fn table(&self) -> &[BinTableRow] {
        &self.table
    }

    /// Total declared size of the textures in the archive, if it can be known.
    pub fn declared_size(&self) -> Option<u128> {
        let mut total = 0u128;
        for row in &self.table {
            total = total.checked_add(u128::from(row.uncompressed_size))?;
        }
        Some(total)
    }

    /// Resolve the offset table into unloaded textures.
    ///
    /// Row `i`'s payload runs from its own offset to row `i + 1`'s, or to
    /// the end of the file for the last row. A range that would come out
    /// negative, or one reaching past the end of the file, means the table
    /// cannot be trusted and the whole resolution fails.
    pub fn textures(&self) -> Result<Vec<Texture>> {
        self.table
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let start = u64::from(row.data_offset);
                let end = match self.table.get(index + 1) {
                    Some(next) => u64::from(next.data_offset),
                    None => self.size,
                };

                if end < start || end > self.size {
                    return Err(Error::CorruptOffsetTable { index });
                }

                Ok(Texture::builder()
                    .source(Arc::clone(&self.source))
                    .offset(start)
                    .size(end - start)
                    .uncompressed_size(row.uncompressed_size)
                    .index(index)
                    .build())
            })
            .collect()
    }

    /// Load every texture's payload and identify its embedded format.
    ///
    /// Loads fan out in parallel; `progress` is invoked once per completed
    /// texture with `(texture, total)` in completion order, which is not
    /// necessarily index order. Callers needing a deterministic order should
    /// sort by [`Texture::index`] afterwards. If any single load fails the
    /// whole operation fails and no partial result is returned.
    #[instrument(skip_all, err)]
    pub fn load_all<F>(&self, progress: F) -> Result<Vec<Texture>>
    where
        F: Fn(&Texture, usize) + Sync,
    {
        let mut textures = self.textures()?;
        let total = textures.len();

        textures
            .par_iter_mut()
            .map(|texture| {
                texture.load()?;
                progress(texture, total);
                Ok(())
            })
            .collect::<Result<Vec<()>>>()?;

        Ok(textures)
    }
}
