//! Base types for structure of BIN file.

use binrw::{BinRead, BinWrite};

/// Size in bytes of the fixed file header
pub const HEADER_SIZE: u64 = 16;

/// Size in bytes of one offset-table row
pub const TABLE_ROW_SIZE: u64 = 8;

/// BIN file header
///
/// Defines the header of the BIN file which always starts with "PBIN".
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"PBIN", little)]
pub struct BinHeader {
    /// Unused field, zero in every observed file; preserved verbatim
    pub reserved: u32,

    /// The number of textures stored in the file
    pub textures: u32,

    /// The offset from the beginning of the file where the offset table starts
    pub table_start: u32,
}

impl Default for BinHeader {
    fn default() -> Self {
        Self {
            reserved: 0,
            textures: 0,
            table_start: HEADER_SIZE as u32,
        }
    }
}

/// BIN offset-table row
///
/// Describes one texture payload in the file. The payload's byte length is
/// derived from the next row's offset (or the file size for the last row),
/// never stored.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct BinTableRow {
    /// The size of the payload once decompressed, as declared by the table
    pub uncompressed_size: u32,

    /// The offset to the payload from the start of the file
    pub data_offset: u32,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::BinHeader;
    use crate::types::BinTableRow;

    #[test]
    fn read_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x50, 0x42, 0x49, 0x4E,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
        ]);

        let expected = BinHeader {
            textures: 2,
            ..Default::default()
        };

        assert_eq!(BinHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_header_invalid_magic() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x40, 0x42, 0x49, 0x4E,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
        ]);

        assert!(BinHeader::read(&mut input).is_err());
    }

    #[test]
    fn write_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x50, 0x42, 0x49, 0x4E,
            0x00, 0x00, 0x00, 0x00,
            0x07, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
        ];

        let header = BinHeader {
            textures: 7,
            ..Default::default()
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_row() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x64, 0x00, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
        ]);

        let expected = BinTableRow {
            uncompressed_size: 100,
            data_offset: 32,
        };

        assert_eq!(BinTableRow::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_row() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x32, 0x00, 0x00, 0x00,
            0x84, 0x00, 0x00, 0x00,
        ];

        let row = BinTableRow {
            uncompressed_size: 50,
            data_offset: 132,
        };

        let mut actual = Vec::new();
        row.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }
}
