//! Little-endian field I/O shared by every record codec
//!
//! All multi-byte integers in a ZIP archive are little-endian. These
//! extension traits are the single place the crate reads or writes them, so
//! truncation is diagnosed uniformly: running out of bytes mid-field is a
//! `BadFile`, not a bare I/O error.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, ZipError};

fn eof_is_truncation(err: io::Error) -> ZipError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ZipError::BadFile("truncated archive".to_string())
    } else {
        ZipError::Io(err)
    }
}

/// Little-endian reads over any byte source
pub(crate) trait ReadLeExt: Read {
    fn read_u8_le(&mut self) -> Result<u8> {
        self.read_u8().map_err(eof_is_truncation)
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        self.read_u16::<LittleEndian>().map_err(eof_is_truncation)
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        self.read_u32::<LittleEndian>().map_err(eof_is_truncation)
    }

    fn read_u64_le(&mut self) -> Result<u64> {
        self.read_u64::<LittleEndian>().map_err(eof_is_truncation)
    }

    /// Read a field whose length was given by a preceding count
    fn read_field(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf).map_err(eof_is_truncation)?;
        Ok(buf)
    }
}

impl<R: Read + ?Sized> ReadLeExt for R {}

/// Little-endian writes over any byte sink
pub(crate) trait WriteLeExt: Write {
    fn write_u8_le(&mut self, v: u8) -> Result<()> {
        self.write_u8(v)?;
        Ok(())
    }

    fn write_u16_le(&mut self, v: u16) -> Result<()> {
        self.write_u16::<LittleEndian>(v)?;
        Ok(())
    }

    fn write_u32_le(&mut self, v: u32) -> Result<()> {
        self.write_u32::<LittleEndian>(v)?;
        Ok(())
    }

    fn write_u64_le(&mut self, v: u64) -> Result<()> {
        self.write_u64::<LittleEndian>(v)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteLeExt for W {}
