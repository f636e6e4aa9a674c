//! PKZIP record structures
//!
//! Parse and render the three container records (local file header, central
//! directory header, end of central directory) plus the ZIP64 extra field
//! and the optional data descriptor. Rendering an unmodified parsed record
//! reproduces its bytes exactly, which is what makes whole-archive
//! round-trips byte-identical.
//!
//! Layouts follow APPNOTE; signatures are handled by the caller so the
//! structs only cover the fields after them.

use std::io::{Read, Write};

use crate::byteio::{ReadLeExt, WriteLeExt};
use crate::error::Result;

/// Local file header signature `PK\x03\x04`
pub(crate) const LOCAL_FILE_HEADER_SIG: [u8; 4] = *b"PK\x03\x04";
/// Central directory header signature `PK\x01\x02`
pub(crate) const CENTRAL_DIRECTORY_SIG: [u8; 4] = *b"PK\x01\x02";
/// End of central directory signature `PK\x05\x06`
pub(crate) const END_OF_CENTRAL_DIRECTORY_SIG: [u8; 4] = *b"PK\x05\x06";
/// ZIP64 end of central directory signature `PK\x06\x06`
pub(crate) const ZIP64_EOCD_SIG: [u8; 4] = *b"PK\x06\x06";
/// ZIP64 end of central directory locator signature `PK\x06\x07`
pub(crate) const ZIP64_EOCD_LOCATOR_SIG: [u8; 4] = *b"PK\x06\x07";
/// Data descriptor signature `PK\x07\x08` (optional on the wire)
pub(crate) const DATA_DESCRIPTOR_SIG: [u8; 4] = *b"PK\x07\x08";

/// General-purpose bit flag: payload is encrypted
pub(crate) const FLAG_ENCRYPTED: u16 = 1 << 0;
/// General-purpose bit flag: deflate used maximum effort
pub(crate) const FLAG_LEVEL_MAXIMUM: u16 = 1 << 1;
/// General-purpose bit flag: deflate used fast effort
pub(crate) const FLAG_LEVEL_FAST: u16 = 1 << 2;
/// General-purpose bit flag: crc/sizes follow the payload in a descriptor
pub(crate) const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// General-purpose bit flag: filename and comment are UTF-8
pub(crate) const FLAG_UTF8: u16 = 1 << 11;
/// General-purpose bit flag: the central directory is encrypted
pub(crate) const FLAG_CD_ENCRYPTED: u16 = 1 << 13;

/// Extra-field tag of the ZIP64 extended information record
pub(crate) const ZIP64_EXTRA_ID: u16 = 0x0001;
/// A 32-bit size or offset field holding this marker is promoted to the
/// 64-bit value in the ZIP64 extra record
pub(crate) const ZIP64_MARKER: u32 = 0xFFFF_FFFF;

/// `version made by` written on new central directory headers (6.3)
pub(crate) const VERSION_MADE_BY: u8 = 63;

/// 64-bit values promoted out of a record's ZIP64 extra field
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Zip64Fields {
    pub uncompressed_size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub local_header_offset: Option<u64>,
}

/// Walk an extra field into (tag, body) records, ignoring a malformed tail.
pub(crate) fn extra_records(extra: &[u8]) -> Vec<(u16, Vec<u8>)> {
    let mut records = Vec::new();
    let mut i = 0usize;
    while i + 4 <= extra.len() {
        let id = u16::from_le_bytes([extra[i], extra[i + 1]]);
        let len = u16::from_le_bytes([extra[i + 2], extra[i + 3]]) as usize;
        i += 4;
        if i + len > extra.len() {
            break;
        }
        records.push((id, extra[i..i + len].to_vec()));
        i += len;
    }
    records
}

/// Resolve the ZIP64 record against the record's 32-bit fields.
///
/// APPNOTE orders the promoted values uncompressed size, compressed size,
/// local header offset, disk start; each is present only when the matching
/// 32-bit field holds the 0xFFFFFFFF marker.
fn parse_zip64(extra: &[u8], unc32: u32, comp32: u32, offset32: u32) -> Zip64Fields {
    let mut fields = Zip64Fields::default();
    for (id, body) in extra_records(extra) {
        if id != ZIP64_EXTRA_ID {
            continue;
        }
        let mut cursor = &body[..];
        if unc32 == ZIP64_MARKER {
            fields.uncompressed_size = cursor.read_u64_le().ok();
        }
        if comp32 == ZIP64_MARKER {
            fields.compressed_size = cursor.read_u64_le().ok();
        }
        if offset32 == ZIP64_MARKER {
            fields.local_header_offset = cursor.read_u64_le().ok();
        }
        break;
    }
    fields
}

/// Build the body of a ZIP64 extra record from the promoted values, in
/// APPNOTE order. Empty when nothing is promoted.
pub(crate) fn build_zip64_body(
    uncompressed_size: Option<u64>,
    compressed_size: Option<u64>,
    local_header_offset: Option<u64>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for value in [uncompressed_size, compressed_size, local_header_offset]
        .into_iter()
        .flatten()
    {
        body.extend_from_slice(&value.to_le_bytes());
    }
    body
}

/// Replace (or remove, when `body` is empty) the record with the given tag
/// inside an extra field, preserving every other record.
pub(crate) fn replace_extra_record(extra: &mut Vec<u8>, id: u16, body: Vec<u8>) {
    let mut rebuilt = Vec::with_capacity(extra.len());
    for (tag, record) in extra_records(extra) {
        if tag == id {
            continue;
        }
        rebuilt.extend_from_slice(&tag.to_le_bytes());
        rebuilt.extend_from_slice(&(record.len() as u16).to_le_bytes());
        rebuilt.extend_from_slice(&record);
    }
    if !body.is_empty() {
        rebuilt.extend_from_slice(&id.to_le_bytes());
        rebuilt.extend_from_slice(&(body.len() as u16).to_le_bytes());
        rebuilt.extend_from_slice(&body);
    }
    *extra = rebuilt;
}

/// Local file header, minus its signature and payload.
///
/// The 32-bit size fields are kept exactly as stored; the accessors resolve
/// ZIP64 promotion.
#[derive(Debug, Clone)]
pub(crate) struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub method_id: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size32: u32,
    pub uncompressed_size32: u32,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
}

impl LocalFileHeader {
    pub fn parse<R: Read>(r: &mut R) -> Result<Self> {
        let version_needed = r.read_u16_le()?;
        let flags = r.read_u16_le()?;
        let method_id = r.read_u16_le()?;
        let mod_time = r.read_u16_le()?;
        let mod_date = r.read_u16_le()?;
        let crc32 = r.read_u32_le()?;
        let compressed_size32 = r.read_u32_le()?;
        let uncompressed_size32 = r.read_u32_le()?;
        let file_name_length = r.read_u16_le()? as usize;
        let extra_field_length = r.read_u16_le()? as usize;
        let file_name = r.read_field(file_name_length)?;
        let extra_field = r.read_field(extra_field_length)?;

        Ok(LocalFileHeader {
            version_needed,
            flags,
            method_id,
            mod_time,
            mod_date,
            crc32,
            compressed_size32,
            uncompressed_size32,
            file_name,
            extra_field,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u16_le(self.version_needed)?;
        w.write_u16_le(self.flags)?;
        w.write_u16_le(self.method_id)?;
        w.write_u16_le(self.mod_time)?;
        w.write_u16_le(self.mod_date)?;
        w.write_u32_le(self.crc32)?;
        w.write_u32_le(self.compressed_size32)?;
        w.write_u32_le(self.uncompressed_size32)?;
        w.write_u16_le(self.file_name.len() as u16)?;
        w.write_u16_le(self.extra_field.len() as u16)?;
        w.write_all(&self.file_name)?;
        w.write_all(&self.extra_field)?;
        Ok(())
    }

    /// Rendered length, signature excluded
    pub fn encoded_len(&self) -> u64 {
        26 + self.file_name.len() as u64 + self.extra_field.len() as u64
    }

    fn zip64(&self) -> Zip64Fields {
        parse_zip64(
            &self.extra_field,
            self.uncompressed_size32,
            self.compressed_size32,
            0,
        )
    }

    pub fn compressed_size(&self) -> u64 {
        if self.compressed_size32 == ZIP64_MARKER {
            self.zip64()
                .compressed_size
                .unwrap_or(ZIP64_MARKER as u64)
        } else {
            self.compressed_size32 as u64
        }
    }

    pub fn uncompressed_size(&self) -> u64 {
        if self.uncompressed_size32 == ZIP64_MARKER {
            self.zip64()
                .uncompressed_size
                .unwrap_or(ZIP64_MARKER as u64)
        } else {
            self.uncompressed_size32 as u64
        }
    }
}

/// Central directory header, minus its signature.
#[derive(Debug, Clone)]
pub(crate) struct CentralDirectoryHeader {
    pub version_made_by: u8,
    pub platform: u8,
    pub version_needed: u16,
    pub flags: u16,
    pub method_id: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size32: u32,
    pub uncompressed_size32: u32,
    pub disk_number_start: u16,
    pub internal_attrs: u16,
    pub external_attrs: u32,
    pub local_header_offset32: u32,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
    pub comment: Vec<u8>,
}

impl CentralDirectoryHeader {
    pub fn parse<R: Read>(r: &mut R) -> Result<Self> {
        let version_made_by = r.read_u8_le()?;
        let platform = r.read_u8_le()?;
        let version_needed = r.read_u16_le()?;
        let flags = r.read_u16_le()?;
        let method_id = r.read_u16_le()?;
        let mod_time = r.read_u16_le()?;
        let mod_date = r.read_u16_le()?;
        let crc32 = r.read_u32_le()?;
        let compressed_size32 = r.read_u32_le()?;
        let uncompressed_size32 = r.read_u32_le()?;
        let file_name_length = r.read_u16_le()? as usize;
        let extra_field_length = r.read_u16_le()? as usize;
        let comment_length = r.read_u16_le()? as usize;
        let disk_number_start = r.read_u16_le()?;
        let internal_attrs = r.read_u16_le()?;
        let external_attrs = r.read_u32_le()?;
        let local_header_offset32 = r.read_u32_le()?;
        let file_name = r.read_field(file_name_length)?;
        let extra_field = r.read_field(extra_field_length)?;
        let comment = r.read_field(comment_length)?;

        Ok(CentralDirectoryHeader {
            version_made_by,
            platform,
            version_needed,
            flags,
            method_id,
            mod_time,
            mod_date,
            crc32,
            compressed_size32,
            uncompressed_size32,
            disk_number_start,
            internal_attrs,
            external_attrs,
            local_header_offset32,
            file_name,
            extra_field,
            comment,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u8_le(self.version_made_by)?;
        w.write_u8_le(self.platform)?;
        w.write_u16_le(self.version_needed)?;
        w.write_u16_le(self.flags)?;
        w.write_u16_le(self.method_id)?;
        w.write_u16_le(self.mod_time)?;
        w.write_u16_le(self.mod_date)?;
        w.write_u32_le(self.crc32)?;
        w.write_u32_le(self.compressed_size32)?;
        w.write_u32_le(self.uncompressed_size32)?;
        w.write_u16_le(self.file_name.len() as u16)?;
        w.write_u16_le(self.extra_field.len() as u16)?;
        w.write_u16_le(self.comment.len() as u16)?;
        w.write_u16_le(self.disk_number_start)?;
        w.write_u16_le(self.internal_attrs)?;
        w.write_u32_le(self.external_attrs)?;
        w.write_u32_le(self.local_header_offset32)?;
        w.write_all(&self.file_name)?;
        w.write_all(&self.extra_field)?;
        w.write_all(&self.comment)?;
        Ok(())
    }

    /// Rendered length, signature excluded
    pub fn encoded_len(&self) -> u64 {
        42 + self.file_name.len() as u64
            + self.extra_field.len() as u64
            + self.comment.len() as u64
    }

    fn zip64(&self) -> Zip64Fields {
        parse_zip64(
            &self.extra_field,
            self.uncompressed_size32,
            self.compressed_size32,
            self.local_header_offset32,
        )
    }

    pub fn compressed_size(&self) -> u64 {
        if self.compressed_size32 == ZIP64_MARKER {
            self.zip64()
                .compressed_size
                .unwrap_or(ZIP64_MARKER as u64)
        } else {
            self.compressed_size32 as u64
        }
    }

    pub fn uncompressed_size(&self) -> u64 {
        if self.uncompressed_size32 == ZIP64_MARKER {
            self.zip64()
                .uncompressed_size
                .unwrap_or(ZIP64_MARKER as u64)
        } else {
            self.uncompressed_size32 as u64
        }
    }

    pub fn local_header_offset(&self) -> u64 {
        if self.local_header_offset32 == ZIP64_MARKER {
            self.zip64()
                .local_header_offset
                .unwrap_or(ZIP64_MARKER as u64)
        } else {
            self.local_header_offset32 as u64
        }
    }

    /// Assign the entry's final local-header offset at save time.
    ///
    /// Rewrites the ZIP64 record so it carries exactly the promoted fields:
    /// sizes when the 32-bit size fields hold the marker, the offset when it
    /// no longer fits 32 bits (which also raises the required version to
    /// 4.5).
    pub fn set_local_header_offset(&mut self, offset: u64) {
        let unc_promoted = self.uncompressed_size32 == ZIP64_MARKER;
        let comp_promoted = self.compressed_size32 == ZIP64_MARKER;
        let offset_promoted = offset >= ZIP64_MARKER as u64;
        let uncompressed = self.uncompressed_size();
        let compressed = self.compressed_size();

        self.local_header_offset32 = if offset_promoted {
            ZIP64_MARKER
        } else {
            offset as u32
        };

        let body = build_zip64_body(
            unc_promoted.then_some(uncompressed),
            comp_promoted.then_some(compressed),
            offset_promoted.then_some(offset),
        );
        replace_extra_record(&mut self.extra_field, ZIP64_EXTRA_ID, body);

        if offset_promoted {
            self.version_needed = self.version_needed.max(45);
        }
    }
}

/// End of central directory record, minus its signature.
#[derive(Debug, Clone)]
pub(crate) struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub cd_disk_number: u16,
    pub total_entries: u16,
    pub total_cd_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    pub fn parse<R: Read>(r: &mut R) -> Result<Self> {
        let disk_number = r.read_u16_le()?;
        let cd_disk_number = r.read_u16_le()?;
        let total_entries = r.read_u16_le()?;
        let total_cd_entries = r.read_u16_le()?;
        let cd_size = r.read_u32_le()?;
        let cd_offset = r.read_u32_le()?;
        let comment_length = r.read_u16_le()? as usize;
        let comment = r.read_field(comment_length)?;

        Ok(EndOfCentralDirectory {
            disk_number,
            cd_disk_number,
            total_entries,
            total_cd_entries,
            cd_size,
            cd_offset,
            comment,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u16_le(self.disk_number)?;
        w.write_u16_le(self.cd_disk_number)?;
        w.write_u16_le(self.total_entries)?;
        w.write_u16_le(self.total_cd_entries)?;
        w.write_u32_le(self.cd_size)?;
        w.write_u32_le(self.cd_offset)?;
        w.write_u16_le(self.comment.len() as u16)?;
        w.write_all(&self.comment)?;
        Ok(())
    }
}

/// Read a data descriptor: crc, compressed size, uncompressed size, with or
/// without the optional `PK\x07\x08` prefix.
pub(crate) fn read_data_descriptor<R: Read>(r: &mut R) -> Result<(u32, u32, u32)> {
    let first = r.read_u32_le()?;
    let crc = if first == u32::from_le_bytes(DATA_DESCRIPTOR_SIG) {
        r.read_u32_le()?
    } else {
        first
    };
    let compressed_size = r.read_u32_le()?;
    let uncompressed_size = r.read_u32_le()?;
    Ok((crc, compressed_size, uncompressed_size))
}
