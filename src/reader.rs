//! Sequential archive parsing
//!
//! Walks a byte stream from the first record to the end-of-central-directory
//! record, dispatching on the 4-byte signature at the current position. Every
//! local entry is decoded on the spot (decrypt, then decompress, then CRC
//! check); central directory headers are matched to entries by order once
//! the scan reaches them.

use std::io::Read;

use log::debug;

use crate::byteio::ReadLeExt;
use crate::compression::{self, CompressionMethod};
use crate::crypto::{self, EncryptionMethod};
use crate::dostime;
use crate::encoding::TextEncoding;
use crate::entry::ArchiveEntry;
use crate::error::{Result, ZipError};
use crate::records::{
    extra_records, read_data_descriptor, CentralDirectoryHeader, EndOfCentralDirectory,
    LocalFileHeader, CENTRAL_DIRECTORY_SIG, END_OF_CENTRAL_DIRECTORY_SIG, FLAG_CD_ENCRYPTED,
    FLAG_DATA_DESCRIPTOR, FLAG_ENCRYPTED, FLAG_UTF8, LOCAL_FILE_HEADER_SIG,
    ZIP64_EOCD_LOCATOR_SIG, ZIP64_EOCD_SIG,
};

/// Everything the parser recovered from one archive
#[derive(Debug)]
pub(crate) struct ParsedArchive {
    pub entries: Vec<ArchiveEntry>,
    /// The wire-level records behind `entries`, payloads still encoded
    pub raw_entries: Vec<(LocalFileHeader, Vec<u8>)>,
    pub cd_headers: Vec<CentralDirectoryHeader>,
    pub end: EndOfCentralDirectory,
}

fn too_large_for_platform<T>(_: T) -> ZipError {
    ZipError::BadFile("entry too large for this platform".to_string())
}

/// Parse a whole archive from `source`.
pub(crate) fn parse_archive<R: Read>(
    source: &mut R,
    password: Option<&str>,
    encoding: TextEncoding,
) -> Result<ParsedArchive> {
    let mut entries = Vec::new();
    let mut raw_entries = Vec::new();
    let mut cd_headers: Vec<CentralDirectoryHeader> = Vec::new();

    let mut signature = [0u8; 4];
    signature.copy_from_slice(&source.read_field(4)?);

    match signature {
        LOCAL_FILE_HEADER_SIG => {
            let (entry, raw) = read_entry(source, password, encoding)?;
            entries.push(entry);
            raw_entries.push(raw);
        }
        END_OF_CENTRAL_DIRECTORY_SIG => {
            // An archive with no entries is just an end record.
            let end = EndOfCentralDirectory::parse(source)?;
            debug!("parsed empty archive");
            return Ok(ParsedArchive {
                entries,
                raw_entries,
                cd_headers,
                end,
            });
        }
        _ => return Err(ZipError::BadFile("not a ZIP archive".to_string())),
    }

    let end = loop {
        signature.copy_from_slice(&source.read_field(4)?);
        match signature {
            LOCAL_FILE_HEADER_SIG => {
                let (entry, raw) = read_entry(source, password, encoding)?;
                entries.push(entry);
                raw_entries.push(raw);
            }
            CENTRAL_DIRECTORY_SIG => {
                cd_headers.push(CentralDirectoryHeader::parse(source)?);
            }
            END_OF_CENTRAL_DIRECTORY_SIG => {
                break EndOfCentralDirectory::parse(source)?;
            }
            ZIP64_EOCD_SIG => {
                // Recognized but not consumed: skip its declared length.
                let record_len = source.read_u64_le()?;
                let record_len = usize::try_from(record_len).map_err(too_large_for_platform)?;
                source.read_field(record_len)?;
            }
            ZIP64_EOCD_LOCATOR_SIG => {
                source.read_field(16)?;
            }
            _ => return Err(ZipError::BadFile("bad signature".to_string())),
        }
    };

    reconcile(&mut entries, &cd_headers, &end, encoding)?;
    debug!(
        "parsed archive: {} entries, central directory of {} bytes",
        entries.len(),
        end.cd_size
    );

    Ok(ParsedArchive {
        entries,
        raw_entries,
        cd_headers,
        end,
    })
}

/// Decode one local entry: header, payload, optional descriptor, then the
/// decrypt, decompress, CRC pipeline.
fn read_entry<R: Read>(
    source: &mut R,
    password: Option<&str>,
    encoding: TextEncoding,
) -> Result<(ArchiveEntry, (LocalFileHeader, Vec<u8>))> {
    let header = LocalFileHeader::parse(source)?;

    // The high byte of version-needed is unused
    if header.version_needed & 0xFF00 != 0 {
        return Err(ZipError::BadFile("unknown version".to_string()));
    }
    if header.flags & FLAG_CD_ENCRYPTED != 0 {
        return Err(ZipError::NotImplemented(
            "central directory encryption".to_string(),
        ));
    }

    let method = CompressionMethod::from_id(header.method_id)?;

    let payload_len =
        usize::try_from(header.compressed_size()).map_err(too_large_for_platform)?;
    let payload = source.read_field(payload_len)?;

    let mut crc = header.crc32;
    let mut compressed_size = header.compressed_size();
    let mut uncompressed_size = header.uncompressed_size();
    if header.flags & FLAG_DATA_DESCRIPTOR != 0 {
        let (descriptor_crc, descriptor_compressed, descriptor_uncompressed) =
            read_data_descriptor(source)?;
        crc = descriptor_crc;
        compressed_size = descriptor_compressed as u64;
        uncompressed_size = descriptor_uncompressed as u64;
    }

    let (encryption_method, decrypted);
    if header.flags & FLAG_ENCRYPTED != 0 {
        let password = password.ok_or(ZipError::WrongPassword)?;
        decrypted = Some(crypto::decrypt(password.as_bytes(), crc, &payload)?);
        encryption_method = EncryptionMethod::ZipCrypto;
    } else {
        decrypted = None;
        encryption_method = EncryptionMethod::Unencrypted;
    }

    let contents = compression::decompress(
        method,
        uncompressed_size,
        decrypted.as_deref().unwrap_or(&payload),
    )?;

    if crc32fast::hash(&contents) != crc {
        return Err(ZipError::BadFile("corrupted or damaged file".to_string()));
    }

    let name = if header.flags & FLAG_UTF8 != 0 {
        TextEncoding::Utf8.decode(&header.file_name)
    } else {
        encoding.decode(&header.file_name)
    };

    let entry = ArchiveEntry {
        name,
        version_needed: header.version_needed,
        encryption_method,
        compression_method: method,
        compression_level: compression::level_from_flags(method, header.flags),
        last_modified: dostime::decode(header.mod_time, header.mod_date),
        crc32: crc,
        compressed_size,
        uncompressed_size,
        contents,
        comment: String::new(),
        extras: extra_records(&header.extra_field),
    };

    Ok((entry, (header, payload)))
}

/// Cross-check decoded entries against the central directory and the end
/// record, and copy each header's comment onto its entry.
fn reconcile(
    entries: &mut [ArchiveEntry],
    cd_headers: &[CentralDirectoryHeader],
    end: &EndOfCentralDirectory,
    encoding: TextEncoding,
) -> Result<()> {
    if cd_headers.len() != entries.len()
        || end.total_entries as usize != entries.len()
        || end.total_cd_entries as usize != cd_headers.len()
    {
        return Err(ZipError::BadFile("corrupted or damaged file".to_string()));
    }

    for (entry, cd_header) in entries.iter_mut().zip(cd_headers) {
        if cd_header.crc32 != entry.crc32 {
            return Err(ZipError::BadFile("corrupted or damaged file".to_string()));
        }
        entry.comment = if cd_header.flags & FLAG_UTF8 != 0 {
            TextEncoding::Utf8.decode(&cd_header.comment)
        } else {
            encoding.decode(&cd_header.comment)
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // A one-entry stored archive, assembled field by field: "key.txt"
    // containing "123456789" (the standard CRC-32 check string, which hashes
    // to 0xCBF43926).
    fn stored_fixture() -> Vec<u8> {
        let name = b"key.txt";
        let body = b"123456789";
        let crc = 0xCBF43926u32;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LOCAL_FILE_HEADER_SIG);
        bytes.extend_from_slice(&10u16.to_le_bytes()); // version needed
        bytes.extend_from_slice(&0u16.to_le_bytes()); // flags
        bytes.extend_from_slice(&0u16.to_le_bytes()); // method: stored
        bytes.extend_from_slice(&0u16.to_le_bytes()); // mod time
        bytes.extend_from_slice(&0u16.to_le_bytes()); // mod date
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes()); // extra len
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(body);

        let cd_offset = bytes.len() as u32;
        bytes.extend_from_slice(&CENTRAL_DIRECTORY_SIG);
        bytes.push(63); // version made by
        bytes.push(0); // platform
        bytes.extend_from_slice(&10u16.to_le_bytes()); // version needed
        bytes.extend_from_slice(&0u16.to_le_bytes()); // flags
        bytes.extend_from_slice(&0u16.to_le_bytes()); // method
        bytes.extend_from_slice(&0u16.to_le_bytes()); // mod time
        bytes.extend_from_slice(&0u16.to_le_bytes()); // mod date
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes()); // extra len
        bytes.extend_from_slice(&0u16.to_le_bytes()); // comment len
        bytes.extend_from_slice(&0u16.to_le_bytes()); // disk start
        bytes.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        bytes.extend_from_slice(&0x20u32.to_le_bytes()); // external attrs
        bytes.extend_from_slice(&0u32.to_le_bytes()); // local header offset
        bytes.extend_from_slice(name);
        let cd_size = bytes.len() as u32 - cd_offset;

        bytes.extend_from_slice(&END_OF_CENTRAL_DIRECTORY_SIG);
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&cd_size.to_le_bytes());
        bytes.extend_from_slice(&cd_offset.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes
    }

    #[test]
    fn test_parse_stored_archive() {
        let bytes = stored_fixture();
        let parsed = parse_archive(&mut Cursor::new(&bytes), None, TextEncoding::Utf8).unwrap();

        assert_eq!(parsed.entries.len(), 1);
        let entry = &parsed.entries[0];
        assert_eq!(entry.name(), "key.txt");
        assert_eq!(entry.contents(), b"123456789");
        assert_eq!(entry.compression_method(), CompressionMethod::Stored);
        assert_eq!(entry.encryption_method(), EncryptionMethod::Unencrypted);
        assert_eq!(entry.crc32(), 0xCBF43926);
        assert!(entry.last_modified().is_none());
    }

    #[test]
    fn test_corrupted_payload_is_rejected() {
        let mut bytes = stored_fixture();
        // last payload byte sits right before the central directory record
        let lfh_len = 4 + 26 + "key.txt".len();
        let payload_last = lfh_len + "123456789".len() - 1;
        bytes[payload_last] ^= 0xFF;

        match parse_archive(&mut Cursor::new(&bytes), None, TextEncoding::Utf8) {
            Err(ZipError::BadFile(msg)) => assert!(msg.contains("corrupted")),
            other => panic!("expected corruption error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_a_zip() {
        let bytes = b"GIF89a not an archive".to_vec();
        match parse_archive(&mut Cursor::new(&bytes), None, TextEncoding::Utf8) {
            Err(ZipError::BadFile(msg)) => assert!(msg.contains("not a ZIP")),
            other => panic!("expected BadFile, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_archive() {
        let mut bytes = stored_fixture();
        bytes.truncate(bytes.len() - 10);
        match parse_archive(&mut Cursor::new(&bytes), None, TextEncoding::Utf8) {
            Err(ZipError::BadFile(msg)) => assert!(msg.contains("truncated")),
            other => panic!("expected truncation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_archive() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&END_OF_CENTRAL_DIRECTORY_SIG);
        bytes.extend_from_slice(&[0u8; 16]);
        bytes.extend_from_slice(&0u16.to_le_bytes());

        let parsed = parse_archive(&mut Cursor::new(&bytes), None, TextEncoding::Utf8).unwrap();
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.end.total_entries, 0);
    }

    #[test]
    fn test_unknown_version_high_byte() {
        let mut bytes = stored_fixture();
        // second byte of version-needed in the local header
        bytes[5] = 9;
        match parse_archive(&mut Cursor::new(&bytes), None, TextEncoding::Utf8) {
            Err(ZipError::BadFile(msg)) => assert!(msg.contains("unknown version")),
            other => panic!("expected BadFile, got {:?}", other),
        }
    }

}
