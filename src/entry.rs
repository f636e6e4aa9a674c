//! Decoded archive entries
//!
//! An [`ArchiveEntry`] is the user-facing view of one archived file after
//! decryption, decompression, and CRC verification: immutable, with the
//! plaintext contents inline.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::compression::{CompressionLevel, CompressionMethod};
use crate::crypto::EncryptionMethod;
use crate::encoding::TextEncoding;
use crate::error::Result;

/// Default `peek` size cutoff in characters (text) or bytes (binary)
pub const DEFAULT_PEEK_LIMIT: usize = 8191;

const TRUNCATION_MARKER: &str = "... File too large to display";

/// A decoded file or directory from an archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub(crate) name: String,
    pub(crate) version_needed: u16,
    pub(crate) encryption_method: EncryptionMethod,
    pub(crate) compression_method: CompressionMethod,
    pub(crate) compression_level: Option<CompressionLevel>,
    pub(crate) last_modified: Option<NaiveDateTime>,
    pub(crate) crc32: u32,
    pub(crate) compressed_size: u64,
    pub(crate) uncompressed_size: u64,
    pub(crate) contents: Vec<u8>,
    pub(crate) comment: String,
    pub(crate) extras: Vec<(u16, Vec<u8>)>,
}

/// Decoded content returned by [`ArchiveEntry::peek`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Contents decoded as text in the requested encoding
    Text(String),
    /// Contents that did not decode; raw bytes
    Bytes(Vec<u8>),
    /// The entry is a directory and has no contents
    Folder,
}

impl ArchiveEntry {
    /// Entry name, `/`-separated; directories end with `/`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entry is a directory marker
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Minimal PKZIP version needed to extract this entry
    pub fn version_needed(&self) -> u16 {
        self.version_needed
    }

    /// Encryption scheme the payload was stored with
    pub fn encryption_method(&self) -> EncryptionMethod {
        self.encryption_method
    }

    /// Compression scheme the payload was stored with
    pub fn compression_method(&self) -> CompressionMethod {
        self.compression_method
    }

    /// Deflate effort hint from the entry's flags, when one was recorded
    pub fn compression_level(&self) -> Option<CompressionLevel> {
        self.compression_level
    }

    /// Modification timestamp, unless the DOS fields were invalid
    pub fn last_modified(&self) -> Option<NaiveDateTime> {
        self.last_modified
    }

    /// CRC-32 of the plaintext contents
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Payload size as stored in the archive
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Plaintext size
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Decoded plaintext contents
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Per-entry comment from the central directory
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Unrecognized extra-field records as (tag, bytes) pairs
    pub fn extras(&self) -> &[(u16, Vec<u8>)] {
        &self.extras
    }

    /// Decode the contents for display.
    ///
    /// Text that fails to decode comes back as raw bytes. With
    /// `ignore_overflow` unset, content over `char_limit` is cut to
    /// `char_limit / 2` characters (text) or `char_limit / 32` bytes
    /// (binary) with a trailing marker.
    pub fn peek(
        &self,
        encoding: TextEncoding,
        ignore_overflow: bool,
        char_limit: usize,
    ) -> Preview {
        if self.is_dir() {
            return Preview::Folder;
        }

        match encoding {
            TextEncoding::Utf8 => match String::from_utf8(self.contents.clone()) {
                Ok(text) => Self::clip_text(text, ignore_overflow, char_limit),
                Err(_) => self.clip_bytes(ignore_overflow, char_limit),
            },
            TextEncoding::Cp437 => {
                Self::clip_text(encoding.decode(&self.contents), ignore_overflow, char_limit)
            }
        }
    }

    fn clip_text(text: String, ignore_overflow: bool, char_limit: usize) -> Preview {
        if ignore_overflow || text.chars().count() <= char_limit {
            return Preview::Text(text);
        }
        let mut clipped: String = text.chars().take(char_limit / 2).collect();
        clipped.push_str(TRUNCATION_MARKER);
        Preview::Text(clipped)
    }

    fn clip_bytes(&self, ignore_overflow: bool, char_limit: usize) -> Preview {
        if ignore_overflow || self.contents.len() <= char_limit {
            return Preview::Bytes(self.contents.clone());
        }
        let mut clipped = self.contents[..char_limit / 32].to_vec();
        clipped.extend_from_slice(TRUNCATION_MARKER.as_bytes());
        Preview::Bytes(clipped)
    }

    /// Materialize this entry under `dest`, creating parent directories as
    /// needed.
    pub fn extract(&self, dest: &Path) -> Result<()> {
        let target = dest.join(&self.name);
        if self.is_dir() {
            fs::create_dir_all(&target)?;
            return Ok(());
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &self.contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_entry(name: &str, contents: &[u8]) -> ArchiveEntry {
        ArchiveEntry {
            name: name.to_string(),
            version_needed: 20,
            encryption_method: EncryptionMethod::Unencrypted,
            compression_method: CompressionMethod::Stored,
            compression_level: None,
            last_modified: None,
            crc32: crc32fast::hash(contents),
            compressed_size: contents.len() as u64,
            uncompressed_size: contents.len() as u64,
            contents: contents.to_vec(),
            comment: String::new(),
            extras: Vec::new(),
        }
    }

    #[test]
    fn test_peek_text() {
        let entry = text_entry("lorem.txt", b"Lorem ipsum dolor sit amet.");
        assert_eq!(
            entry.peek(TextEncoding::Utf8, true, DEFAULT_PEEK_LIMIT),
            Preview::Text("Lorem ipsum dolor sit amet.".to_string())
        );
    }

    #[test]
    fn test_peek_binary_fallback() {
        let entry = text_entry("blob.bin", &[0xFF, 0xFE, 0x00, 0x01]);
        assert_eq!(
            entry.peek(TextEncoding::Utf8, true, DEFAULT_PEEK_LIMIT),
            Preview::Bytes(vec![0xFF, 0xFE, 0x00, 0x01])
        );
    }

    #[test]
    fn test_peek_truncates_text() {
        let body = "a".repeat(100);
        let entry = text_entry("big.txt", body.as_bytes());
        match entry.peek(TextEncoding::Utf8, false, 40) {
            Preview::Text(text) => {
                assert!(text.starts_with(&"a".repeat(20)));
                assert!(text.ends_with(TRUNCATION_MARKER));
                assert_eq!(text.chars().count(), 20 + TRUNCATION_MARKER.len());
            }
            other => panic!("expected text preview, got {:?}", other),
        }
    }

    #[test]
    fn test_peek_truncates_binary() {
        let body = vec![0xFFu8; 100];
        let entry = text_entry("big.bin", &body);
        match entry.peek(TextEncoding::Utf8, false, 64) {
            Preview::Bytes(bytes) => {
                assert_eq!(&bytes[..2], &[0xFF, 0xFF]);
                assert!(bytes.ends_with(TRUNCATION_MARKER.as_bytes()));
            }
            other => panic!("expected byte preview, got {:?}", other),
        }
    }

    #[test]
    fn test_directories_have_no_preview() {
        let entry = text_entry("folder/", b"");
        assert!(entry.is_dir());
        assert_eq!(
            entry.peek(TextEncoding::Utf8, true, DEFAULT_PEEK_LIMIT),
            Preview::Folder
        );
    }
}
