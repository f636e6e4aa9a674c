//! Opened archives and the reading facade
//!
//! An [`Archive`] is the immutable result of parsing a stream: the decoded
//! entries, the raw records they came from, and the end-of-central-directory
//! summary. Editing always goes through a fresh [`EditableArchive`] produced
//! by [`Archive::edit`] or [`Archive::set_password`].

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::compression::CompressionMethod;
use crate::crypto::EncryptionMethod;
use crate::editor::EditableArchive;
use crate::encoding::TextEncoding;
use crate::entry::{ArchiveEntry, Preview};
use crate::error::Result;
use crate::reader::{self, ParsedArchive};
use crate::records::{
    CentralDirectoryHeader, EndOfCentralDirectory, LocalFileHeader, CENTRAL_DIRECTORY_SIG,
    END_OF_CENTRAL_DIRECTORY_SIG, LOCAL_FILE_HEADER_SIG,
};

/// An archive parsed into memory
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    raw_entries: Vec<(LocalFileHeader, Vec<u8>)>,
    cd_headers: Vec<CentralDirectoryHeader>,
    end: EndOfCentralDirectory,
    encoding: TextEncoding,
    comment: String,
}

impl Archive {
    /// Parse an archive from any byte stream.
    ///
    /// The stream is read to the end record and never closed here; pass
    /// `&mut reader` to keep using it afterwards.
    pub fn open<R: Read>(source: R) -> Result<Archive> {
        Self::open_with(source, None, TextEncoding::Utf8)
    }

    /// Parse an archive with a password for ZipCrypto entries and an
    /// encoding for non-UTF-8 filenames and comments.
    pub fn open_with<R: Read>(
        mut source: R,
        password: Option<&str>,
        encoding: TextEncoding,
    ) -> Result<Archive> {
        let parsed = reader::parse_archive(&mut source, password, encoding)?;
        Ok(Self::from_parsed(parsed, encoding))
    }

    /// Open and parse an archive file. The file handle is owned here and
    /// closed on every exit path.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Archive> {
        Self::open_path_with(path, None, TextEncoding::Utf8)
    }

    /// [`Archive::open_path`] with a password and filename encoding.
    pub fn open_path_with(
        path: impl AsRef<Path>,
        password: Option<&str>,
        encoding: TextEncoding,
    ) -> Result<Archive> {
        let file = File::open(path)?;
        Self::open_with(BufReader::new(file), password, encoding)
    }

    fn from_parsed(parsed: ParsedArchive, encoding: TextEncoding) -> Archive {
        let comment = encoding.decode(&parsed.end.comment);
        Archive {
            entries: parsed.entries,
            raw_entries: parsed.raw_entries,
            cd_headers: parsed.cd_headers,
            end: parsed.end,
            encoding,
            comment,
        }
    }

    /// The decoded entries, in archive order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Find an entry by its archive name
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// The archive-level comment
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Number of entries
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// The filename/comment encoding this archive was opened with
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The compression method shared by every file, or `None` when files
    /// mix methods. Directory markers are always stored and don't count.
    pub fn compression_method(&self) -> Option<CompressionMethod> {
        let mut shared = None;
        for entry in self.entries.iter().filter(|entry| !entry.is_dir()) {
            match shared {
                None => shared = Some(entry.compression_method()),
                Some(method) if method == entry.compression_method() => {}
                Some(_) => return None,
            }
        }
        shared
    }

    /// Re-stage every entry into a new unencrypted [`EditableArchive`],
    /// preserving compression method and level.
    pub fn edit(&self) -> Result<EditableArchive> {
        self.edit_with(None, EncryptionMethod::Unencrypted)
    }

    /// Re-stage every entry into a new [`EditableArchive`] with the given
    /// password and encryption scheme.
    ///
    /// Entries whose stored payload already matches the target encryption
    /// are re-staged byte-for-byte; everything else is rebuilt from its
    /// decoded contents.
    pub fn edit_with(
        &self,
        password: Option<&str>,
        encryption: EncryptionMethod,
    ) -> Result<EditableArchive> {
        let mut editable = EditableArchive::with_options(password, encryption, self.encoding);

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.is_dir() {
                editable.create_folder(entry.name())?;
                continue;
            }

            let reusable = entry.encryption_method() == EncryptionMethod::Unencrypted
                && editable.effective_encryption() == EncryptionMethod::Unencrypted;
            if reusable {
                let (local, payload) = self.raw_entries[index].clone();
                let central = self.cd_headers[index].clone();
                editable.restage_raw(entry.name().to_string(), local, payload, central)?;
                continue;
            }

            let method = if entry.compression_method().supports_encode() {
                entry.compression_method()
            } else {
                CompressionMethod::Stored
            };
            let mut options = crate::editor::EntryOptions::new()
                .compression(method)
                .level(entry.compression_level().unwrap_or_default())
                .encoding(self.encoding)
                .comment(entry.comment());
            if let Some(mtime) = entry.last_modified() {
                options = options.last_modified(mtime);
            }
            editable.create_file(entry.name(), entry.contents().to_vec(), &options)?;
        }

        Ok(editable)
    }

    /// [`Archive::edit_with`] that always sets a password.
    pub fn set_password(
        &self,
        password: &str,
        encryption: EncryptionMethod,
    ) -> Result<EditableArchive> {
        self.edit_with(Some(password), encryption)
    }

    /// Materialize every entry under `dest`.
    pub fn extract_all(&self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        for entry in &self.entries {
            entry.extract(dest)?;
        }
        Ok(())
    }

    /// Decode every entry for display as (name, preview) pairs.
    ///
    /// Directory markers preview as [`Preview::Folder`] and are skipped
    /// unless `include_dirs` is set.
    pub fn peek_all(
        &self,
        encoding: TextEncoding,
        include_dirs: bool,
        ignore_overflow: bool,
        char_limit: usize,
    ) -> Vec<(String, Preview)> {
        self.entries
            .iter()
            .filter(|entry| include_dirs || !entry.is_dir())
            .map(|entry| {
                (
                    entry.name().to_string(),
                    entry.peek(encoding, ignore_overflow, char_limit),
                )
            })
            .collect()
    }

    /// Re-emit the parsed records exactly as they were read.
    ///
    /// For archives without data descriptors this reproduces the original
    /// bytes.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<()> {
        for (header, payload) in &self.raw_entries {
            sink.write_all(&LOCAL_FILE_HEADER_SIG)?;
            header.write_to(&mut sink)?;
            sink.write_all(payload)?;
        }
        for header in &self.cd_headers {
            sink.write_all(&CENTRAL_DIRECTORY_SIG)?;
            header.write_to(&mut sink)?;
        }
        sink.write_all(&END_OF_CENTRAL_DIRECTORY_SIG)?;
        self.end.write_to(&mut sink)?;
        sink.flush()?;
        Ok(())
    }
}
