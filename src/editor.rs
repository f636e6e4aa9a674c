//! Editable archive staging
//!
//! An [`EditableArchive`] is an ordered table of fully-encoded entries (local
//! header, payload, central directory header) keyed by canonical `/`-separated
//! path. Every mutation keeps the table consistent: ancestor directories
//! exist for every file, keys are unique, and the running central-directory
//! size tracks each insert, replace, and removal. Saving is then a single
//! sequential pass that only has to assign offsets.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use walkdir::WalkDir;

use crate::archive::Archive;
use crate::compression::{self, CompressionLevel, CompressionMethod};
use crate::crypto::{self, EncryptionMethod};
use crate::dostime;
use crate::encoding::TextEncoding;
use crate::error::{Result, ZipError};
use crate::host::{HostEnv, HostPlatform, NativeHost};
use crate::parallel;
use crate::records::{
    build_zip64_body, replace_extra_record, CentralDirectoryHeader, LocalFileHeader,
    FLAG_ENCRYPTED, FLAG_LEVEL_FAST, FLAG_LEVEL_MAXIMUM, FLAG_UTF8, VERSION_MADE_BY,
    ZIP64_EXTRA_ID, ZIP64_MARKER,
};
use crate::writer;

/// External-attribute bit marking a directory entry
const ATTR_DIRECTORY: u32 = 0x10;
/// External-attribute bit marking a regular file entry
const ATTR_FILE: u32 = 0x20;

/// Characters never accepted in caller-supplied archive paths
const FORBIDDEN_PATH_CHARS: &[char] = &[
    '#', '%', '&', '{', '}', '<', '>', '*', '?', '$', '!', '\'', '"', ':', '@', '+', '`', '|',
    '=',
];

/// One fully-encoded staged entry
#[derive(Debug, Clone)]
pub(crate) struct StagedEntry {
    pub local: LocalFileHeader,
    pub payload: Vec<u8>,
    pub central: CentralDirectoryHeader,
}

impl StagedEntry {
    /// Bytes this entry contributes to the central directory, signature
    /// included
    pub fn cd_len(&self) -> u64 {
        4 + self.central.encoded_len()
    }
}

/// Owned staging parameters shared with fan-out workers
#[derive(Debug, Clone)]
pub(crate) struct StagingContext {
    pub password: Option<String>,
    pub encryption: EncryptionMethod,
    pub platform: HostPlatform,
}

/// Data for a new entry: bytes, text to encode, or a stream to drain
pub enum EntryData {
    /// Raw bytes, stored as-is
    Bytes(Vec<u8>),
    /// Text, encoded with the entry's encoding when staged
    Text(String),
    /// A reader drained when the entry is staged
    Stream(Box<dyn Read>),
}

impl EntryData {
    /// Wrap a reader as entry data
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        EntryData::Stream(Box::new(reader))
    }

    fn into_bytes(self, encoding: TextEncoding) -> Result<Vec<u8>> {
        match self {
            EntryData::Bytes(bytes) => Ok(bytes),
            EntryData::Text(text) => encoding.encode(&text),
            EntryData::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

impl fmt::Debug for EntryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryData::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            EntryData::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            EntryData::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&str> for EntryData {
    fn from(text: &str) -> Self {
        EntryData::Text(text.to_string())
    }
}

impl From<String> for EntryData {
    fn from(text: String) -> Self {
        EntryData::Text(text)
    }
}

impl From<Vec<u8>> for EntryData {
    fn from(bytes: Vec<u8>) -> Self {
        EntryData::Bytes(bytes)
    }
}

impl From<&[u8]> for EntryData {
    fn from(bytes: &[u8]) -> Self {
        EntryData::Bytes(bytes.to_vec())
    }
}

/// Per-entry staging knobs
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
    pub(crate) compression: CompressionMethod,
    pub(crate) level: CompressionLevel,
    pub(crate) encoding: TextEncoding,
    pub(crate) comment: String,
    pub(crate) last_modified: Option<NaiveDateTime>,
}

impl EntryOptions {
    /// Stored, normal level, UTF-8, no comment, mtime from the clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression method
    pub fn compression(mut self, method: CompressionMethod) -> Self {
        self.compression = method;
        self
    }

    /// Set the compression effort for the Deflate family
    pub fn level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the encoding for the entry's name, comment, and text data
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Attach a per-entry comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Pin the modification time instead of using the wall clock
    pub fn last_modified(mut self, when: NaiveDateTime) -> Self {
        self.last_modified = Some(when);
        self
    }
}

/// A mutable, ordered staging table for building or rewriting an archive
pub struct EditableArchive {
    entries: BTreeMap<String, StagedEntry>,
    cd_size: u64,
    password: Option<String>,
    encryption: EncryptionMethod,
    encoding: TextEncoding,
    host: Arc<dyn HostEnv>,
}

impl Default for EditableArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl EditableArchive {
    /// An empty staged archive: unencrypted, UTF-8
    pub fn new() -> Self {
        Self::with_options(None, EncryptionMethod::Unencrypted, TextEncoding::Utf8)
    }

    /// An empty staged archive with a password, encryption scheme, and
    /// filename/comment encoding.
    ///
    /// Entries are only encrypted when both a password and a scheme other
    /// than `Unencrypted` are present.
    pub fn with_options(
        password: Option<&str>,
        encryption: EncryptionMethod,
        encoding: TextEncoding,
    ) -> Self {
        EditableArchive {
            entries: BTreeMap::new(),
            cd_size: 0,
            password: password.map(str::to_string),
            encryption,
            encoding,
            host: Arc::new(NativeHost),
        }
    }

    /// Replace the host environment; staging consults it for the platform
    /// id, the clock, and source-file metadata.
    pub fn with_host(mut self, host: Arc<dyn HostEnv>) -> Self {
        self.host = host;
        self
    }

    /// Number of staged entries, directory markers included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the staging table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The archive-level filename/comment encoding
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn context(&self) -> StagingContext {
        StagingContext {
            password: self.password.clone(),
            encryption: self.encryption,
            platform: self.host.platform(),
        }
    }

    /// Stage a file at `path` from in-memory data.
    ///
    /// `path` uses `/` or `\` as separator; missing ancestor directories are
    /// created. Staging an existing path replaces it.
    pub fn create_file(
        &mut self,
        path: &str,
        data: impl Into<EntryData>,
        options: &EntryOptions,
    ) -> Result<()> {
        let key = canonical_file_path(path)?;
        let bytes = data.into().into_bytes(options.encoding)?;
        self.ensure_directories(&key)?;

        let mtime = options.last_modified.unwrap_or_else(|| self.host.now());
        let staged = build_file_entry(&self.context(), &key, &bytes, options, mtime, None)?;
        self.insert_staged(key, staged);
        Ok(())
    }

    /// Stage a file at `path` with the contents of the filesystem file at
    /// `source`, capturing its modification time and mode.
    pub fn add_file(
        &mut self,
        source: impl AsRef<Path>,
        path: &str,
        options: &EntryOptions,
    ) -> Result<()> {
        let source = source.as_ref();
        let bytes = read_source(source)?;
        let key = canonical_file_path(path)?;
        self.ensure_directories(&key)?;

        let mtime = options
            .last_modified
            .or_else(|| self.host.modified(source))
            .unwrap_or_else(|| self.host.now());
        let mode = self.host.unix_mode(source);
        let staged = build_file_entry(&self.context(), &key, &bytes, options, mtime, mode)?;
        self.insert_staged(key, staged);
        Ok(())
    }

    /// Ensure the directory at `path` and all its ancestors exist.
    /// Idempotent. Returns the canonical `/`-terminated key.
    pub fn create_folder(&mut self, path: &str) -> Result<String> {
        let key = canonical_dir_path(path)?;
        self.ensure_directories(&key)?;
        Ok(key)
    }

    /// Stage the contents of the filesystem directory `source` under the
    /// archive folder `dest`.
    ///
    /// With `use_parallel`, trees of [`parallel::PARALLEL_FILE_THRESHOLD`]
    /// files or more are compressed on a worker pool; directory markers are
    /// always staged by the caller thread first.
    pub fn add_folder(
        &mut self,
        source: impl AsRef<Path>,
        dest: &str,
        options: &EntryOptions,
        use_parallel: bool,
    ) -> Result<()> {
        let source = source.as_ref();
        if !source.is_dir() {
            return Err(ZipError::FileNotFound(source.display().to_string()));
        }
        let dest_key = self.create_folder(dest)?;

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for item in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let item = item.map_err(io::Error::from).map_err(ZipError::Io)?;
            let relative = item
                .path()
                .strip_prefix(source)
                .map_err(|_| ZipError::FileNotFound(item.path().display().to_string()))?;
            let relative = path_to_archive_name(relative);
            let key = format!("{dest_key}{relative}");

            if item.file_type().is_dir() {
                self.create_folder(&key)?;
            } else if item.file_type().is_file() {
                files.push((key, item.into_path()));
            }
        }

        if use_parallel && files.len() >= parallel::PARALLEL_FILE_THRESHOLD {
            let staged =
                parallel::stage_files(files, &self.context(), options, self.host.as_ref())?;
            for (key, entry) in staged {
                self.insert_staged(key, entry);
            }
        } else {
            let ctx = self.context();
            for (key, path) in files {
                let bytes = read_source(&path)?;
                let mtime = options
                    .last_modified
                    .or_else(|| self.host.modified(&path))
                    .unwrap_or_else(|| self.host.now());
                let mode = self.host.unix_mode(&path);
                let staged = build_file_entry(&ctx, &key, &bytes, options, mtime, mode)?;
                self.insert_staged(key, staged);
            }
        }
        Ok(())
    }

    /// Re-root every entry of another archive whose name starts with
    /// `subtree` under the archive folder `dest`, preserving compression
    /// where re-encodable.
    pub fn add_from_archive(
        &mut self,
        source: impl AsRef<Path>,
        subtree: &str,
        dest: &str,
        password: Option<&str>,
    ) -> Result<()> {
        let archive = Archive::open_path_with(source, password, self.encoding)?;
        let subtree_key = canonical_dir_path(subtree)?;
        let dest_key = self.create_folder(dest)?;

        let mut matched = false;
        for entry in archive.entries() {
            let Some(relative) = entry.name().strip_prefix(subtree_key.as_str()) else {
                continue;
            };
            matched = true;
            if relative.is_empty() {
                continue;
            }
            let key = format!("{dest_key}{relative}");
            if entry.is_dir() {
                self.create_folder(&key)?;
                continue;
            }

            let method = if entry.compression_method().supports_encode() {
                entry.compression_method()
            } else {
                CompressionMethod::Stored
            };
            let mut options = EntryOptions::new()
                .compression(method)
                .level(entry.compression_level().unwrap_or_default())
                .encoding(self.encoding)
                .comment(entry.comment());
            if let Some(mtime) = entry.last_modified() {
                options = options.last_modified(mtime);
            }
            self.create_file(&key, entry.contents().to_vec(), &options)?;
        }

        if !matched {
            return Err(ZipError::FileNotFound(subtree.to_string()));
        }
        Ok(())
    }

    /// Replace the contents of an already-staged file, keeping its
    /// compression method, level, and comment.
    pub fn edit_file(&mut self, path: &str, data: impl Into<EntryData>) -> Result<()> {
        let key = canonical_file_path(path)?;
        let (method, level, encoding, comment, mtime) = {
            let staged = self
                .entries
                .get(&key)
                .ok_or_else(|| ZipError::FileNotFound(path.to_string()))?;
            let method = CompressionMethod::from_id(staged.local.method_id)?;
            let level = compression::level_from_flags(method, staged.local.flags)
                .unwrap_or_default();
            let encoding = if staged.local.flags & FLAG_UTF8 != 0 {
                TextEncoding::Utf8
            } else {
                self.encoding
            };
            let comment = encoding.decode(&staged.central.comment);
            let mtime = dostime::decode(staged.local.mod_time, staged.local.mod_date);
            (method, level, encoding, comment, mtime)
        };

        let mut options = EntryOptions::new()
            .compression(method)
            .level(level)
            .encoding(encoding)
            .comment(comment);
        if let Some(mtime) = mtime {
            options = options.last_modified(mtime);
        }
        self.create_file(&key, data, &options)
    }

    /// Remove a staged file, or a directory with all its descendants, or
    /// everything when `path` is empty. Returns the removed keys.
    pub fn remove(&mut self, path: &str) -> Result<Vec<String>> {
        if path.is_empty() {
            let removed: Vec<String> = self.entries.keys().cloned().collect();
            self.entries.clear();
            self.cd_size = 0;
            return Ok(removed);
        }

        let file_key = canonical_file_path(path)?;
        if self.entries.contains_key(&file_key) {
            self.remove_key(&file_key);
            return Ok(vec![file_key]);
        }

        let dir_key = format!("{file_key}/");
        if self.entries.contains_key(&dir_key) {
            let removed: Vec<String> = self
                .entries
                .keys()
                .filter(|key| key.starts_with(&dir_key))
                .cloned()
                .collect();
            for key in &removed {
                self.remove_key(key);
            }
            return Ok(removed);
        }

        Err(ZipError::FileNotFound(path.to_string()))
    }

    /// Sorted keys under `subtree` (the whole table when `subtree` is
    /// empty), directory markers included.
    pub fn get_structure(&self, subtree: &str) -> Result<Vec<String>> {
        if subtree.is_empty() {
            return Ok(self.entries.keys().cloned().collect());
        }
        let dir_key = canonical_dir_path(subtree)?;
        if !self.entries.contains_key(&dir_key) {
            return Err(ZipError::FileNotFound(subtree.to_string()));
        }
        Ok(self
            .entries
            .keys()
            .filter(|key| key.starts_with(&dir_key))
            .cloned()
            .collect())
    }

    /// Serialize the staged table to `sink` with an archive comment.
    pub fn save<W: Write>(&self, sink: W, comment: &str) -> Result<()> {
        let comment = self.encoding.encode(comment)?;
        writer::write_archive(sink, self.entries.values(), &comment, self.cd_size)
    }

    /// Serialize the staged table to a new file at `path`.
    pub fn save_path(&self, path: impl AsRef<Path>, comment: &str) -> Result<()> {
        let file = File::create(path)?;
        self.save(BufWriter::new(file), comment)
    }

    /// Re-insert a parsed raw entry unchanged. Used when re-staging an
    /// opened archive without touching its payloads.
    pub(crate) fn restage_raw(
        &mut self,
        key: String,
        local: LocalFileHeader,
        payload: Vec<u8>,
        central: CentralDirectoryHeader,
    ) -> Result<()> {
        self.ensure_directories(&key)?;
        self.insert_staged(
            key,
            StagedEntry {
                local,
                payload,
                central,
            },
        );
        Ok(())
    }

    /// Whether staged payloads are actually encrypted
    pub(crate) fn effective_encryption(&self) -> EncryptionMethod {
        if self.password.is_some() {
            self.encryption
        } else {
            EncryptionMethod::Unencrypted
        }
    }

    fn insert_staged(&mut self, key: String, staged: StagedEntry) {
        let added = staged.cd_len();
        if let Some(old) = self.entries.insert(key, staged) {
            self.cd_size = self.cd_size - old.cd_len() + added;
        } else {
            self.cd_size += added;
        }
    }

    fn remove_key(&mut self, key: &str) {
        if let Some(old) = self.entries.remove(key) {
            self.cd_size -= old.cd_len();
        }
    }

    /// Insert every missing directory marker on the way to `key`.
    fn ensure_directories(&mut self, key: &str) -> Result<()> {
        let ctx = self.context();
        let now = self.host.now();
        for dir in ancestor_dirs(key) {
            if self.entries.contains_key(&dir) {
                continue;
            }
            let staged = build_dir_entry(&ctx, &dir, self.encoding, now)?;
            self.insert_staged(dir, staged);
        }
        Ok(())
    }
}

pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ZipError::FileNotFound(path.display().to_string())
        } else {
            ZipError::Io(err)
        }
    })
}

fn path_to_archive_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize a caller path to a canonical `/`-separated key without a
/// trailing separator.
fn canonical_file_path(path: &str) -> Result<String> {
    let normalized = path.replace('\\', "/");
    let trimmed = normalized
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string();
    if trimmed.is_empty() {
        return Err(ZipError::IllegalPath(path.to_string()));
    }
    for segment in trimmed.split('/') {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(FORBIDDEN_PATH_CHARS)
        {
            return Err(ZipError::IllegalPath(path.to_string()));
        }
    }
    Ok(trimmed)
}

/// Normalize a caller path to a canonical `/`-terminated directory key.
fn canonical_dir_path(path: &str) -> Result<String> {
    Ok(canonical_file_path(path)? + "/")
}

/// Every `/`-terminated prefix of `key`: the ancestor directories of a file
/// key, or the directory chain including itself for a directory key.
fn ancestor_dirs(key: &str) -> Vec<String> {
    key.char_indices()
        .filter(|(_, ch)| *ch == '/')
        .map(|(i, _)| key[..=i].to_string())
        .collect()
}

/// Minimal PKZIP version able to extract an entry with these properties.
fn version_needed(
    method: CompressionMethod,
    encrypted: bool,
    zip64: bool,
    key: &str,
    is_dir: bool,
) -> u16 {
    let mut version = 10;
    let in_subfolder = key.trim_end_matches('/').contains('/');
    if encrypted || method == CompressionMethod::Deflate || is_dir || in_subfolder {
        version = 20;
    }
    if method == CompressionMethod::Deflate64 {
        version = version.max(21);
    }
    if method == CompressionMethod::Imploding {
        version = version.max(25);
    }
    if zip64 {
        version = version.max(45);
    }
    if method == CompressionMethod::Bzip2 {
        version = version.max(46);
    }
    version
}

/// Encode, encrypt, and wrap one file's bytes into a staged entry.
pub(crate) fn build_file_entry(
    ctx: &StagingContext,
    key: &str,
    bytes: &[u8],
    options: &EntryOptions,
    mtime: NaiveDateTime,
    unix_mode: Option<u32>,
) -> Result<StagedEntry> {
    if !options.compression.supports_encode() {
        return Err(ZipError::NotImplemented(format!(
            "compressing with {}",
            options.compression.name()
        )));
    }

    let crc32 = crc32fast::hash(bytes);
    let compressed = compression::compress(options.compression, options.level, bytes)?;

    let (payload, encrypted) = match (ctx.encryption, ctx.password.as_deref()) {
        (EncryptionMethod::ZipCrypto, Some(password)) => {
            (crypto::encrypt(password.as_bytes(), crc32, &compressed)?, true)
        }
        _ => (compressed, false),
    };

    let uncompressed_size = bytes.len() as u64;
    let compressed_size = payload.len() as u64;
    let zip64 =
        uncompressed_size >= ZIP64_MARKER as u64 || compressed_size >= ZIP64_MARKER as u64;
    let (uncompressed_size32, compressed_size32) = if zip64 {
        (ZIP64_MARKER, ZIP64_MARKER)
    } else {
        (uncompressed_size as u32, compressed_size as u32)
    };

    let mut flags = 0u16;
    if encrypted {
        flags |= FLAG_ENCRYPTED;
    }
    if matches!(
        options.compression,
        CompressionMethod::Deflate | CompressionMethod::Deflate64
    ) {
        flags |= match options.level {
            CompressionLevel::Maximum => FLAG_LEVEL_MAXIMUM,
            CompressionLevel::Fast => FLAG_LEVEL_FAST,
            CompressionLevel::SuperFast => FLAG_LEVEL_MAXIMUM | FLAG_LEVEL_FAST,
            CompressionLevel::Normal => 0,
        };
    }
    if options.encoding == TextEncoding::Utf8 && std::str::from_utf8(bytes).is_ok() {
        flags |= FLAG_UTF8;
    }

    let file_name = options.encoding.encode(key)?;
    let comment = options.encoding.encode(&options.comment)?;
    let (mod_time, mod_date) = dostime::encode(&mtime);
    let version = version_needed(options.compression, encrypted, zip64, key, false);

    let mut local_extra = Vec::new();
    let mut central_extra = Vec::new();
    if zip64 {
        replace_extra_record(
            &mut local_extra,
            ZIP64_EXTRA_ID,
            build_zip64_body(Some(uncompressed_size), Some(compressed_size), None),
        );
        // offset placeholder; save() patches the real value in
        replace_extra_record(
            &mut central_extra,
            ZIP64_EXTRA_ID,
            build_zip64_body(Some(uncompressed_size), Some(compressed_size), Some(0)),
        );
    }

    let mut external_attrs = ATTR_FILE;
    if ctx.platform.uses_unix_mode() {
        if let Some(mode) = unix_mode {
            external_attrs |= (mode & 0xFFFF) << 16;
        }
    }

    let local = LocalFileHeader {
        version_needed: version,
        flags,
        method_id: options.compression.id(),
        mod_time,
        mod_date,
        crc32,
        compressed_size32,
        uncompressed_size32,
        file_name: file_name.clone(),
        extra_field: local_extra,
    };

    let central = CentralDirectoryHeader {
        version_made_by: VERSION_MADE_BY,
        platform: ctx.platform.id(),
        version_needed: version,
        flags,
        method_id: options.compression.id(),
        mod_time,
        mod_date,
        crc32,
        compressed_size32,
        uncompressed_size32,
        disk_number_start: 0,
        internal_attrs: 0,
        external_attrs,
        local_header_offset32: if zip64 { ZIP64_MARKER } else { 0 },
        file_name,
        extra_field: central_extra,
        comment,
    };

    Ok(StagedEntry {
        local,
        payload,
        central,
    })
}

/// Build a directory marker: stored, empty, CRC zero.
fn build_dir_entry(
    ctx: &StagingContext,
    key: &str,
    encoding: TextEncoding,
    mtime: NaiveDateTime,
) -> Result<StagedEntry> {
    let file_name = encoding.encode(key)?;
    let (mod_time, mod_date) = dostime::encode(&mtime);
    let version = version_needed(CompressionMethod::Stored, false, false, key, true);

    let local = LocalFileHeader {
        version_needed: version,
        flags: 0,
        method_id: CompressionMethod::Stored.id(),
        mod_time,
        mod_date,
        crc32: 0,
        compressed_size32: 0,
        uncompressed_size32: 0,
        file_name: file_name.clone(),
        extra_field: Vec::new(),
    };

    let central = CentralDirectoryHeader {
        version_made_by: VERSION_MADE_BY,
        platform: ctx.platform.id(),
        version_needed: version,
        flags: 0,
        method_id: CompressionMethod::Stored.id(),
        mod_time,
        mod_date,
        crc32: 0,
        compressed_size32: 0,
        uncompressed_size32: 0,
        disk_number_start: 0,
        internal_attrs: 0,
        external_attrs: ATTR_DIRECTORY,
        local_header_offset32: 0,
        file_name,
        extra_field: Vec::new(),
        comment: Vec::new(),
    };

    Ok(StagedEntry {
        local,
        payload: Vec::new(),
        central,
    })
}
