//! # zipedit: Read, Edit, and Write ZIP Archives
//!
//! `zipedit` parses PKZIP containers into typed, in-memory archives and
//! builds new ones from an editable staging table. Entries pass through a
//! full codec pipeline on both sides: ZipCrypto decryption, decompression,
//! and CRC verification on read; compression and encryption on write.
//!
//! ## Features
//!
//! - **Container parsing**: local file headers, the central directory, and
//!   the end record, with ZIP64 size/offset promotion
//! - **Codec dispatch**: Stored, Deflate, Deflate64, BZIP2, Zstandard, XZ
//! - **ZipCrypto**: the traditional PKWARE stream cipher, both directions
//! - **Editing**: an ordered staging table with automatic directory
//!   markers, atomic replacement, and deterministic layout
//! - **Bulk import**: folder trees fan out to a worker pool past a size
//!   threshold
//!
//! ## Reading an archive
//!
//! ```no_run
//! use zipedit::Archive;
//!
//! let archive = Archive::open_path("archive.zip")?;
//! for entry in archive.entries() {
//!     println!("{}: {} bytes", entry.name(), entry.uncompressed_size());
//! }
//! # Ok::<(), zipedit::ZipError>(())
//! ```
//!
//! ## Writing an archive
//!
//! ```no_run
//! use zipedit::{CompressionLevel, CompressionMethod, EditableArchive, EntryOptions};
//!
//! let mut archive = EditableArchive::new();
//! archive.create_file(
//!     "docs/lorem.txt",
//!     "Lorem ipsum dolor sit amet.",
//!     &EntryOptions::new()
//!         .compression(CompressionMethod::Deflate)
//!         .level(CompressionLevel::Maximum),
//! )?;
//! archive.save_path("new.zip", "archive comment")?;
//! # Ok::<(), zipedit::ZipError>(())
//! ```

pub mod archive;
mod byteio;
pub mod compression;
mod crypto;
mod dostime;
pub mod editor;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod host;
mod parallel;
mod reader;
mod records;
mod writer;

pub use archive::Archive;
pub use compression::{CompressionLevel, CompressionMethod};
pub use crypto::EncryptionMethod;
pub use editor::{EditableArchive, EntryData, EntryOptions};
pub use encoding::TextEncoding;
pub use entry::{ArchiveEntry, Preview, DEFAULT_PEEK_LIMIT};
pub use error::{Result, ZipError};
pub use host::{HostEnv, HostPlatform, NativeHost};
