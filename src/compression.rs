//! Compression method dispatch
//!
//! Maps PKZIP numeric method ids to named methods and forwards entry
//! payloads to the matching codec. Reserved and deprecated ids are
//! diagnosed as such instead of lumped in with unknown ones.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use flate2::Compression;

use crate::error::{Result, ZipError};

/// Compression scheme applied to an entry's payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// No compression
    #[default]
    Stored,
    /// DEFLATE (method 8)
    Deflate,
    /// DEFLATE64 with the 64 KiB window (method 9)
    Deflate64,
    /// PKWARE Data Compression Library imploding (method 10)
    Imploding,
    /// BZIP2 (method 12)
    Bzip2,
    /// IBM LZ77 z Architecture (method 19)
    Lz77,
    /// Zstandard (method 93)
    Zstandard,
    /// XZ (method 95)
    Xz,
}

impl CompressionMethod {
    /// The APPNOTE method id
    pub fn id(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Deflate64 => 9,
            CompressionMethod::Imploding => 10,
            CompressionMethod::Bzip2 => 12,
            CompressionMethod::Lz77 => 19,
            CompressionMethod::Zstandard => 93,
            CompressionMethod::Xz => 95,
        }
    }

    /// Resolve an APPNOTE method id, distinguishing reserved and deprecated
    /// ids from plainly unknown ones.
    pub fn from_id(id: u16) -> Result<Self> {
        match id {
            0 => Ok(CompressionMethod::Stored),
            8 => Ok(CompressionMethod::Deflate),
            9 => Ok(CompressionMethod::Deflate64),
            10 => Ok(CompressionMethod::Imploding),
            12 => Ok(CompressionMethod::Bzip2),
            19 => Ok(CompressionMethod::Lz77),
            93 => Ok(CompressionMethod::Zstandard),
            95 => Ok(CompressionMethod::Xz),
            11 | 13 | 15 | 17 => Err(ZipError::ReservedValue(id)),
            6 | 7 | 20 => Err(ZipError::Deprecated(id)),
            other => Err(ZipError::UnknownMethod(other)),
        }
    }

    /// Human-readable method name
    pub fn name(&self) -> &'static str {
        match self {
            CompressionMethod::Stored => "Stored",
            CompressionMethod::Deflate => "Deflate",
            CompressionMethod::Deflate64 => "Deflate64",
            CompressionMethod::Imploding => "PKWARE Imploding",
            CompressionMethod::Bzip2 => "BZIP2",
            CompressionMethod::Lz77 => "LZ77",
            CompressionMethod::Zstandard => "Zstandard",
            CompressionMethod::Xz => "XZ",
        }
    }

    /// Whether this library can produce payloads with this method
    pub fn supports_encode(&self) -> bool {
        !matches!(
            self,
            CompressionMethod::Imploding | CompressionMethod::Lz77
        )
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression effort for the Deflate family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Favor speed
    Fast,
    /// The default trade-off
    #[default]
    Normal,
    /// Favor ratio
    Maximum,
    /// Reserved level hint found in the wild; decoded but never emitted
    SuperFast,
}

impl CompressionLevel {
    /// Numeric deflate level for this label
    pub(crate) fn deflate_level(&self) -> u32 {
        match self {
            CompressionLevel::SuperFast => 1,
            CompressionLevel::Fast => 3,
            CompressionLevel::Normal => 6,
            CompressionLevel::Maximum => 12,
        }
    }

    /// Human-readable level name
    pub fn name(&self) -> &'static str {
        match self {
            CompressionLevel::Fast => "Fast",
            CompressionLevel::Normal => "Normal",
            CompressionLevel::Maximum => "Maximum",
            CompressionLevel::SuperFast => "Super-fast",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionLevel {
    type Err = ZipError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Fast" => Ok(CompressionLevel::Fast),
            "Normal" => Ok(CompressionLevel::Normal),
            "Maximum" => Ok(CompressionLevel::Maximum),
            "Super-fast" => Ok(CompressionLevel::SuperFast),
            other => Err(ZipError::BadFile(format!(
                "unknown compression level: {other}"
            ))),
        }
    }
}

/// Deflate effort recorded in general-purpose flag bits 1-2, for methods
/// that have one.
pub(crate) fn level_from_flags(method: CompressionMethod, flags: u16) -> Option<CompressionLevel> {
    use crate::records::{FLAG_LEVEL_FAST, FLAG_LEVEL_MAXIMUM};

    if !matches!(
        method,
        CompressionMethod::Deflate | CompressionMethod::Deflate64
    ) {
        return None;
    }
    let maximum = flags & FLAG_LEVEL_MAXIMUM != 0;
    let fast = flags & FLAG_LEVEL_FAST != 0;
    Some(match (maximum, fast) {
        (true, true) => CompressionLevel::SuperFast,
        (true, false) => CompressionLevel::Maximum,
        (false, true) => CompressionLevel::Fast,
        (false, false) => CompressionLevel::Normal,
    })
}

/// Compress `data` with the given method and level.
pub(crate) fn compress(
    method: CompressionMethod,
    level: CompressionLevel,
    data: &[u8],
) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::Stored => Ok(data.to_vec()),
        // Every deflate stream is a valid deflate64 stream; the 64 KiB
        // window only matters on decode.
        CompressionMethod::Deflate | CompressionMethod::Deflate64 => {
            // flate2 tops out at 9
            let level = Compression::new(level.deflate_level().min(9));
            let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), level);
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }
        CompressionMethod::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }
        CompressionMethod::Zstandard => Ok(zstd::encode_all(data, 0)?),
        CompressionMethod::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }
        CompressionMethod::Imploding | CompressionMethod::Lz77 => Err(ZipError::NotImplemented(
            format!("compressing with {}", method.name()),
        )),
    }
}

/// Decompress `data` with the given method.
///
/// `size_hint` is the uncompressed size from the entry headers, used only to
/// pre-size the output buffer.
pub(crate) fn decompress(
    method: CompressionMethod,
    size_hint: u64,
    data: &[u8],
) -> Result<Vec<u8>> {
    let capacity = usize::try_from(size_hint).unwrap_or(0);
    match method {
        CompressionMethod::Stored => Ok(data.to_vec()),
        CompressionMethod::Deflate => {
            let mut out = Vec::with_capacity(capacity);
            flate2::read::DeflateDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
        CompressionMethod::Deflate64 => {
            let mut out = Vec::with_capacity(capacity);
            deflate64::Deflate64Decoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
        CompressionMethod::Bzip2 => {
            let mut out = Vec::with_capacity(capacity);
            bzip2::read::BzDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
        CompressionMethod::Zstandard => Ok(zstd::decode_all(data)?),
        CompressionMethod::Xz => {
            let mut out = Vec::with_capacity(capacity);
            xz2::read::XzDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
        CompressionMethod::Imploding | CompressionMethod::Lz77 => Err(ZipError::NotImplemented(
            format!("decompressing {}", method.name()),
        )),
    }
}
