//! Filename and comment text encodings
//!
//! APPNOTE gives archives two realistic choices: CP437 (the historical
//! default) and UTF-8 (signaled per entry by general-purpose bit 11).

use std::fmt;
use std::str::FromStr;

use codepage_437::{FromCp437, ToCp437, CP437_CONTROL};

use crate::error::{Result, ZipError};

/// Character encoding for filenames and comments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 (the default; lossy on malformed input)
    #[default]
    Utf8,
    /// IBM code page 437
    Cp437,
}

impl TextEncoding {
    /// Decode raw header bytes to text. Malformed UTF-8 is replaced rather
    /// than failed; every byte sequence is valid CP437.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Cp437 => String::from_cp437(bytes.to_vec(), &CP437_CONTROL),
        }
    }

    /// Encode text for a header field.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Cp437 => text
                .to_cp437(&CP437_CONTROL)
                .map(|cow| cow.into_owned())
                .map_err(|_| ZipError::Encoding("cp437")),
        }
    }

    /// The encoding's label
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp437 => "cp437",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = ZipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "cp437" | "ibm437" => Ok(TextEncoding::Cp437),
            _ => Err(ZipError::Encoding("an unrecognized encoding label")),
        }
    }
}
