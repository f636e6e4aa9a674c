//! Traditional PKWARE ZipCrypto stream cipher
//!
//! Legacy and cryptographically weak, but still the only password scheme
//! most ZIP tooling agrees on. Three 32-bit keys are seeded from the
//! password; every processed plaintext byte feeds back into the keys, and
//! each output byte is XOR-ed with a value derived from the third key.
//!
//! Encrypted payloads are prefixed with a 12-byte header: 11 random bytes
//! plus a check byte equal to the high byte of the entry's CRC-32. Decrypting
//! the header and comparing that final byte is how a wrong password is
//! detected without touching the payload.

use std::fmt;
use std::io;

use crate::error::{Result, ZipError};

/// Bytes of encryption header preceding an encrypted payload
pub(crate) const HEADER_LEN: usize = 12;

/// Encryption scheme applied to an entry's payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncryptionMethod {
    /// Payload is stored in the clear
    #[default]
    Unencrypted,
    /// Traditional PKWARE stream cipher
    ZipCrypto,
}

impl EncryptionMethod {
    /// Human-readable scheme name
    pub fn name(&self) -> &'static str {
        match self {
            EncryptionMethod::Unencrypted => "Unencrypted",
            EncryptionMethod::ZipCrypto => "ZipCrypto",
        }
    }
}

impl fmt::Display for EncryptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// The cipher needs the raw one-byte CRC-32 primitive (reflected polynomial
// 0xEDB88320), not a streaming hasher, so it carries its own table.
const CRC32_TABLE: [u32; 256] = crc_table();

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB88320
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

#[inline]
fn crc32_step(crc: u32, b: u8) -> u32 {
    CRC32_TABLE[((crc ^ b as u32) & 0xFF) as usize] ^ (crc >> 8)
}

/// The three rolling cipher keys
struct Keys {
    k0: u32,
    k1: u32,
    k2: u32,
}

impl Keys {
    fn new(password: &[u8]) -> Self {
        let mut keys = Keys {
            k0: 0x12345678,
            k1: 0x23456789,
            k2: 0x34567890,
        };
        for &b in password {
            keys.update(b);
        }
        keys
    }

    fn update(&mut self, b: u8) {
        self.k0 = crc32_step(self.k0, b);
        self.k1 = self
            .k1
            .wrapping_add(self.k0 & 0xFF)
            .wrapping_mul(134775813)
            .wrapping_add(1);
        self.k2 = crc32_step(self.k2, (self.k1 >> 24) as u8);
    }

    #[inline]
    fn stream_byte(&self) -> u8 {
        let t = (self.k2 | 2) as u16;
        (t.wrapping_mul(t ^ 1) >> 8) as u8
    }

    /// Encrypt one byte; the keys are fed the plaintext
    fn encrypt_byte(&mut self, plain: u8) -> u8 {
        let out = plain ^ self.stream_byte();
        self.update(plain);
        out
    }

    /// Decrypt one byte; the keys are fed the recovered plaintext
    fn decrypt_byte(&mut self, cipher: u8) -> u8 {
        let plain = cipher ^ self.stream_byte();
        self.update(plain);
        plain
    }
}

/// Encrypt `data`, prefixing the randomized 12-byte header.
///
/// `crc` is the CRC-32 of the entry's plaintext; its high byte becomes the
/// header check byte.
pub(crate) fn encrypt(password: &[u8], crc: u32, data: &[u8]) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_LEN];
    getrandom::getrandom(&mut header[..HEADER_LEN - 1])
        .map_err(|e| ZipError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
    header[HEADER_LEN - 1] = (crc >> 24) as u8;

    let mut keys = Keys::new(password);
    let mut out = Vec::with_capacity(HEADER_LEN + data.len());
    for &b in &header {
        out.push(keys.encrypt_byte(b));
    }
    for &b in data {
        out.push(keys.encrypt_byte(b));
    }
    Ok(out)
}

/// Decrypt `data`, stripping and verifying the 12-byte header.
///
/// The 12th decrypted header byte must equal the high byte of `expected_crc`
/// (the CRC from the entry's local header); a mismatch means the password is
/// wrong.
pub(crate) fn decrypt(password: &[u8], expected_crc: u32, data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_LEN {
        return Err(ZipError::BadFile(
            "encrypted entry shorter than its 12-byte header".to_string(),
        ));
    }

    let mut keys = Keys::new(password);
    let mut header = [0u8; HEADER_LEN];
    for (i, &b) in data[..HEADER_LEN].iter().enumerate() {
        header[i] = keys.decrypt_byte(b);
    }
    if header[HEADER_LEN - 1] != (expected_crc >> 24) as u8 {
        return Err(ZipError::WrongPassword);
    }

    Ok(data[HEADER_LEN..]
        .iter()
        .map(|&b| keys.decrypt_byte(b))
        .collect())
}
