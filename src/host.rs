//! Host environment used while staging entries
//!
//! Platform detection, the wall clock, and filesystem metadata reads are
//! funneled through one injectable object so staging behaves identically
//! under test on any OS, and so the core never consults globals.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};

/// Originating platform recorded in central directory headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    /// MS-DOS and OS/2 FAT family
    MsDos,
    /// Unix
    Unix,
    /// Windows NTFS
    WindowsNtfs,
    /// OS X (Darwin)
    Osx,
}

impl HostPlatform {
    /// APPNOTE host id (high byte of `version made by`)
    pub fn id(&self) -> u8 {
        match self {
            HostPlatform::MsDos => 0,
            HostPlatform::Unix => 3,
            HostPlatform::WindowsNtfs => 10,
            HostPlatform::Osx => 19,
        }
    }

    /// Whether external attributes carry a Unix mode in their high bits
    pub(crate) fn uses_unix_mode(&self) -> bool {
        matches!(self, HostPlatform::Unix | HostPlatform::Osx)
    }
}

/// Environment the editable archive stages entries against
pub trait HostEnv: Send + Sync {
    /// Platform recorded on new central directory headers
    fn platform(&self) -> HostPlatform;

    /// Current local wall-clock time, for entries without an explicit mtime
    fn now(&self) -> NaiveDateTime;

    /// Unix permission bits of a source file, where the platform has them
    fn unix_mode(&self, path: &Path) -> Option<u32>;

    /// Last-modified time of a source file
    fn modified(&self, path: &Path) -> Option<NaiveDateTime>;
}

/// The process's real host
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHost;

impl HostEnv for NativeHost {
    fn platform(&self) -> HostPlatform {
        if cfg!(target_os = "macos") {
            HostPlatform::Osx
        } else if cfg!(unix) {
            HostPlatform::Unix
        } else if cfg!(windows) {
            HostPlatform::WindowsNtfs
        } else {
            HostPlatform::MsDos
        }
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    #[cfg(unix)]
    fn unix_mode(&self, path: &Path) -> Option<u32> {
        use std::os::unix::fs::MetadataExt;
        fs::metadata(path).ok().map(|meta| meta.mode())
    }

    #[cfg(not(unix))]
    fn unix_mode(&self, _path: &Path) -> Option<u32> {
        None
    }

    fn modified(&self, path: &Path) -> Option<NaiveDateTime> {
        let modified = fs::metadata(path).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified).naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_ids() {
        assert_eq!(HostPlatform::MsDos.id(), 0);
        assert_eq!(HostPlatform::Unix.id(), 3);
        assert_eq!(HostPlatform::WindowsNtfs.id(), 10);
        assert_eq!(HostPlatform::Osx.id(), 19);
    }

    #[test]
    fn test_native_host_clock_is_dos_representable() {
        let now = NativeHost.now();
        let (time, date) = crate::dostime::encode(&now);
        assert!(crate::dostime::decode(time, date).is_some());
    }
}
