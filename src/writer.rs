//! Archive serialization
//!
//! One sequential pass over the staged table: every local header and payload
//! goes out first while a running byte offset is recorded into each entry's
//! central directory header (patching ZIP64 offset slots where needed), then
//! the central directory, then the 32-bit end record. Nothing is retried; an
//! I/O error leaves the sink truncated and is reported as-is.

use std::io::Write;

use log::debug;

use crate::editor::StagedEntry;
use crate::error::Result;
use crate::records::{
    EndOfCentralDirectory, CENTRAL_DIRECTORY_SIG, END_OF_CENTRAL_DIRECTORY_SIG,
    LOCAL_FILE_HEADER_SIG, ZIP64_MARKER,
};

fn clamp32(value: u64) -> u32 {
    if value > ZIP64_MARKER as u64 {
        ZIP64_MARKER
    } else {
        value as u32
    }
}

/// Serialize staged entries, in iteration order, to `sink`.
///
/// `expected_cd_size` is the table's running central-directory size; the
/// emitted directory must match it unless save-time offset promotion grew an
/// extra field.
pub(crate) fn write_archive<'a, W, I>(
    mut sink: W,
    entries: I,
    comment: &[u8],
    expected_cd_size: u64,
) -> Result<()>
where
    W: Write,
    I: Iterator<Item = &'a StagedEntry>,
{
    let mut offset: u64 = 0;
    let mut cd_headers = Vec::new();

    for staged in entries {
        let mut central = staged.central.clone();
        central.set_local_header_offset(offset);

        sink.write_all(&LOCAL_FILE_HEADER_SIG)?;
        staged.local.write_to(&mut sink)?;
        sink.write_all(&staged.payload)?;

        offset += 4 + staged.local.encoded_len() + staged.payload.len() as u64;
        cd_headers.push(central);
    }

    let cd_offset = offset;
    let mut cd_size: u64 = 0;
    for central in &cd_headers {
        sink.write_all(&CENTRAL_DIRECTORY_SIG)?;
        central.write_to(&mut sink)?;
        cd_size += 4 + central.encoded_len();
    }

    if cd_size != expected_cd_size {
        // offset promotion is the only thing allowed to grow the directory
        debug!(
            "central directory grew from {} to {} bytes during offset assignment",
            expected_cd_size, cd_size
        );
    }

    let total = cd_headers.len().min(u16::MAX as usize) as u16;
    let end = EndOfCentralDirectory {
        disk_number: 0,
        cd_disk_number: 0,
        total_entries: total,
        total_cd_entries: total,
        cd_size: clamp32(cd_size),
        cd_offset: clamp32(cd_offset),
        comment: comment.to_vec(),
    };
    sink.write_all(&END_OF_CENTRAL_DIRECTORY_SIG)?;
    end.write_to(&mut sink)?;
    sink.flush()?;

    debug!(
        "wrote archive: {} entries, central directory {} bytes at offset {}",
        total, cd_size, cd_offset
    );
    Ok(())
}
