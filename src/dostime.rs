//! MS-DOS date/time packing
//!
//! ZIP headers carry modification times as two 16-bit MS-DOS fields with
//! 2-second resolution and a 1980 epoch. An out-of-range field (a zeroed
//! date is the common case for directory entries) means "no timestamp", not
//! a malformed archive.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Pack a broken-down timestamp into (time, date) DOS fields.
///
/// Years before 1980 clamp to the DOS epoch; seconds round down to the
/// 2-second grid.
pub(crate) fn encode(dt: &NaiveDateTime) -> (u16, u16) {
    let year = dt.year().clamp(1980, 1980 + 0x7F) as u16;
    let date = ((year - 1980) << 9) | ((dt.month() as u16) << 5) | dt.day() as u16;
    let time =
        ((dt.hour() as u16) << 11) | ((dt.minute() as u16) << 5) | (dt.second() as u16 >> 1);
    (time, date)
}

/// Unpack DOS (time, date) fields, or `None` when any component is out of
/// range.
pub(crate) fn decode(time: u16, date: u16) -> Option<NaiveDateTime> {
    let year = (date >> 9) as i32 + 1980;
    let month = (date >> 5) & 0xF;
    let day = date & 0x1F;
    let hour = time >> 11;
    let minute = (time >> 5) & 0x3F;
    let second = (time & 0x1F) * 2;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)?.and_hms_opt(
        hour as u32,
        minute as u32,
        second as u32,
    )
}
