//! Fuzz target for version assembly.
//!
//! Run with: cargo +nightly fuzz run fuzz_assemble
//!
//! The first 8 bytes pick the date and build number; the rest is the
//! release type. Every accepted release type must produce a version whose
//! display form is the `YY.MM.DD` date block.

#![no_main]

use chrono::NaiveDate;
use dayver_core::version::{assemble, display_version};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let year = 1970 + i32::from(u16::from_le_bytes([data[0], data[1]]) % 200);
    let month = u32::from(data[2] % 12) + 1;
    let day = u32::from(data[3] % 28) + 1;
    let build = u64::from(u32::from_le_bytes([data[4], data[5], data[6], data[7]]));
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return;
    };
    let release_type = std::str::from_utf8(&data[8..]).unwrap_or("dev");

    if let Ok(version) = assemble(release_type, date, build) {
        let block = format!("{:02}.{:02}.{:02}", year % 100, month, day);
        assert!(version.as_str().starts_with(&block));
        assert!(version.as_str().ends_with(&format!(".{build}")));
        let shown = display_version(version.as_str());
        assert!(shown == block || shown == version.as_str());
    }
});
