//! Content flavours tell the picker which icon to use for an entry. A flavour is a list of names separated by
//! colons, most specific first, and the picker uses the first one it has an icon for.

use crate::{entry::BootEntryType, version::AppleVersion};
use alloc::string::String;
use log::error;

/// The largest flavour we'll read from disk or build, including space for a terminator.
pub const MAX_CONTENT_FLAVOUR_SIZE: u32 = 64;

/// Means "work the flavour out from the kind of entry".
pub const FLAVOUR_AUTO: &str = "Auto";
pub const FLAVOUR_APPLE_OS: &str = "Apple";
pub const FLAVOUR_APPLE_RECOVERY: &str = "AppleRecv:Apple";
pub const FLAVOUR_APPLE_FIRMWARE: &str = "AppleRecv:Apple";
pub const FLAVOUR_APPLE_TIME_MACHINE: &str = "AppleTM:Apple";
pub const FLAVOUR_WINDOWS: &str = "Windows";

/// The flavour used for an entry of the given type if nothing more specific is known.
pub fn flavour_for_type(entry_type: BootEntryType) -> Option<&'static str> {
    match entry_type {
        BootEntryType::AppleOs => Some(FLAVOUR_APPLE_OS),
        BootEntryType::AppleFirmwareUpdate => Some(FLAVOUR_APPLE_FIRMWARE),
        BootEntryType::AppleRecovery => Some(FLAVOUR_APPLE_RECOVERY),
        BootEntryType::AppleTimeMachine => Some(FLAVOUR_APPLE_TIME_MACHINE),
        BootEntryType::Windows => Some(FLAVOUR_WINDOWS),
        BootEntryType::Unknown => None,
        BootEntryType::ExternalOs | BootEntryType::ExternalTool | BootEntryType::System => {
            error!("Entry kind {:?} unsupported for flavour", entry_type);
            None
        }
    }
}

/// Cut a version down to the part that icons are made for. Before macOS 11, the minor version was the one that
/// mattered: `10.15.7` becomes `10_15`. Since then it's just the major version: `11.4` becomes `11`.
pub fn normalize_apple_version(version: &mut AppleVersion) {
    let Some(dot) = version.find('.') else {
        return;
    };

    if &version[..dot] == "10" {
        let end = version[(dot + 1)..].find('.').map(|minor_dot| dot + 1 + minor_dot).unwrap_or(version.len());
        version.truncate(end);
        // SAFETY: an ASCII `.` is swapped for an ASCII `_`, so the contents stay valid UTF-8
        unsafe {
            version.as_mut_vec()[dot] = b'_';
        }
    } else {
        version.truncate(dot);
    }
}

/// Add a version to every flavour in the list, so the picker can look for an icon specific to that version before
/// falling back to the plain one: `macos:generic` with version `11_4` becomes `macos:11_4:generic:11_4`.
///
/// If the new flavour wouldn't fit in [`MAX_CONTENT_FLAVOUR_SIZE`], the original is returned unchanged.
pub fn add_apple_version(flavour: String, version: &str) -> String {
    let separators = flavour.matches(':').count();
    let size = (flavour.len() + 1)
        .checked_mul(2)
        .and_then(|size| size.checked_add(version.len().checked_mul(separators + 1)?));

    let size = match size {
        Some(size) if size <= MAX_CONTENT_FLAVOUR_SIZE as usize => size,
        _ => return flavour,
    };

    let mut expanded = String::new();
    if expanded.try_reserve_exact(size).is_err() {
        return flavour;
    }

    for (i, name) in flavour.split(':').enumerate() {
        if i > 0 {
            expanded.push(':');
        }
        expanded.push_str(name);
        expanded.push(':');
        expanded.push_str(version);
    }

    debug_assert!(expanded.len() < size);
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn normalized(version: &str) -> AppleVersion {
        let mut version = AppleVersion::try_from(version).unwrap();
        normalize_apple_version(&mut version);
        version
    }

    #[test]
    fn normalization() {
        assert_eq!(normalized("10.15.7"), "10_15");
        assert_eq!(normalized("10.9"), "10_9");
        assert_eq!(normalized("11.4.2"), "11");
        assert_eq!(normalized("11.4"), "11");
        assert_eq!(normalized("12.0.1"), "12");
        assert_eq!(normalized("11"), "11");
        assert_eq!(normalized("100.1"), "100");
        assert_eq!(normalized(""), "");
    }

    #[test]
    fn normalization_in_place() {
        assert_eq!(normalized("10.123456789012"), "10_123456789012");
        assert_eq!(normalized("10.1234567890.1"), "10_1234567890");
        assert_eq!(normalized("10."), "10_");
        assert_eq!(normalized("10..5"), "10_");
        assert_eq!(normalized(".5"), "");
    }

    #[test]
    fn expansion() {
        assert_eq!(add_apple_version(String::from("macos:generic"), "11_4"), "macos:11_4:generic:11_4");
        assert_eq!(add_apple_version(String::from("x"), "v"), "x:v");
        assert_eq!(
            add_apple_version(String::from(FLAVOUR_APPLE_RECOVERY), "10_15"),
            "AppleRecv:10_15:Apple:10_15"
        );
        assert_eq!(add_apple_version(String::from(""), "11"), ":11");
    }

    #[test]
    fn expansion_keeps_original_flavours() {
        for flavour in ["Apple", "AppleRecv:Apple", "a:b:c:d", "one::three"] {
            let expanded = add_apple_version(String::from(flavour), "12");
            let tokens: Vec<&str> = expanded.split(':').step_by(2).collect();
            assert_eq!(tokens.join(":"), flavour);
        }
    }

    #[test]
    fn oversized_expansion() {
        // 2 * (23 + 1) + 5 * 4 = 68
        let flavour = String::from("aaaaa:bbbbb:ccccc:ddddd");
        assert_eq!(add_apple_version(flavour.clone(), "10_15"), flavour);

        // 2 * (23 + 1) + 4 * 4 = 64
        assert_eq!(add_apple_version(flavour.clone(), "1_15"), "aaaaa:1_15:bbbbb:1_15:ccccc:1_15:ddddd:1_15");

        let long = "x".repeat(40);
        assert_eq!(add_apple_version(long.clone(), "1"), long);
    }

    #[test]
    fn type_flavours() {
        assert_eq!(flavour_for_type(BootEntryType::AppleOs), Some("Apple"));
        assert_eq!(flavour_for_type(BootEntryType::Windows), Some("Windows"));
        assert_eq!(flavour_for_type(BootEntryType::Unknown), None);
        assert_eq!(flavour_for_type(BootEntryType::ExternalTool), None);
    }
}
