use crate::{fs::FileSystem, mebibytes, reader::read_boot_entry_file, text::filter_string, Error, Result};
use alloc::string::String;
use log::debug;
use picoplist::Value;

/// Size of the buffer holding an Apple version, including space for a terminator.
pub const APPLE_VERSION_MAX_SIZE: usize = 16;

/// A product version, such as `10.15.7` or `11.4`. An empty string means we don't know the version.
pub type AppleVersion = heapless::String<{ APPLE_VERSION_MAX_SIZE - 1 }>;

const SYSTEM_VERSION_FILE: &str = "SystemVersion.plist";
const VERSION_KEY: &str = "ProductUserVisibleVersion";

/// Find the version of the macOS installed in `directory`, from its `SystemVersion.plist`.
pub fn get_apple_version<F>(fs: &F, directory: &str) -> Result<AppleVersion>
where
    F: FileSystem + ?Sized,
{
    let data =
        read_boot_entry_file(fs, directory, SYSTEM_VERSION_FILE, mebibytes(1), 0).map_err(|_| Error::NotFound)?;
    apple_version_from_plist(&data)
}

/// Pull the user-visible version out of the contents of a `SystemVersion.plist`. A version that doesn't fit in an
/// [`AppleVersion`] is `Unsupported`; it is never cut short.
pub fn apple_version_from_plist(data: &[u8]) -> Result<AppleVersion> {
    let document = picoplist::parse_slice(data).map_err(|err| {
        debug!("Failed to parse {}: {}", SYSTEM_VERSION_FILE, err);
        Error::NotFound
    })?;

    let version = document.as_dict().and_then(|root| root.get(VERSION_KEY)).ok_or(Error::NotFound)?;
    let version = match version {
        Value::String(version) => version,
        _ => return Err(Error::NotFound),
    };

    let mut apple_version = AppleVersion::new();
    apple_version.push_str(version).map_err(|_| Error::Unsupported)?;
    Ok(apple_version)
}

/// The name to give a Recovery OS entry for the given version, or `None` if the version isn't known.
pub fn recovery_name(version: &str) -> Option<String> {
    if version.is_empty() {
        return None;
    }

    let mut name = String::from("Recovery ");
    name.extend(version.chars().map(|c| if c == '.' { '_' } else { c }));
    filter_string(&mut name, true);
    Some(name)
}
