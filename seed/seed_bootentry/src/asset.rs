//! Fetching the files that come with a boot entry: its icon, the pre-rendered label image, and anything else a
//! picker wants to show.
//!
//! Assets may live in one of three places, which are searched from most to least specific:
//!    - the entry's own directory (the "leaf")
//!    - a per-OS directory at the root of the volume, named with the OS's GUID. macOS keeps its boot files like
//!      this on its Preboot volume: `\<GUID>\System\Library\CoreServices\`.
//!    - the root of the volume, shared by every OS on it
//!
//! A later location is only tried if every earlier one failed.

use crate::{
    context::BootContext,
    device_path::DevicePath,
    entry::BootEntry,
    guid::guid_prefix,
    mebibytes,
    policy::BootPolicy,
    reader::read_boot_entry_file,
    Error,
    Result,
};
use alloc::vec::Vec;
use log::info;

/// Two ICNS record headers: the file header and at least one icon.
const ICNS_MIN_SIZE: u32 = 16;
/// The header of an Apple disk label image.
const DISK_LABEL_MIN_SIZE: u32 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchLocation {
    /// Only look in the entry's own directory.
    Leaf,
    /// Only look in the per-OS directory and then the volume root.
    Root,
    /// Look in the entry's own directory, and then at the root if that fails.
    LeafThenRoot,
}

impl SearchLocation {
    fn leaf(self) -> bool {
        matches!(self, SearchLocation::Leaf | SearchLocation::LeafThenRoot)
    }

    fn root(self) -> bool {
        matches!(self, SearchLocation::Root | SearchLocation::LeafThenRoot)
    }
}

/// Describes an asset file to look for.
#[derive(Clone, Copy, Debug)]
pub struct AssetQuery<'a> {
    pub filename: &'a str,
    /// What the file is, for tracing.
    pub file_type: &'a str,
    pub max_size: u32,
    pub min_size: u32,
    pub search: SearchLocation,
}

fn get_file<P>(policy: &P, device_path: &DevicePath, entry_name: &str, query: &AssetQuery) -> Result<Vec<u8>>
where
    P: BootPolicy + ?Sized,
{
    let (directory, fs) = policy.device_path_to_dir_path(device_path)?;

    let mut result = Err(Error::NotFound);
    if query.search.leaf() {
        result = read_boot_entry_file(&fs, &directory, query.filename, query.max_size, query.min_size);
    }

    if result.is_ok() || !query.search.root() {
        info!("Get {} for {} - {:?}", query.file_type, entry_name, result.as_ref().map(|data| data.len()));
        return result;
    }

    let prefix = guid_prefix(&directory);
    result = match prefix {
        Some(prefix) => read_boot_entry_file(&fs, prefix, query.filename, query.max_size, query.min_size),
        None => Err(Error::Unsupported),
    };

    if result.is_err() {
        result = read_boot_entry_file(&fs, "", query.filename, query.max_size, query.min_size);
    }

    info!(
        "Get {} for {} {} - {:?}",
        query.file_type,
        entry_name,
        prefix.unwrap_or("<no guid>"),
        result.as_ref().map(|data| data.len())
    );
    result
}

/// Fetch an asset for whatever boots from `device_path`, for callers that don't have a [`BootEntry`].
pub fn get_boot_entry_file_from_device_path<P>(
    policy: &P,
    device_path: &DevicePath,
    query: &AssetQuery,
) -> Result<Vec<u8>>
where
    P: BootPolicy + ?Sized,
{
    get_file(policy, device_path, "boot entry", query)
}

/// Fetch an asset for `entry`. Tools and system actions don't have assets on disk, so these always fail with
/// `NotFound`.
pub fn get_boot_entry_file<P>(policy: &P, entry: &BootEntry, query: &AssetQuery) -> Result<Vec<u8>>
where
    P: BootPolicy + ?Sized,
{
    if !entry.entry_type.has_assets() {
        return Err(Error::NotFound);
    }

    get_file(policy, &entry.device_path, entry.debug_name(), query)
}

/// Fetch the `.VolumeIcon.icns` for an entry. Icons are only looked for at the root.
pub fn get_boot_entry_icon<P>(policy: &P, _context: &BootContext, entry: &BootEntry) -> Result<Vec<u8>>
where
    P: BootPolicy + ?Sized,
{
    get_boot_entry_file(
        policy,
        entry,
        &AssetQuery {
            filename: ".VolumeIcon.icns",
            file_type: "volume icon",
            max_size: mebibytes(16),
            min_size: ICNS_MIN_SIZE,
            search: SearchLocation::Root,
        },
    )
}

/// Fetch the pre-rendered label for an entry, in its high-resolution form if `scale` is `2`.
pub fn get_boot_entry_label_image<P>(
    policy: &P,
    _context: &BootContext,
    entry: &BootEntry,
    scale: u8,
) -> Result<Vec<u8>>
where
    P: BootPolicy + ?Sized,
{
    get_boot_entry_file(
        policy,
        entry,
        &AssetQuery {
            filename: if scale == 2 { ".disk_label_2x" } else { ".disk_label" },
            file_type: "label",
            max_size: mebibytes(16),
            min_size: DISK_LABEL_MIN_SIZE,
            search: SearchLocation::Leaf,
        },
    )
}
