//! `seed_bootentry` works out how a boot entry found on a volume should be presented to the user: its display
//! name, what kind of entry it is, which icon flavour to use, and where its boot-time assets (icons, disk labels,
//! the Recovery OS) live.
//!
//! The crate doesn't talk to firmware directly. Volumes, files and the mapping from device paths to directories
//! are reached through the traits in [`fs`] and [`policy`], which are implemented on top of UEFI boot services in
//! the [`uefi`] module (behind the `uefi` feature) and by in-memory stubs in the tests.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod asset;
pub mod config;
pub mod context;
pub mod describe;
pub mod device_path;
pub mod entry;
pub mod error;
pub mod flavour;
pub mod fs;
pub mod guid;
pub mod label;
pub mod policy;
pub mod reader;
pub mod recovery;
pub mod text;
pub mod version;

#[cfg(feature = "uefi")]
pub mod uefi;

pub use asset::{
    get_boot_entry_file,
    get_boot_entry_file_from_device_path,
    get_boot_entry_icon,
    get_boot_entry_label_image,
    AssetQuery,
    SearchLocation,
};
pub use context::{BootContext, PickerAttributes};
pub use describe::describe_boot_entry;
pub use device_path::DevicePath;
pub use entry::{BootEntry, BootEntryType};
pub use error::{Error, Result};
pub use recovery::get_recovery_booter;
pub use version::AppleVersion;

pub const fn kibibytes(n: u32) -> u32 {
    n * 1024
}

pub const fn mebibytes(n: u32) -> u32 {
    kibibytes(n) * 1024
}
