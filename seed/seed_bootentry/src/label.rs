use crate::{
    flavour::MAX_CONTENT_FLAVOUR_SIZE,
    fs::FileSystem,
    reader::read_boot_entry_file,
    text::{ascii_to_display, filter_string},
};
use alloc::string::String;

/// The longest volume or disk label we'll read.
pub const MAX_VOLUME_LABEL_SIZE: u32 = 64;

/// Read a text disk label (`.contentDetails` on APFS, `.disk_label.contentDetails` on HFS+) from `directory`.
/// Labels are optional, so any failure is just `None`.
pub fn get_apple_disk_label<F>(fs: &F, directory: &str, label_file: &str) -> Option<String>
where
    F: FileSystem + ?Sized,
{
    let data = read_boot_entry_file(fs, directory, label_file, MAX_VOLUME_LABEL_SIZE, 0).ok()?;
    let mut label = ascii_to_display(&data);
    filter_string(&mut label, true);
    Some(label)
}

/// Read the user's choice of icon flavour for the entry in `directory`, from `.contentFlavour`.
pub fn get_content_flavour<F>(fs: &F, directory: &str) -> Option<String>
where
    F: FileSystem + ?Sized,
{
    let data = read_boot_entry_file(fs, directory, ".contentFlavour", MAX_CONTENT_FLAVOUR_SIZE, 0).ok()?;
    let mut flavour = ascii_to_display(&data);
    filter_string(&mut flavour, true);
    Some(flavour)
}
