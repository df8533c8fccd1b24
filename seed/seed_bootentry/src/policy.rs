use crate::{device_path::DevicePath, fs::FileSystem, Result};
use alloc::string::String;

/// Maps the device path of a boot entry to the filesystem it lives on and the directory that contains it.
pub trait BootPolicy {
    type FileSystem<'a>: FileSystem
    where
        Self: 'a;

    /// Returns the entry's directory, with a leading and trailing separator (or just `\` for the volume root),
    /// along with its filesystem.
    fn device_path_to_dir_path(&self, device_path: &DevicePath) -> Result<(String, Self::FileSystem<'_>)>;
}

/// Work out the directory containing the file at `file_path`, in the form [`BootPolicy`] returns: everything up to
/// and including the last separator. A path with no separators lives at the root.
pub fn boot_directory(file_path: &str) -> String {
    let mut directory = String::from("\\");
    if let Some(end) = file_path.rfind('\\') {
        directory.push_str(file_path[..end].trim_start_matches('\\'));
        if !directory.ends_with('\\') {
            directory.push('\\');
        }
    }
    directory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories() {
        assert_eq!(
            boot_directory("\\System\\Library\\CoreServices\\boot.efi"),
            "\\System\\Library\\CoreServices\\"
        );
        assert_eq!(boot_directory("\\com.apple.recovery.boot\\"), "\\com.apple.recovery.boot\\");
        assert_eq!(boot_directory("EFI\\BOOT\\BOOTx64.efi"), "\\EFI\\BOOT\\");
        assert_eq!(boot_directory("\\boot.efi"), "\\");
        assert_eq!(boot_directory("boot.efi"), "\\");
        assert_eq!(boot_directory(""), "\\");
    }
}
