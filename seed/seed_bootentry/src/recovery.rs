use crate::{
    device_path::DevicePath,
    fs::{BootDevice, FileSystem},
    guid::Guid,
    Error,
    Result,
};
use log::{debug, info};

/// Older installs of macOS, and recovery images on install media, keep the Recovery OS in this folder at the root
/// of the volume.
pub const LEGACY_RECOVERY_FOLDER: &str = "\\com.apple.recovery.boot";

/// Find the folder holding the Recovery OS on `device`.
///
/// Normally this is recorded in the volume's blessed folder information. If there is none, we look for the legacy
/// recovery folder. With `basic_only`, the blessed folders aren't consulted at all, which is enough to find USB
/// sticks with just a recovery image on them.
///
/// Returns `AlreadyStarted` if the blessed recovery folder is the same as the blessed system folder. This happens
/// on HFS+ volumes, and no separate entry should be made for the Recovery OS.
pub fn get_recovery_booter<D>(device: &D, basic_only: bool) -> Result<DevicePath>
where
    D: BootDevice + ?Sized,
{
    let fs = device.open_volume()?;

    let blessed = if basic_only { None } else { fs.root_info(Guid::APPLE_BLESSED_OSX_FOLDER_INFO) };

    match blessed {
        Some(blessed) => {
            let recovery = DevicePath::from_bytes(blessed).ok_or(Error::NotFound)?;

            let system = fs.root_info(Guid::APPLE_BLESSED_SYSTEM_FOLDER_INFO).and_then(DevicePath::from_bytes);
            if system.as_ref() == Some(&recovery) {
                info!("Skipping recovery at {} as it's the same as the system folder", recovery);
                return Err(Error::AlreadyStarted);
            }

            /*
             * Blessed folder paths never have a trailing separator, but everything that looks in the folder
             * expects one.
             */
            Ok(recovery.trailed().unwrap_or(recovery))
        }
        None => {
            /*
             * The blessed alternate OS folder on HFS+ FileVault volumes isn't reachable through the firmware's
             * driver, so the folder's existence is all we can go on. It's checked properly once something is
             * loaded from it.
             */
            drop(fs.open(LEGACY_RECOVERY_FOLDER).map_err(|_| Error::NotFound)?);

            let path = device
                .device_path()
                .and_then(|path| path.append_file_name("\\com.apple.recovery.boot\\"))
                .ok_or(Error::NotFound)?;
            debug!("Got recovery device path {}", path);
            Ok(path)
        }
    }
}
