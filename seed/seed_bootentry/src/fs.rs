//! The filesystem operations we need from the firmware. Paths use `\` as the separator and are relative to the
//! volume root; a leading separator is allowed.

use crate::{device_path::DevicePath, guid::Guid, Result};
use alloc::{string::String, vec::Vec};

/// A file opened read-only. Dropping it closes it.
pub trait File {
    fn size(&mut self) -> Result<u64>;

    /// Read from the current position into `buffer`, returning how many bytes were read. Returns `Ok(0)` at the
    /// end of the file.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;
}

/// An opened volume.
pub trait FileSystem {
    type File: File;

    /// Open a file or directory read-only. Must return [`Error::NotFound`](crate::Error::NotFound) if nothing
    /// exists at `path`.
    fn open(&self, path: &str) -> Result<Self::File>;

    fn volume_label(&self) -> Option<String>;

    /// Read a vendor-defined file info structure, identified by `info_type`, from the root directory of the
    /// volume.
    fn root_info(&self, info_type: Guid) -> Option<Vec<u8>>;
}

impl<T> FileSystem for &T
where
    T: FileSystem + ?Sized,
{
    type File = T::File;

    fn open(&self, path: &str) -> Result<Self::File> {
        (**self).open(path)
    }

    fn volume_label(&self) -> Option<String> {
        (**self).volume_label()
    }

    fn root_info(&self, info_type: Guid) -> Option<Vec<u8>> {
        (**self).root_info(info_type)
    }
}

/// A handle to a device that may hold a filesystem.
pub trait BootDevice {
    type FileSystem<'a>: FileSystem
    where
        Self: 'a;

    /// Open the volume on this device. The volume is closed when the returned value is dropped.
    fn open_volume(&self) -> Result<Self::FileSystem<'_>>;

    /// The device path of the device itself. This doesn't include any file path nodes.
    fn device_path(&self) -> Option<DevicePath>;
}
