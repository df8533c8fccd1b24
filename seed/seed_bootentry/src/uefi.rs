//! Implementations of the filesystem and boot policy traits on top of UEFI boot services. These can only be used
//! before `ExitBootServices` is called.

use crate::{
    device_path::DevicePath,
    fs::{BootDevice, File, FileSystem},
    guid::Guid,
    policy::{boot_directory, BootPolicy},
    Error,
    Result,
};
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{cell::RefCell, ffi::c_void, marker::PhantomData, ptr};
use log::{debug, warn};
use uefi::{
    boot::{self, OpenProtocolAttributes, OpenProtocolParams, ScopedProtocol},
    data_types::Align,
    proto::{
        device_path::DevicePath as UefiDevicePath,
        media::{
            file::{
                Directory,
                File as _,
                FileAttribute,
                FileInfo,
                FileMode,
                FileProtocolInfo,
                FileSystemVolumeLabel,
                FileType,
                FromUefi,
            },
            fs::SimpleFileSystem,
        },
    },
    CString16,
    Handle,
    Identify,
    Status,
};

impl From<uefi::Error> for Error {
    fn from(err: uefi::Error) -> Error {
        match err.status() {
            Status::NOT_FOUND => Error::NotFound,
            Status::UNSUPPORTED => Error::Unsupported,
            Status::OUT_OF_RESOURCES | Status::BUFFER_TOO_SMALL => Error::OutOfResources,
            Status::ALREADY_STARTED => Error::AlreadyStarted,
            _ => Error::DeviceError,
        }
    }
}

pub struct UefiFile(FileType);

impl File for UefiFile {
    fn size(&mut self) -> Result<u64> {
        let info = match &mut self.0 {
            FileType::Regular(file) => file.get_boxed_info::<FileInfo>()?,
            FileType::Dir(directory) => directory.get_boxed_info::<FileInfo>()?,
        };
        Ok(info.file_size())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match &mut self.0 {
            FileType::Regular(file) => file.read(buffer).map_err(|err| Error::from(err.to_err_without_payload())),
            FileType::Dir(_) => Err(Error::Unsupported),
        }
    }
}

/// An opened volume. The root directory is closed before the protocol is released.
pub struct UefiFileSystem {
    root: RefCell<Directory>,
    _protocol: ScopedProtocol<SimpleFileSystem>,
}

impl UefiFileSystem {
    pub fn open(handle: Handle) -> Result<UefiFileSystem> {
        let mut protocol = boot::open_protocol_exclusive::<SimpleFileSystem>(handle)?;
        let root = protocol.open_volume()?;
        Ok(UefiFileSystem { root: RefCell::new(root), _protocol: protocol })
    }
}

impl FileSystem for UefiFileSystem {
    type File = UefiFile;

    fn open(&self, path: &str) -> Result<UefiFile> {
        let path = CString16::try_from(path).map_err(|_| Error::NotFound)?;
        let file = self.root.borrow_mut().open(&path, FileMode::Read, FileAttribute::empty())?;
        Ok(UefiFile(file.into_type()?))
    }

    fn volume_label(&self) -> Option<String> {
        let label = self.root.borrow_mut().get_boxed_info::<FileSystemVolumeLabel>().ok()?;
        Some(label.volume_label().to_string())
    }

    fn root_info(&self, info_type: Guid) -> Option<Vec<u8>> {
        let mut root = self.root.borrow_mut();
        if info_type == Guid::APPLE_BLESSED_OSX_FOLDER_INFO {
            read_raw_info::<BlessedOsxFolder>(&mut root)
        } else if info_type == Guid::APPLE_BLESSED_SYSTEM_FOLDER_INFO {
            read_raw_info::<BlessedSystemFolder>(&mut root)
        } else {
            warn!("Don't know how to read file info {}", info_type);
            None
        }
    }
}

/// A kind of file info that's read back as plain bytes.
trait RawInfoKind {
    const GUID: Guid;
}

struct BlessedOsxFolder;

impl RawInfoKind for BlessedOsxFolder {
    const GUID: Guid = Guid::APPLE_BLESSED_OSX_FOLDER_INFO;
}

struct BlessedSystemFolder;

impl RawInfoKind for BlessedSystemFolder {
    const GUID: Guid = Guid::APPLE_BLESSED_SYSTEM_FOLDER_INFO;
}

/// File info with no structure we care about. `GetInfo` fills the caller's buffer, and the reference handed back
/// by `get_info` is always empty: the bytes are taken from the buffer instead.
#[repr(C)]
struct RawInfo<K> {
    _kind: PhantomData<K>,
    _data: [u8],
}

impl<K> Align for RawInfo<K> {
    fn alignment() -> usize {
        1
    }
}

unsafe impl<K: RawInfoKind> Identify for RawInfo<K> {
    const GUID: uefi::Guid = uefi::Guid::from_bytes(K::GUID.to_efi_bytes());
}

impl<K> FromUefi for RawInfo<K> {
    unsafe fn from_uefi<'ptr>(ptr: *mut c_void) -> &'ptr mut Self {
        unsafe { &mut *(ptr::slice_from_raw_parts_mut(ptr.cast::<u8>(), 0) as *mut Self) }
    }
}

impl<K: RawInfoKind> FileProtocolInfo for RawInfo<K> {}

/// Ask the firmware how big the info is, then read it into a buffer of exactly that size.
fn read_raw_info<K: RawInfoKind>(root: &mut Directory) -> Option<Vec<u8>> {
    let size = match root.get_info::<RawInfo<K>>(&mut []) {
        Ok(_) => return None,
        Err(err) if err.status() == Status::BUFFER_TOO_SMALL => (*err.data())?,
        Err(err) => {
            debug!("No file info {} on volume: {:?}", K::GUID, err.status());
            return None;
        }
    };

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).ok()?;
    buffer.resize(size, 0);
    if let Err(err) = root.get_info::<RawInfo<K>>(&mut buffer) {
        warn!("Reading file info {} failed: {:?}", K::GUID, err.status());
        return None;
    }

    Some(buffer)
}

/// A handle that supports the Simple File System protocol.
pub struct UefiDevice {
    pub handle: Handle,
}

impl BootDevice for UefiDevice {
    type FileSystem<'a> = UefiFileSystem;

    fn open_volume(&self) -> Result<UefiFileSystem> {
        UefiFileSystem::open(self.handle)
    }

    fn device_path(&self) -> Option<DevicePath> {
        let protocol = unsafe {
            boot::open_protocol::<UefiDevicePath>(
                OpenProtocolParams { handle: self.handle, agent: boot::image_handle(), controller: None },
                OpenProtocolAttributes::GetProtocol,
            )
        }
        .ok()?;
        DevicePath::from_bytes(protocol.as_bytes().to_vec())
    }
}

/// Finds the volume an entry's device path points into by asking the firmware which handle supports the Simple
/// File System protocol for it.
pub struct UefiBootPolicy;

impl BootPolicy for UefiBootPolicy {
    type FileSystem<'a> = UefiFileSystem;

    fn device_path_to_dir_path(&self, device_path: &DevicePath) -> Result<(String, UefiFileSystem)> {
        let mut remaining = <&UefiDevicePath>::try_from(device_path.as_bytes()).map_err(|_| Error::Unsupported)?;
        let handle = boot::locate_device_path::<SimpleFileSystem>(&mut remaining)?;

        let file_path = device_path.file_path().ok_or(Error::NotFound)?;
        Ok((boot_directory(&file_path), UefiFileSystem::open(handle)?))
    }
}
