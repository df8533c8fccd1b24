//! An in-memory volume, boot policy and device for testing against. Every file open is recorded, so tests can
//! check which locations were searched, and in what order.

#![allow(dead_code)]

use seed_bootentry::{
    device_path::DevicePath,
    fs::{BootDevice, File, FileSystem},
    guid::Guid,
    policy::{boot_directory, BootPolicy},
    Error,
    Result,
};
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, BTreeSet},
};

pub const SYSTEM_VERSION_11_4: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>ProductBuildVersion</key>
	<string>20F71</string>
	<key>ProductName</key>
	<string>macOS</string>
	<key>ProductUserVisibleVersion</key>
	<string>11.4</string>
	<key>ProductVersion</key>
	<string>11.4</string>
</dict>
</plist>
"#;

pub const PREBOOT_GUID: &str = "7C436110-AB2A-4BBB-A880-FE41995C9F82";

/// Paths are stored without a leading separator, so `\a\b` and `a\b` are the same file.
fn normalize(path: &str) -> String {
    path.trim_start_matches('\\').to_string()
}

pub struct StubFile {
    data: Vec<u8>,
    position: usize,
}

impl File for StubFile {
    fn size(&mut self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let n = usize::min(buffer.len(), self.data.len() - self.position);
        buffer[..n].copy_from_slice(&self.data[self.position..(self.position + n)]);
        self.position += n;
        Ok(n)
    }
}

#[derive(Default)]
pub struct StubFs {
    files: BTreeMap<String, Vec<u8>>,
    directories: BTreeSet<String>,
    label: Option<String>,
    info: Vec<(Guid, Vec<u8>)>,
    opens: RefCell<Vec<String>>,
    info_reads: Cell<usize>,
}

impl StubFs {
    pub fn new() -> StubFs {
        StubFs::default()
    }

    pub fn file(mut self, path: &str, data: impl AsRef<[u8]>) -> StubFs {
        self.files.insert(normalize(path), data.as_ref().to_vec());
        self
    }

    pub fn directory(mut self, path: &str) -> StubFs {
        self.directories.insert(normalize(path).trim_end_matches('\\').to_string());
        self
    }

    pub fn label(mut self, label: &str) -> StubFs {
        self.label = Some(label.to_string());
        self
    }

    pub fn info(mut self, info_type: Guid, data: Vec<u8>) -> StubFs {
        self.info.push((info_type, data));
        self
    }

    /// Every path passed to `open`, in order.
    pub fn opens(&self) -> Vec<String> {
        self.opens.borrow().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opens.borrow().len()
    }

    pub fn info_reads(&self) -> usize {
        self.info_reads.get()
    }
}

impl FileSystem for StubFs {
    type File = StubFile;

    fn open(&self, path: &str) -> Result<StubFile> {
        self.opens.borrow_mut().push(path.to_string());

        let path = normalize(path);
        if let Some(data) = self.files.get(&path) {
            Ok(StubFile { data: data.clone(), position: 0 })
        } else if self.directories.contains(path.trim_end_matches('\\')) {
            Ok(StubFile { data: Vec::new(), position: 0 })
        } else {
            Err(Error::NotFound)
        }
    }

    fn volume_label(&self) -> Option<String> {
        self.label.clone()
    }

    fn root_info(&self, info_type: Guid) -> Option<Vec<u8>> {
        self.info_reads.set(self.info_reads.get() + 1);
        self.info.iter().find(|(guid, _)| *guid == info_type).map(|(_, data)| data.clone())
    }
}

/// Resolves every device path to the directory its file path is in, on a single volume.
pub struct StubPolicy {
    pub fs: StubFs,
    pub resolutions: Cell<usize>,
}

impl StubPolicy {
    pub fn new(fs: StubFs) -> StubPolicy {
        StubPolicy { fs, resolutions: Cell::new(0) }
    }
}

impl BootPolicy for StubPolicy {
    type FileSystem<'a> = &'a StubFs;

    fn device_path_to_dir_path(&self, device_path: &DevicePath) -> Result<(String, &StubFs)> {
        self.resolutions.set(self.resolutions.get() + 1);
        let file_path = device_path.file_path().ok_or(Error::NotFound)?;
        Ok((boot_directory(&file_path), &self.fs))
    }
}

pub struct StubDevice {
    pub fs: StubFs,
    pub path: Option<DevicePath>,
    pub volume_opens: Cell<usize>,
}

impl StubDevice {
    pub fn new(fs: StubFs) -> StubDevice {
        StubDevice { fs, path: Some(disk()), volume_opens: Cell::new(0) }
    }
}

impl BootDevice for StubDevice {
    type FileSystem<'a> = &'a StubFs;

    fn open_volume(&self) -> Result<&StubFs> {
        self.volume_opens.set(self.volume_opens.get() + 1);
        Ok(&self.fs)
    }

    fn device_path(&self) -> Option<DevicePath> {
        self.path.clone()
    }
}

/// A device path for a partition on a disk, without any file path.
pub fn disk() -> DevicePath {
    // A hard drive media node (type 4, subtype 1), with the signature fields zeroed
    DevicePath::end().append_node(0x04, 0x01, &[0; 38]).unwrap()
}

/// A device path to a file on the partition from [`disk`].
pub fn file(path: &str) -> DevicePath {
    disk().append_file_name(path).unwrap()
}
