use crate::device_path::DevicePath;
use alloc::string::String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootEntryType {
    Unknown,
    AppleOs,
    AppleRecovery,
    AppleFirmwareUpdate,
    AppleTimeMachine,
    Windows,
    /// A custom entry pointing at an OS, added by the user's configuration.
    ExternalOs,
    /// A custom entry pointing at a tool, added by the user's configuration.
    ExternalTool,
    /// An action provided by the picker itself, such as resetting NVRAM.
    System,
}

impl BootEntryType {
    pub fn is_apple(self) -> bool {
        match self {
            BootEntryType::AppleOs
            | BootEntryType::AppleRecovery
            | BootEntryType::AppleFirmwareUpdate
            | BootEntryType::AppleTimeMachine => true,
            BootEntryType::Unknown
            | BootEntryType::Windows
            | BootEntryType::ExternalOs
            | BootEntryType::ExternalTool
            | BootEntryType::System => false,
        }
    }

    /// Custom entries are named by the configuration that created them, and are never described.
    pub fn is_custom(self) -> bool {
        matches!(self, BootEntryType::ExternalOs | BootEntryType::ExternalTool)
    }

    /// Whether icons and labels for this kind of entry can be found on disk. Tools and system actions don't have a
    /// volume of their own to look on.
    pub fn has_assets(self) -> bool {
        !matches!(self, BootEntryType::ExternalTool | BootEntryType::System)
    }
}

/// A bootable candidate found on a volume, and what we've worked out about it.
#[derive(Clone, Debug)]
pub struct BootEntry {
    pub entry_type: BootEntryType,
    pub device_path: DevicePath,
    /// Set if the entry was found by generic heuristics, rather than by recognising a particular OS's bootloader.
    pub is_generic: bool,
    pub is_apple_installer: bool,
    pub name: Option<String>,
    /// The directory holding the entry's assets. Set (along with `name`) once the entry has been described.
    pub path_name: Option<String>,
    /// Colon-separated list of icon flavours, most specific first.
    pub flavour: Option<String>,
}

impl BootEntry {
    pub fn new(entry_type: BootEntryType, device_path: DevicePath, is_generic: bool) -> BootEntry {
        BootEntry {
            entry_type,
            device_path,
            is_generic,
            is_apple_installer: false,
            name: None,
            path_name: None,
            flavour: None,
        }
    }

    /// Create a custom entry, which already has the name it'll be shown with.
    pub fn custom(entry_type: BootEntryType, name: String, device_path: DevicePath) -> BootEntry {
        debug_assert!(entry_type.is_custom());
        BootEntry { name: Some(name), ..BootEntry::new(entry_type, device_path, false) }
    }

    /// Name used when tracing things about this entry.
    pub fn debug_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
