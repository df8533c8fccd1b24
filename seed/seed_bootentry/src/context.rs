use crate::config::Config;

bitflags::bitflags! {
    /// Options controlling how the picker presents entries. These use the same bits as the `PickerAttributes`
    /// setting in the configuration.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    #[repr(transparent)]
    pub struct PickerAttributes: u32 {
        const USE_VOLUME_ICON = 1 << 0;
        const USE_DISK_LABEL_FILE = 1 << 1;
        const USE_GENERIC_LABEL_IMAGE = 1 << 2;
        const HIDE_THEMED_ICONS = 1 << 3;
        const USE_POINTER_CONTROL = 1 << 4;
        const SHOW_DIAGNOSTICS = 1 << 5;
        const USE_MINIMAL_UI = 1 << 6;
        /// Read `.contentFlavour` files, and add OS versions to generated flavours.
        const USE_FLAVOUR_ICON = 1 << 7;
        const USE_REVERSED_UI = 1 << 8;
        const REDUCE_MOTION = 1 << 9;
    }
}

/// Settings shared by every entry described in one pass. Nothing in here changes while entries are being
/// described, and each entry is described independently of the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootContext {
    pub attributes: PickerAttributes,
}

impl BootContext {
    pub fn new(attributes: PickerAttributes) -> BootContext {
        BootContext { attributes }
    }

    /// Bits we don't know about are kept, so they still reach whatever draws the picker.
    pub fn from_config(config: &Config) -> BootContext {
        BootContext::new(PickerAttributes::from_bits_retain(config.misc.boot.picker_attributes))
    }

    pub fn use_flavour_icon(&self) -> bool {
        self.attributes.contains(PickerAttributes::USE_FLAVOUR_ICON)
    }
}

impl Default for BootContext {
    fn default() -> BootContext {
        BootContext::new(PickerAttributes::empty())
    }
}
