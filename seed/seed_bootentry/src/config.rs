//! The parts of the bootloader configuration (a property list) that affect how entries are described. Everything
//! else in the file is ignored.

use log::warn;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub misc: MiscConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MiscConfig {
    #[serde(default)]
    pub boot: BootConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BootConfig {
    #[serde(default)]
    pub picker_attributes: u32,
}

impl Config {
    pub fn from_plist(data: &[u8]) -> Result<Config, picoplist::Error> {
        picoplist::from_slice(data)
    }

    /// Load the configuration, falling back to the defaults if it can't be parsed. A broken configuration
    /// shouldn't stop the machine from booting.
    pub fn from_plist_or_default(data: &[u8]) -> Config {
        match Config::from_plist(data) {
            Ok(config) => config,
            Err(err) => {
                warn!("Failed to parse configuration, using defaults: {}", err);
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BootContext, PickerAttributes};

    #[test]
    fn picker_attributes() {
        let config = Config::from_plist(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>Misc</key>
    <dict>
        <key>Boot</key>
        <dict>
            <key>PickerAttributes</key>
            <integer>0x481</integer>
            <key>PickerMode</key>
            <string>External</string>
        </dict>
        <key>Security</key>
        <dict/>
    </dict>
</dict>
</plist>"#,
        )
        .unwrap();

        let context = BootContext::from_config(&config);
        assert!(context.use_flavour_icon());
        assert!(context.attributes.contains(PickerAttributes::USE_VOLUME_ICON));
        assert!(!context.attributes.contains(PickerAttributes::USE_DISK_LABEL_FILE));
        assert_eq!(context.attributes.bits(), 0x481);
    }

    #[test]
    fn commented_config() {
        let config = Config::from_plist(
            "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!-- Flavour icons: PickerAttributes -> 0x80 -->
<plist version=\"1.0\">
<dict>
    <key>Misc</key>
    <dict>
        <key>Boot</key>
        <dict>
            <!-- <key>PickerAttributes</key><integer>0</integer> -->
            <key>PickerAttributes</key>
            <integer>0x80</integer>
        </dict>
    </dict>
</dict>
</plist>"
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(config.misc.boot.picker_attributes, 0x80);
        assert!(BootContext::from_config(&config).use_flavour_icon());
    }

    #[test]
    fn missing_sections() {
        let config = Config::from_plist(b"<plist><dict><key>Misc</key><dict/></dict></plist>").unwrap();
        assert_eq!(config.misc.boot.picker_attributes, 0);
        assert!(!BootContext::from_config(&config).use_flavour_icon());
    }

    #[test]
    fn broken_config() {
        assert!(Config::from_plist(b"<plist><dict><key>Misc</key></dict></plist>").is_err());
        assert_eq!(Config::from_plist_or_default(b"not a plist").misc.boot.picker_attributes, 0);
    }
}
