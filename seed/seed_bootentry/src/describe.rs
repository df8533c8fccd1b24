use crate::{
    context::BootContext,
    entry::{BootEntry, BootEntryType},
    flavour::{add_apple_version, flavour_for_type, normalize_apple_version, FLAVOUR_AUTO},
    fs::FileSystem,
    label::{get_apple_disk_label, get_content_flavour},
    policy::BootPolicy,
    reader::file_size,
    version::{get_apple_version, recovery_name, AppleVersion},
    Error,
    Result,
};
use alloc::string::String;
use log::{debug, error, info};

const WINDOWS_BCD_PATH: &str = "\\EFI\\Microsoft\\Boot\\BCD";
const APPLE_INSTALLER_MARKER: &str = "com.apple.installer";

/// Fill in the name, kind, asset directory and flavour of `entry`, from what can be found on its volume.
///
/// Custom entries already have everything they need, and are left alone. Returns `NotFound` if no name could be
/// found for the entry, in which case it shouldn't be offered for booting. `entry.path_name` is only set if this
/// succeeds.
pub fn describe_boot_entry<P>(policy: &P, context: &BootContext, entry: &mut BootEntry) -> Result<()>
where
    P: BootPolicy + ?Sized,
{
    if entry.entry_type.is_custom() {
        return Ok(());
    }

    let (directory, fs) = policy.device_path_to_dir_path(&entry.device_path)?;
    let mut version = AppleVersion::new();

    let mut name = get_apple_disk_label(&fs, &directory, ".contentDetails")
        .or_else(|| get_apple_disk_label(&fs, &directory, ".disk_label.contentDetails"));

    /*
     * Windows entries can have a custom label, so this is checked even if we already have a name.
     */
    if entry.entry_type == BootEntryType::Unknown && entry.is_generic {
        debug!("Trying to detect Microsoft BCD");
        if file_size(&fs, WINDOWS_BCD_PATH).is_ok() {
            entry.entry_type = BootEntryType::Windows;
        }
    }

    if entry.entry_type == BootEntryType::Windows && name.is_none() {
        name = Some(String::from("Windows"));
    }

    entry.is_apple_installer = directory.contains(APPLE_INSTALLER_MARKER);
    if name.is_none() {
        /*
         * Installers usually only come with a pre-rendered label image, which isn't any use if we're drawing
         * text.
         */
        name = if entry.is_apple_installer {
            Some(String::from("macOS Installer"))
        } else {
            fs.volume_label().map(|label| name_from_volume_label(&fs, &directory, entry, &mut version, label))
        };
    }

    let Some(name) = name else {
        info!("No name found for entry at {}", directory);
        return Err(Error::NotFound);
    };

    let flavour = content_flavour(&fs, &directory, context, entry, &mut version);

    entry.name = Some(name);
    entry.path_name = Some(directory);
    entry.flavour = flavour;
    Ok(())
}

/// Use the volume's own label as the entry's name. A few labels are names of the volumes Apple boots from, rather
/// than of the OS, and need replacing.
fn name_from_volume_label<F>(
    fs: &F,
    directory: &str,
    entry: &mut BootEntry,
    version: &mut AppleVersion,
    label: String,
) -> String
where
    F: FileSystem + ?Sized,
{
    match label.as_str() {
        "Recovery HD" | "Recovery" => {
            if matches!(entry.entry_type, BootEntryType::Unknown | BootEntryType::AppleOs) {
                entry.entry_type = BootEntryType::AppleRecovery;
            }

            match get_apple_version(fs, directory) {
                Ok(found) => {
                    *version = found;
                    recovery_name(version.as_str()).unwrap_or(label)
                }
                Err(_) => label,
            }
        }
        /*
         * Some macOS installs fail to write the `.contentDetails` label, and we see the name of the Preboot volume
         * instead. Anything still unnamed on it is part of the installed system.
         */
        "Preboot" => String::from("Macintosh HD"),
        _ => label,
    }
}

/// Work out the flavour of a described entry. A `.contentFlavour` file is used if flavour icons are enabled,
/// unless it asks for the flavour to be picked automatically, in which case it's made from the entry's kind.
fn content_flavour<F>(
    fs: &F,
    directory: &str,
    context: &BootContext,
    entry: &mut BootEntry,
    version: &mut AppleVersion,
) -> Option<String>
where
    F: FileSystem + ?Sized,
{
    let mut flavour = entry.flavour.take();
    if context.use_flavour_icon() {
        flavour = get_content_flavour(fs, directory);
    }

    if flavour.as_deref().is_some_and(|flavour| !flavour.eq_ignore_ascii_case(FLAVOUR_AUTO)) {
        return flavour;
    }

    let mut generated = flavour_for_type(entry.entry_type).map(String::from);
    if entry.entry_type == BootEntryType::AppleOs && context.use_flavour_icon() {
        if let Ok(found) = get_apple_version(fs, directory) {
            *version = found;
        }
    }

    if entry.entry_type.is_apple() {
        generated = match generated {
            None => {
                error!("No flavour for Apple entry of kind {:?}", entry.entry_type);
                debug_assert!(false);
                None
            }
            Some(base) if !version.is_empty() && context.use_flavour_icon() => {
                normalize_apple_version(version);
                Some(add_apple_version(base, version.as_str()))
            }
            other => other,
        };
    }

    match (generated, flavour) {
        (Some(generated), _) => Some(generated),
        (None, Some(flavour)) => Some(flavour),
        (None, None) => Some(String::from(FLAVOUR_AUTO)),
    }
}
