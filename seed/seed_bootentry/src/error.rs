use core::fmt;

/// The ways describing an entry or fetching one of its assets can fail. None of these are fatal to the boot
/// picker: at worst, they mean a single entry is left out of the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Something we looked for isn't there. This is expected a lot of the time - most asset files are optional.
    NotFound,
    /// Data was found, but it's the wrong size or shape. Usually means corruption, or a format we don't know yet.
    Unsupported,
    /// An allocation failed, or a size calculation would have overflowed.
    OutOfResources,
    /// The Recovery OS on a volume is the same folder as its primary OS, so no separate entry should be made.
    AlreadyStarted,
    /// The firmware or filesystem reported an error other than a missing file.
    DeviceError,
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Error::NotFound => "Not Found",
            Error::Unsupported => "Unsupported",
            Error::OutOfResources => "Out of Resources",
            Error::AlreadyStarted => "Already started",
            Error::DeviceError => "Device Error",
        };
        f.write_str(s)
    }
}
