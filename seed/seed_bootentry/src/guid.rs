use core::fmt;

/// The length of a GUID in its text form, e.g. `7c436110-ab2a-4bbb-a880-fe41995c9f82`.
pub const GUID_STRING_LENGTH: usize = 36;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Guid([u8; 16]);

impl Guid {
    /// File info type, read from a volume's root directory, holding the device path of the folder blessed to boot
    /// the primary OS.
    pub const APPLE_BLESSED_SYSTEM_FOLDER_INFO: Self = Self::parse_or_zero("fa2b1a6d-a6e7-4ae3-8e63-2b3973274203");
    /// File info type holding the device path of the folder blessed as the alternate (Recovery) OS.
    pub const APPLE_BLESSED_OSX_FOLDER_INFO: Self = Self::parse_or_zero("03b8d751-a02f-4ff8-9b1a-5524afa3945f");

    /// Parse a GUID in the standard text representation as described by Appendix A of the UEFI standard (sometimes
    /// called the "registry format"). Both upper- and lower-case hex digits are accepted.
    pub const fn parse(s: &str) -> Option<Guid> {
        let bytes = s.as_bytes();

        // Make sure it's the right length. We then don't need to do any bounds checks.
        if bytes.len() != GUID_STRING_LENGTH {
            return None;
        }

        // Check that there are hyphens in the places we expect there to be
        match (bytes[8], bytes[13], bytes[18], bytes[23]) {
            (b'-', b'-', b'-', b'-') => (),
            _ => return None,
        }

        /*
         * Decode pairs of hex-encoded bytes using a lookup table.
         *
         * GUID     aabbccdd-eeff-gghh-iijj-kkllmmnnoopp
         * Index       0   4    9   14   19   24  28  32
         */
        const HEX_TABLE: &[u8; 256] = &{
            let mut table = [0xff; 256];
            let mut i: u8 = 0;

            loop {
                table[i as usize] = match i {
                    b'0'..=b'9' => i - b'0',
                    b'a'..=b'f' => i - b'a' + 0xa,
                    b'A'..=b'F' => i - b'A' + 0xa,
                    _ => 0xff,
                };

                if i == 255 {
                    break table;
                }

                i += 1
            }
        };
        let indices: [usize; 8] = [0, 4, 9, 14, 19, 24, 28, 32];
        let mut buf: [u8; 16] = [0; 16];
        let mut group = 0;

        while group < 8 {
            let i = indices[group];

            let h1 = HEX_TABLE[bytes[i] as usize];
            let h2 = HEX_TABLE[bytes[i + 1] as usize];
            let h3 = HEX_TABLE[bytes[i + 2] as usize];
            let h4 = HEX_TABLE[bytes[i + 3] as usize];

            if h1 | h2 | h3 | h4 == 0xff {
                return None;
            }

            buf[group * 2] = (h1 << 4) | h2;
            buf[group * 2 + 1] = (h3 << 4) | h4;
            group += 1;
        }

        Some(Self(buf))
    }

    const fn parse_or_zero(s: &str) -> Guid {
        match Self::parse(s) {
            Some(guid) => guid,
            None => Guid([0; 16]),
        }
    }

    /// The bytes of the GUID, in the order they appear in the text form.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The bytes of the GUID as an `EFI_GUID` lays them out in memory. The first three fields are stored
    /// little-endian.
    pub const fn to_efi_bytes(&self) -> [u8; 16] {
        let b = &self.0;
        [
            b[3], b[2], b[1], b[0], b[5], b[4], b[7], b[6], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15],
        ]
    }
}

/// If `path` starts with a GUID as its first component (optionally after a leading separator), return the prefix
/// up to and including the separator after the GUID. Apple keeps per-OS boot files on the Preboot volume under
/// directories named like this.
///
/// ```
/// use seed_bootentry::guid::guid_prefix;
///
/// let path = "\\7C436110-AB2A-4BBB-A880-FE41995C9F82\\System\\Library\\CoreServices\\";
/// assert_eq!(guid_prefix(path), Some("\\7C436110-AB2A-4BBB-A880-FE41995C9F82\\"));
/// assert_eq!(guid_prefix("\\System\\Library\\CoreServices\\"), None);
/// ```
pub fn guid_prefix(path: &str) -> Option<&str> {
    let start = if path.starts_with('\\') { 1 } else { 0 };
    let rest = &path[start..];

    let candidate = rest.get(..GUID_STRING_LENGTH)?;
    if Guid::parse(candidate).is_some() && rest.as_bytes().get(GUID_STRING_LENGTH) == Some(&b'\\') {
        Some(&path[..(start + GUID_STRING_LENGTH + 1)])
    } else {
        None
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}
