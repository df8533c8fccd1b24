use alloc::{string::String, vec::Vec};
use core::fmt;

pub const MEDIA_DEVICE_PATH: u8 = 0x04;
pub const MEDIA_FILEPATH_DP: u8 = 0x04;
pub const END_DEVICE_PATH_TYPE: u8 = 0x7f;
pub const END_ENTIRE_DEVICE_PATH_SUBTYPE: u8 = 0xff;

const NODE_HEADER_SIZE: usize = 4;

/// A single node of a device path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node<'a> {
    pub kind: u8,
    pub sub_kind: u8,
    pub data: &'a [u8],
}

impl<'a> Node<'a> {
    pub fn is_file_path(&self) -> bool {
        self.kind == MEDIA_DEVICE_PATH && self.sub_kind == MEDIA_FILEPATH_DP
    }

    /// Decode the UCS-2 path held by a file path node. Returns `None` for other kinds of node.
    pub fn file_path(&self) -> Option<String> {
        if !self.is_file_path() {
            return None;
        }

        let units = self.data.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        Some(
            char::decode_utf16(units.take_while(|&unit| unit != 0))
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect(),
        )
    }
}

/// An owned, serialized UEFI device path: a sequence of nodes with 4-byte headers, terminated by an "end entire
/// device path" node. A `DevicePath` is always structurally valid - the only way to make one from raw bytes is
/// through [`DevicePath::from_bytes`], which checks it.
#[derive(Clone)]
pub struct DevicePath {
    bytes: Vec<u8>,
}

impl DevicePath {
    /// A device path with no nodes except the terminator.
    pub fn end() -> DevicePath {
        DevicePath { bytes: Vec::from([END_DEVICE_PATH_TYPE, END_ENTIRE_DEVICE_PATH_SUBTYPE, 4, 0]) }
    }

    /// Check that `bytes` holds a well-formed device path: every node fits in the buffer, no node is shorter than
    /// its own header, and an end node is reached before the buffer runs out.
    pub fn is_valid(bytes: &[u8]) -> bool {
        Self::valid_length(bytes).is_some()
    }

    /// Returns the length of the device path in `bytes`, up to and including the end node.
    fn valid_length(bytes: &[u8]) -> Option<usize> {
        let mut offset = 0;

        loop {
            let header = bytes.get(offset..(offset + NODE_HEADER_SIZE))?;
            let length = u16::from_le_bytes([header[2], header[3]]) as usize;
            if length < NODE_HEADER_SIZE || offset + length > bytes.len() {
                return None;
            }

            offset += length;
            if header[0] == END_DEVICE_PATH_TYPE && header[1] == END_ENTIRE_DEVICE_PATH_SUBTYPE {
                return Some(offset);
            }
        }
    }

    /// Take ownership of a serialized device path, if it's valid. Anything after the end node is dropped.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Option<DevicePath> {
        let length = Self::valid_length(&bytes)?;
        bytes.truncate(length);
        Some(DevicePath { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate over the nodes of the path. The end node is not included.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        let mut remaining = &self.bytes[..];
        core::iter::from_fn(move || {
            let kind = *remaining.first()?;
            let sub_kind = *remaining.get(1)?;
            if kind == END_DEVICE_PATH_TYPE && sub_kind == END_ENTIRE_DEVICE_PATH_SUBTYPE {
                return None;
            }

            let length = u16::from_le_bytes([*remaining.get(2)?, *remaining.get(3)?]) as usize;
            let node = Node { kind, sub_kind, data: remaining.get(NODE_HEADER_SIZE..length)? };
            remaining = &remaining[length..];
            Some(node)
        })
    }

    /// Make a copy of this path with one more node before the terminator. Returns `None` if the node's data is too
    /// big to describe in a node header.
    pub fn append_node(&self, kind: u8, sub_kind: u8, data: &[u8]) -> Option<DevicePath> {
        let length = u16::try_from(data.len().checked_add(NODE_HEADER_SIZE)?).ok()?;
        let body = self.bytes.len() - NODE_HEADER_SIZE;

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(self.bytes.len() + length as usize).ok()?;
        bytes.extend_from_slice(&self.bytes[..body]);
        bytes.extend_from_slice(&[kind, sub_kind]);
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes.extend_from_slice(data);
        bytes.extend_from_slice(&self.bytes[body..]);
        Some(DevicePath { bytes })
    }

    /// Append a file path node holding `name`.
    pub fn append_file_name(&self, name: &str) -> Option<DevicePath> {
        let mut data = Vec::new();
        for unit in name.encode_utf16().chain(core::iter::once(0)) {
            data.extend_from_slice(&unit.to_le_bytes());
        }
        self.append_node(MEDIA_DEVICE_PATH, MEDIA_FILEPATH_DP, &data)
    }

    /// The full file path described by the file path nodes of this device path, if it has any.
    pub fn file_path(&self) -> Option<String> {
        let mut path: Option<String> = None;

        for segment in self.nodes().filter_map(|node| node.file_path()) {
            let path = path.get_or_insert_with(String::new);
            if !path.is_empty() && !path.ends_with('\\') && !segment.starts_with('\\') {
                path.push('\\');
            }
            path.push_str(&segment);
        }

        path
    }

    /// Returns a copy of this path with a trailing separator added to its final file path node. Returns `None` if
    /// the path doesn't end in a file path node, or already has a trailing separator.
    pub fn trailed(&self) -> Option<DevicePath> {
        let last = self.nodes().last()?;
        let name = last.file_path()?;
        if name.ends_with('\\') {
            return None;
        }

        let mut trailed = DevicePath::end();
        for node in self.nodes().take(self.nodes().count() - 1) {
            trailed = trailed.append_node(node.kind, node.sub_kind, node.data)?;
        }
        trailed.append_file_name(&(name + "\\"))
    }
}

/// Normalise a file path for comparison: separators are unified, ASCII case is folded, and a trailing separator is
/// ignored, so `\System\Library` and `\system\library\` refer to the same folder.
fn normalized_file_path(path: &str) -> impl Iterator<Item = char> + '_ {
    let path = path.trim_end_matches(|c: char| c == '\\' || c == '/');
    path.chars().map(|c| if c == '/' { '\\' } else { c.to_ascii_lowercase() })
}

/// Device paths are equal if they lead to the same place: all non-file nodes must match exactly, and the file
/// paths they describe must match after normalisation.
impl PartialEq for DevicePath {
    fn eq(&self, other: &DevicePath) -> bool {
        let device_nodes_equal =
            self.nodes().filter(|node| !node.is_file_path()).eq(other.nodes().filter(|node| !node.is_file_path()));
        if !device_nodes_equal {
            return false;
        }

        match (self.file_path(), other.file_path()) {
            (Some(a), Some(b)) => normalized_file_path(&a).eq(normalized_file_path(&b)),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for DevicePath {}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for node in self.nodes().filter(|node| !node.is_file_path()) {
            if !first {
                f.write_str("/")?;
            }
            first = false;
            write!(f, "Path({:#x},{:#x},{})", node.kind, node.sub_kind, node.data.len())?;
        }

        if let Some(path) = self.file_path() {
            if !first {
                f.write_str("/")?;
            }
            f.write_str(&path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DevicePath({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{string::ToString, vec};

    /// A made-up hard drive node, standing in for the partition part of a real path.
    fn disk(partition: u8) -> DevicePath {
        DevicePath::end().append_node(MEDIA_DEVICE_PATH, 0x01, &[partition; 8]).unwrap()
    }

    #[test]
    fn validity() {
        assert!(DevicePath::is_valid(DevicePath::end().as_bytes()));
        assert!(DevicePath::is_valid(disk(1).append_file_name("\\a").unwrap().as_bytes()));

        // No end node
        assert!(!DevicePath::is_valid(&[0x04, 0x04, 4, 0]));
        // Node shorter than its header
        assert!(!DevicePath::is_valid(&[0x04, 0x04, 2, 0, 0x7f, 0xff, 4, 0]));
        // Node longer than the buffer
        assert!(!DevicePath::is_valid(&[0x04, 0x04, 0xff, 0, 0x7f, 0xff, 4, 0]));
        // Too short to hold a header
        assert!(!DevicePath::is_valid(&[0x7f, 0xff]));
        assert!(!DevicePath::is_valid(&[]));

        let trailing = vec![0x7f, 0xff, 4, 0, 0xaa, 0xbb];
        assert_eq!(DevicePath::from_bytes(trailing).unwrap().as_bytes(), &[0x7f, 0xff, 4, 0]);
    }

    #[test]
    fn file_paths() {
        let path =
            disk(1).append_file_name("\\System\\Library").unwrap().append_file_name("CoreServices").unwrap();
        assert_eq!(path.nodes().count(), 3);
        assert_eq!(path.file_path().as_deref(), Some("\\System\\Library\\CoreServices"));
        assert_eq!(disk(1).file_path(), None);
        assert_eq!(path.to_string(), "Path(0x4,0x1,8)/\\System\\Library\\CoreServices");
    }

    #[test]
    fn equality() {
        let a = disk(1).append_file_name("\\System\\Library\\CoreServices").unwrap();
        let b = disk(1).append_file_name("\\system\\library\\coreservices\\").unwrap();
        let c = disk(1).append_file_name("\\System").unwrap().append_file_name("Library\\CoreServices").unwrap();
        let other_disk = disk(2).append_file_name("\\System\\Library\\CoreServices").unwrap();
        let other_folder = disk(1).append_file_name("\\com.apple.recovery.boot").unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, other_disk);
        assert_ne!(a, other_folder);
        assert_ne!(a, disk(1));
        assert_eq!(disk(1), disk(1));
    }

    #[test]
    fn trailing_separator() {
        let path = disk(1).append_file_name("\\7C436110-AB2A-4BBB-A880-FE41995C9F82\\Recovery").unwrap();
        let trailed = path.trailed().unwrap();
        assert_eq!(trailed.file_path().as_deref(), Some("\\7C436110-AB2A-4BBB-A880-FE41995C9F82\\Recovery\\"));
        assert_eq!(trailed.nodes().next(), disk(1).nodes().next());

        assert!(trailed.trailed().is_none());
        assert!(disk(1).trailed().is_none());
    }

    #[test]
    fn oversized_node() {
        let huge = vec![b'a'; 70000];
        assert!(DevicePath::end().append_node(MEDIA_DEVICE_PATH, MEDIA_FILEPATH_DP, &huge).is_none());
    }
}
