use crate::{
    fs::{File, FileSystem},
    Error,
    Result,
};
use alloc::{string::String, vec::Vec};
use log::trace;

/// The size, in bytes, of the UCS-2 path built from a directory and file name of the given lengths, including the
/// terminator. Returns `None` if the size can't be represented.
pub fn path_size(directory_len: usize, filename_len: usize) -> Option<usize> {
    let directory_size = directory_len.checked_add(1)?.checked_mul(2)?;
    let filename_size = filename_len.checked_mul(2)?;
    directory_size.checked_add(filename_size)
}

/// Read the whole of `directory` + `filename` from `fs`. The file must be at most `max_size` bytes, and at least
/// `min_size` bytes.
///
/// Files that are missing, can't be read, or are too big are all `NotFound`. A file that's too small is
/// `Unsupported`, because something is there, but it can't be what we're looking for.
pub fn read_boot_entry_file<F>(
    fs: &F,
    directory: &str,
    filename: &str,
    max_size: u32,
    min_size: u32,
) -> Result<Vec<u8>>
where
    F: FileSystem + ?Sized,
{
    read_with_lengths(fs, directory, filename, (directory.len(), filename.len()), max_size, min_size)
}

/// Does the work of [`read_boot_entry_file`]. The path is only built, and the file only opened, once the path's
/// size has been checked against `lengths`.
fn read_with_lengths<F>(
    fs: &F,
    directory: &str,
    filename: &str,
    lengths: (usize, usize),
    max_size: u32,
    min_size: u32,
) -> Result<Vec<u8>>
where
    F: FileSystem + ?Sized,
{
    if path_size(lengths.0, lengths.1).is_none() {
        trace!("Path to {} in {} is too long", filename, directory);
        return Err(Error::OutOfResources);
    }

    let mut path = String::new();
    path.try_reserve_exact(directory.len() + filename.len()).map_err(|_| Error::OutOfResources)?;
    path.push_str(directory);
    path.push_str(filename);

    let data = read_file(fs, &path, max_size).map_err(|err| {
        trace!("Couldn't read {}: {}", path, err);
        match err {
            Error::OutOfResources => Error::OutOfResources,
            _ => Error::NotFound,
        }
    })?;

    if data.len() < min_size as usize {
        trace!("{} is too small ({} bytes, need at least {})", path, data.len(), min_size);
        return Err(Error::Unsupported);
    }

    Ok(data)
}

fn read_file<F>(fs: &F, path: &str, max_size: u32) -> Result<Vec<u8>>
where
    F: FileSystem + ?Sized,
{
    let mut file = fs.open(path)?;

    let size = file.size()?;
    if size > max_size as u64 {
        return Err(Error::NotFound);
    }
    let size = usize::try_from(size).map_err(|_| Error::OutOfResources)?;

    let mut data = Vec::new();
    data.try_reserve_exact(size).map_err(|_| Error::OutOfResources)?;
    data.resize(size, 0);

    let mut filled = 0;
    while filled < size {
        match file.read(&mut data[filled..])? {
            0 => return Err(Error::NotFound),
            read => filled += read,
        }
    }

    Ok(data)
}

/// Get the size of the file at `path`, without reading it.
pub fn file_size<F>(fs: &F, path: &str) -> Result<u64>
where
    F: FileSystem + ?Sized,
{
    fs.open(path)?.size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{collections::BTreeMap, vec};
    use std::cell::Cell;

    struct TestFile {
        data: Vec<u8>,
        position: usize,
        /// Simulates a device that returns fewer bytes than the file claims to have.
        truncate_to: usize,
    }

    impl File for TestFile {
        fn size(&mut self) -> Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
            let available = self.truncate_to.saturating_sub(self.position);
            let n = usize::min(available, usize::min(buffer.len(), 3));
            buffer[..n].copy_from_slice(&self.data[self.position..(self.position + n)]);
            self.position += n;
            Ok(n)
        }
    }

    #[derive(Default)]
    struct TestFs {
        files: BTreeMap<&'static str, (Vec<u8>, usize)>,
        opens: Cell<usize>,
    }

    impl TestFs {
        fn with(mut self, path: &'static str, data: &[u8]) -> Self {
            self.files.insert(path, (data.to_vec(), data.len()));
            self
        }
    }

    impl FileSystem for TestFs {
        type File = TestFile;

        fn open(&self, path: &str) -> Result<TestFile> {
            self.opens.set(self.opens.get() + 1);
            let (data, truncate_to) = self.files.get(path).ok_or(Error::NotFound)?;
            Ok(TestFile { data: data.clone(), position: 0, truncate_to: *truncate_to })
        }

        fn volume_label(&self) -> Option<String> {
            None
        }

        fn root_info(&self, _info_type: crate::guid::Guid) -> Option<Vec<u8>> {
            None
        }
    }

    #[test]
    fn path_sizes() {
        assert_eq!(path_size(0, 0), Some(2));
        assert_eq!(path_size(5, 7), Some(26));
        assert_eq!(path_size(usize::MAX, 0), None);
        assert_eq!(path_size(usize::MAX / 2, 0), None);
        assert_eq!(path_size(usize::MAX / 4, usize::MAX / 4), Some(usize::MAX - 1));
        assert_eq!(path_size(usize::MAX / 2, usize::MAX / 2), None);
        assert_eq!(path_size(0, usize::MAX / 2 + 1), None);
    }

    #[test]
    fn overflowing_path() {
        let fs = TestFs::default().with("\\System\\.contentDetails", b"Macintosh HD");

        for lengths in [(usize::MAX, 0), (0, usize::MAX / 2 + 1), (usize::MAX / 2, usize::MAX / 2)] {
            assert_eq!(
                read_with_lengths(&fs, "\\System\\", ".contentDetails", lengths, 64, 0),
                Err(Error::OutOfResources)
            );
        }
        assert_eq!(fs.opens.get(), 0);
    }

    #[test]
    fn reads_whole_file() {
        let fs = TestFs::default().with("\\System\\.contentDetails", b"Macintosh HD");
        assert_eq!(
            read_boot_entry_file(&fs, "\\System\\", ".contentDetails", 64, 0),
            Ok(b"Macintosh HD".to_vec())
        );
        assert_eq!(fs.opens.get(), 1);
    }

    #[test]
    fn size_limits() {
        let fs = TestFs::default().with("\\.disk_label", &[0; 4]).with("\\big", &[0; 65]);

        assert_eq!(read_boot_entry_file(&fs, "\\", ".disk_label", 64, 5), Err(Error::Unsupported));
        assert_eq!(read_boot_entry_file(&fs, "\\", ".disk_label", 64, 4), Ok(vec![0; 4]));
        assert_eq!(read_boot_entry_file(&fs, "\\", "big", 64, 0), Err(Error::NotFound));
        assert_eq!(read_boot_entry_file(&fs, "\\", "big", 65, 0), Ok(vec![0; 65]));
    }

    #[test]
    fn missing_and_short_reads() {
        let mut fs = TestFs::default();
        fs.files.insert("\\short", (vec![1, 2, 3, 4, 5, 6, 7, 8], 5));

        assert_eq!(read_boot_entry_file(&fs, "\\", "missing", 64, 0), Err(Error::NotFound));
        assert_eq!(read_boot_entry_file(&fs, "\\", "short", 64, 0), Err(Error::NotFound));
        assert_eq!(file_size(&fs, "\\short"), Ok(8));
        assert_eq!(file_size(&fs, "\\missing"), Err(Error::NotFound));
    }
}
