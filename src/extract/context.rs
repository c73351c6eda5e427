use crate::error::{ExtractError, Result};
use crate::format::container::{ContainerHeader, MagicScanner, HEADER_BODY_SIZE};
use bytes::BytesMut;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix of a file while it is still being written.
pub const PART_SUFFIX: &str = ".part";

/// Where the extractor stands in the current embedded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Looking for the marker. `assembling` is set once the marker was found
    /// and the header bytes following it are being collected.
    SearchingForHeader {
        /// Marker found, header bytes being collected
        assembling: bool,
    },
    /// Header decoded, collecting filename bytes
    ReadingFilename,
    /// Output file open, copying file bytes
    ReadingFile,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::SearchingForHeader { assembling: false }
    }
}

/// Header bytes collected so far when the header spans several payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderAccumulator {
    bytes: [u8; HEADER_BODY_SIZE],
    filled: usize,
}

impl HeaderAccumulator {
    /// Copies as many bytes as are still missing and returns how many were taken.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let n = (HEADER_BODY_SIZE - self.filled).min(data.len());
        self.bytes[self.filled..self.filled + n].copy_from_slice(&data[..n]);
        self.filled += n;
        n
    }

    /// Bytes collected so far.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Whether all 18 header bytes are present.
    pub fn is_complete(&self) -> bool {
        self.filled == HEADER_BODY_SIZE
    }

    /// The collected header bytes, meaningful once complete.
    pub fn bytes(&self) -> &[u8; HEADER_BODY_SIZE] {
        &self.bytes
    }

    /// Drops collected bytes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Output file of the file being extracted, written under a `.part` name.
#[derive(Debug)]
pub(crate) struct OutputFile {
    part_path: PathBuf,
    final_path: PathBuf,
    file: File,
}

impl OutputFile {
    pub(crate) fn create(dir: &Path, filename: &OsStr) -> Result<Self> {
        let final_path = dir.join(filename);
        let mut part_name = filename.to_os_string();
        part_name.push(PART_SUFFIX);
        let part_path = dir.join(part_name);
        let file = File::create(&part_path).map_err(|source| ExtractError::OutputOpen {
            path: part_path.clone(),
            source,
        })?;

        Ok(Self {
            part_path,
            final_path,
            file,
        })
    }

    pub(crate) fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .map_err(|source| ExtractError::OutputWrite {
                path: self.part_path.clone(),
                source,
            })
    }

    /// Closes the file and moves it to its final name. The `.part` file is
    /// removed when the rename fails.
    pub(crate) fn finish(mut self) -> Result<PathBuf> {
        self.file
            .flush()
            .map_err(|source| ExtractError::OutputWrite {
                path: self.part_path.clone(),
                source,
            })?;
        let Self {
            part_path,
            final_path,
            file,
        } = self;
        drop(file);
        if let Err(e) = std::fs::rename(&part_path, &final_path) {
            if let Err(cleanup) = std::fs::remove_file(&part_path) {
                log::warn!("could not remove {}: {}", part_path.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(final_path)
    }

    /// Closes the file, leaving the `.part` file in place.
    pub(crate) fn close(self) -> PathBuf {
        self.part_path
    }

    /// Closes and deletes the `.part` file.
    pub(crate) fn discard(self) -> Result<()> {
        let Self { part_path, file, .. } = self;
        drop(file);
        std::fs::remove_file(&part_path)?;
        Ok(())
    }
}

/// Filename as decoded from the container, before it touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Filename {
    /// Raw bytes, used for the paths on disk
    pub(crate) raw: OsString,
    /// Lossy UTF-8 rendering for reports and logs
    pub(crate) display: String,
}

/// Rejects filenames that are not a single path component.
pub(crate) fn validate_filename(raw: &[u8]) -> Result<Filename> {
    let display = String::from_utf8_lossy(raw).into_owned();
    let bad = raw.is_empty()
        || raw == b"."
        || raw == b".."
        || raw.iter().any(|&b| matches!(b, b'/' | b'\\' | 0));
    if bad {
        return Err(ExtractError::InvalidFilename(display));
    }
    Ok(Filename {
        raw: os_string_from_bytes(raw),
        display,
    })
}

#[cfg(unix)]
fn os_string_from_bytes(raw: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(raw).to_os_string()
}

#[cfg(not(unix))]
fn os_string_from_bytes(raw: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(raw).into_owned())
}

/// All state belonging to the file currently being extracted.
///
/// Resetting means replacing the whole value with `ExtractionContext::default()`.
#[derive(Debug, Default)]
pub(crate) struct ExtractionContext {
    pub(crate) phase: Phase,
    pub(crate) scanner: MagicScanner,
    pub(crate) header_acc: HeaderAccumulator,
    pub(crate) header: ContainerHeader,
    pub(crate) filename: String,
    /// Filename bytes while reading the filename, staged file bytes afterwards
    pub(crate) buffer: BytesMut,
    /// Fill level at which `buffer` is complete (filename) or flushed (file data)
    pub(crate) buffer_target: usize,
    pub(crate) file_bytes_written: u64,
    pub(crate) output: Option<OutputFile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accumulator_across_pushes() {
        let mut acc = HeaderAccumulator::default();
        assert_eq!(acc.push(&[1, 2, 3]), 3);
        assert!(!acc.is_complete());
        assert_eq!(acc.push(&[]), 0);
        assert_eq!(acc.push(&[4; 10]), 10);
        assert_eq!(acc.filled(), 13);
        assert_eq!(acc.push(&[5; 40]), 5);
        assert!(acc.is_complete());
        assert_eq!(acc.push(&[6; 4]), 0);
        assert_eq!(&acc.bytes()[..4], &[1, 2, 3, 4]);
        assert_eq!(acc.bytes()[17], 5);

        acc.clear();
        assert_eq!(acc.filled(), 0);
    }

    #[test]
    fn test_filename_validation() {
        assert_eq!(validate_filename(b"a.bin").unwrap().display, "a.bin");
        assert_eq!(validate_filename(b"..hidden").unwrap().raw, OsString::from("..hidden"));
        for bad in [&b""[..], b".", b"..", b"../etc", b"dir/file", b"c:\\x", b"a\0b"] {
            assert!(validate_filename(bad).is_err(), "{:?}", bad);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_filename_kept_raw() {
        use std::os::unix::ffi::OsStrExt;

        let name = validate_filename(b"caf\xe9.txt").unwrap();
        assert_eq!(name.raw.as_bytes(), b"caf\xe9.txt");
        assert_eq!(name.display, "caf\u{fffd}.txt");
    }

    #[test]
    fn test_rename_failure_removes_part_file() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory squats on the final name
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        std::fs::write(dir.path().join("taken").join("inner"), b"x").unwrap();

        let mut out = OutputFile::create(dir.path(), OsStr::new("taken")).unwrap();
        out.write_all(b"abc").unwrap();
        assert!(matches!(out.finish(), Err(ExtractError::Io(_))));
        assert!(!dir.path().join("taken.part").exists());
        assert!(dir.path().join("taken").join("inner").exists());
    }

    #[test]
    fn test_output_file_finish_and_discard() {
        let dir = tempfile::tempdir().unwrap();

        let mut out = OutputFile::create(dir.path(), OsStr::new("done.txt")).unwrap();
        out.write_all(b"abc").unwrap();
        assert!(dir.path().join("done.txt.part").exists());
        let path = out.finish().unwrap();
        assert_eq!(path, dir.path().join("done.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        assert!(!dir.path().join("done.txt.part").exists());

        let out = OutputFile::create(dir.path(), OsStr::new("gone.txt")).unwrap();
        out.discard().unwrap();
        assert!(!dir.path().join("gone.txt.part").exists());
        assert!(!dir.path().join("gone.txt").exists());
    }

    #[test]
    fn test_output_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        match OutputFile::create(&missing, OsStr::new("x")) {
            Err(ExtractError::OutputOpen { path, .. }) => {
                assert_eq!(path, missing.join("x.part"))
            }
            other => panic!("expected open failure, got {:?}", other),
        }
    }
}
