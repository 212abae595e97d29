//! Sequence buffer helpers: the binary file format the sorter consumes and
//! produces, and the post-run verification scan.
//!
//! File format: a little-endian `i32` element count followed by that many
//! little-endian `i32` values. The scan runs only after every worker has
//! been joined, so it needs no locking.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("file declares {expected} elements but ends after {got}")]
    Truncated { expected: usize, got: usize },
    #[error("negative element count in file header: {0}")]
    NegativeLen(i32),
    #[error("sequence of {0} elements does not fit the i32 file header")]
    LenOverflow(usize),
}

/// Outcome of the verification scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Sorted,
    /// First adjacent pair found out of order: `seq[index] > seq[index + 1]`.
    Unsorted { index: usize, left: i32, right: i32 },
}

impl Verification {
    pub fn is_sorted(&self) -> bool {
        matches!(self, Verification::Sorted)
    }
}

/// Scans once and reports the first out-of-order adjacent pair, if any.
pub fn verify(seq: &[i32]) -> Verification {
    for i in 0..seq.len().saturating_sub(1) {
        if seq[i] > seq[i + 1] {
            return Verification::Unsorted {
                index: i,
                left: seq[i],
                right: seq[i + 1],
            };
        }
    }
    Verification::Sorted
}

/// Loads a length-prefixed binary integer sequence.
pub fn read_file(path: &Path) -> Result<Vec<i32>, SequenceError> {
    let mut reader = BufReader::new(File::open(path)?);

    let len = read_i32(&mut reader)?;
    if len < 0 {
        return Err(SequenceError::NegativeLen(len));
    }
    let len = len as usize;

    // Don't trust the header for the up-front allocation: a truncated or
    // hostile file could claim i32::MAX elements. Cap the reservation and
    // let the vec grow as payload actually arrives.
    const MAX_PREALLOC_ELEMS: usize = 1 << 20;
    let mut seq = Vec::with_capacity(len.min(MAX_PREALLOC_ELEMS));
    for got in 0..len {
        match read_i32(&mut reader) {
            Ok(val) => seq.push(val),
            Err(SequenceError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(SequenceError::Truncated { expected: len, got });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(seq)
}

/// Stores a sequence in the same length-prefixed format `read_file` loads.
pub fn write_file(path: &Path, seq: &[i32]) -> Result<(), SequenceError> {
    let header = i32::try_from(seq.len()).map_err(|_| SequenceError::LenOverflow(seq.len()))?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&header.to_le_bytes())?;
    for &val in seq {
        writer.write_all(&val.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, SequenceError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("par_bitonic_{}_{}", std::process::id(), name))
    }

    #[test]
    fn verify_reports_first_offender() {
        assert_eq!(verify(&[]), Verification::Sorted);
        assert_eq!(verify(&[7]), Verification::Sorted);
        assert_eq!(verify(&[1, 2, 2, 9]), Verification::Sorted);
        assert_eq!(
            verify(&[1, 5, 3, 2]),
            Verification::Unsorted {
                index: 1,
                left: 5,
                right: 3
            }
        );
    }

    #[test]
    fn file_round_trip() {
        let path = temp_path("round_trip.bin");
        let seq = vec![5, -3, 8, 1, i32::MAX, i32::MIN, 7, 4];

        write_file(&path, &seq).unwrap();
        let loaded = read_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, seq);
    }

    #[test]
    fn truncated_file_is_rejected() {
        let path = temp_path("truncated.bin");
        // Header says 4 elements, body holds 2.
        let mut bytes = 4i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&2i32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let err = read_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            err,
            SequenceError::Truncated {
                expected: 4,
                got: 2
            }
        ));
    }

    #[test]
    fn huge_header_on_tiny_file_errors_without_allocating() {
        let path = temp_path("huge_header.bin");
        // Header claims i32::MAX elements, body holds one. Must surface a
        // truncation error, not attempt a multi-GiB reservation first.
        let mut bytes = i32::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(&7i32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let err = read_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            err,
            SequenceError::Truncated {
                expected,
                got: 1
            } if expected == i32::MAX as usize
        ));
    }

    #[test]
    fn negative_header_is_rejected() {
        let path = temp_path("negative.bin");
        std::fs::write(&path, (-1i32).to_le_bytes()).unwrap();

        let err = read_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, SequenceError::NegativeLen(-1)));
    }
}
