//! Fixed-size chunk arithmetic.
//!
//! Chunk `i` of a file covers `[i * chunk_size, min((i + 1) * chunk_size, size))`.
//! An empty file has no chunks.

use crate::error::{ChunksumError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRange {
    pub offset: u64,
    pub length: u64,
}

impl ChunkRange {
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Number of chunks needed to cover `file_size` bytes; `ceil(size / chunk)`.
pub fn chunk_count(file_size: u64, chunk_size: u64) -> u64 {
    debug_assert!(chunk_size >= 1);
    file_size.div_ceil(chunk_size)
}

pub fn chunk_range(file_size: u64, chunk_size: u64, chunk_index: u64) -> Result<ChunkRange> {
    let out_of_range = || ChunksumError::OutOfRange {
        index: chunk_index,
        file_size,
        chunk_size,
    };
    if chunk_size == 0 {
        return Err(out_of_range());
    }
    let offset = chunk_index.checked_mul(chunk_size).ok_or_else(out_of_range)?;
    if offset >= file_size {
        return Err(out_of_range());
    }
    Ok(ChunkRange {
        offset,
        length: chunk_size.min(file_size - offset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn ranges(size: u64, chunk: u64) -> Vec<ChunkRange> {
        (0..chunk_count(size, chunk))
            .map(|i| chunk_range(size, chunk, i).unwrap())
            .collect()
    }

    #[test]
    fn ranges_cover_file_without_gaps() {
        for size in 0..200u64 {
            for chunk in 1..40u64 {
                let rs = ranges(size, chunk);
                let mut cursor = 0;
                for r in &rs {
                    assert_eq!(r.offset, cursor, "size={size} chunk={chunk}");
                    assert!(r.length >= 1);
                    cursor = r.end();
                }
                assert_eq!(cursor, size, "size={size} chunk={chunk}");
            }
        }
    }

    #[test]
    fn count_is_ceiling_and_last_chunk_takes_remainder() {
        for size in 1..300u64 {
            for chunk in [1u64, 2, 3, 7, 64, 299, 300, 301] {
                let n = chunk_count(size, chunk);
                assert_eq!(n, (size + chunk - 1) / chunk);
                for i in 0..n - 1 {
                    assert_eq!(chunk_range(size, chunk, i).unwrap().length, chunk);
                }
                let last = chunk_range(size, chunk, n - 1).unwrap();
                assert_eq!(last.length, size - chunk * (n - 1));
            }
        }
    }

    #[test]
    fn exact_multiple() {
        let rs = ranges(8 * MIB, 4 * MIB);
        assert_eq!(
            rs,
            vec![
                ChunkRange { offset: 0, length: 4 * MIB },
                ChunkRange { offset: 4 * MIB, length: 4 * MIB },
            ]
        );
    }

    #[test]
    fn remainder_chunk() {
        let lens: Vec<u64> = ranges(9 * MIB, 4 * MIB).iter().map(|r| r.length).collect();
        assert_eq!(lens, vec![4 * MIB, 4 * MIB, MIB]);
    }

    #[test]
    fn empty_file_has_no_chunks() {
        assert_eq!(chunk_count(0, 4), 0);
        assert!(matches!(
            chunk_range(0, 4, 0),
            Err(ChunksumError::OutOfRange { .. })
        ));
    }

    #[test]
    fn index_past_end_is_out_of_range() {
        assert!(chunk_range(10, 4, 2).is_ok());
        let err = chunk_range(10, 4, 3).unwrap_err();
        assert!(err.is_defect());
        // offset overflow must not wrap around into a valid range
        assert!(chunk_range(u64::MAX, 1 << 40, u64::MAX).is_err());
    }
}
