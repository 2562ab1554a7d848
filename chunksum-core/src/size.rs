use crate::error::{ChunksumError, Result};

/// Chunk sizes accepted on the command line must be a multiple of this.
pub const MIN_ALIGNMENT: u64 = 64 * 1024;

fn unit_shift(unit: u8) -> Option<u32> {
    let pos = b"kmgtpezy".iter().position(|&u| u == unit.to_ascii_lowercase())?;
    Some(10 * (pos as u32 + 1))
}

/// Parse `<integer>[unit][b]`, with base-1024 units `k m g t p e z y`
/// (case-insensitive). A bare integer is a byte count.
pub fn parse_size(input: &str) -> Result<u64> {
    let invalid = || ChunksumError::InvalidConfiguration(format!("invalid size: {input:?}"));
    let s = input.trim().as_bytes();

    let digits = s.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || s[0] == b'0' {
        return Err(invalid());
    }
    let (num, rest) = s.split_at(digits);

    let shift = match rest {
        [] => 0,
        [u] | [u, b'b' | b'B'] => unit_shift(*u).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };

    let value: u64 = std::str::from_utf8(num)
        .ok()
        .and_then(|n| n.parse().ok())
        .ok_or_else(invalid)?;
    1u64.checked_shl(shift)
        .and_then(|m| value.checked_mul(m))
        .ok_or_else(|| ChunksumError::InvalidConfiguration(format!("size overflows: {input:?}")))
}

pub fn check_alignment(chunk_size: u64) -> Result<u64> {
    if chunk_size == 0 || chunk_size % MIN_ALIGNMENT != 0 {
        return Err(ChunksumError::InvalidConfiguration(format!(
            "chunk size {chunk_size} is not a multiple of {MIN_ALIGNMENT}"
        )));
    }
    Ok(chunk_size)
}
