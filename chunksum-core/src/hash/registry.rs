//! Digest constructions known to chunksum, resolved once by name.

use std::fmt;
use std::str::FromStr;

use digest::Digest;

use crate::error::ChunksumError;

/// Incremental digest state for one chunk.
pub trait Accumulator: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

struct RustCrypto<D>(D);

impl<D: Digest + Send> Accumulator for RustCrypto<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }
    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().to_vec()
    }
}

struct Blake3(blake3::Hasher);

impl Accumulator for Blake3 {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }
    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b512,
    Blake2s256,
    Blake3,
}

impl Algorithm {
    pub const ALL: [Algorithm; 15] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha512_224,
        Algorithm::Sha512_256,
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
        Algorithm::Blake2b512,
        Algorithm::Blake2s256,
        Algorithm::Blake3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha512_224 => "sha512-224",
            Algorithm::Sha512_256 => "sha512-256",
            Algorithm::Sha3_224 => "sha3-224",
            Algorithm::Sha3_256 => "sha3-256",
            Algorithm::Sha3_384 => "sha3-384",
            Algorithm::Sha3_512 => "sha3-512",
            Algorithm::Blake2b512 => "blake2b",
            Algorithm::Blake2s256 => "blake2s",
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha224 | Algorithm::Sha512_224 | Algorithm::Sha3_224 => 28,
            Algorithm::Sha256
            | Algorithm::Sha512_256
            | Algorithm::Sha3_256
            | Algorithm::Blake2s256
            | Algorithm::Blake3 => 32,
            Algorithm::Sha384 | Algorithm::Sha3_384 => 48,
            Algorithm::Sha512 | Algorithm::Sha3_512 | Algorithm::Blake2b512 => 64,
        }
    }

    pub fn accumulator(self) -> Box<dyn Accumulator> {
        match self {
            Algorithm::Md5 => Box::new(RustCrypto(md5::Md5::new())),
            Algorithm::Sha1 => Box::new(RustCrypto(sha1::Sha1::new())),
            Algorithm::Sha224 => Box::new(RustCrypto(sha2::Sha224::new())),
            Algorithm::Sha256 => Box::new(RustCrypto(sha2::Sha256::new())),
            Algorithm::Sha384 => Box::new(RustCrypto(sha2::Sha384::new())),
            Algorithm::Sha512 => Box::new(RustCrypto(sha2::Sha512::new())),
            Algorithm::Sha512_224 => Box::new(RustCrypto(sha2::Sha512_224::new())),
            Algorithm::Sha512_256 => Box::new(RustCrypto(sha2::Sha512_256::new())),
            Algorithm::Sha3_224 => Box::new(RustCrypto(sha3::Sha3_224::new())),
            Algorithm::Sha3_256 => Box::new(RustCrypto(sha3::Sha3_256::new())),
            Algorithm::Sha3_384 => Box::new(RustCrypto(sha3::Sha3_384::new())),
            Algorithm::Sha3_512 => Box::new(RustCrypto(sha3::Sha3_512::new())),
            Algorithm::Blake2b512 => Box::new(RustCrypto(blake2::Blake2b512::new())),
            Algorithm::Blake2s256 => Box::new(RustCrypto(blake2::Blake2s256::new())),
            Algorithm::Blake3 => Box::new(Blake3(blake3::Hasher::new())),
        }
    }

    /// One-shot digest of an in-memory buffer.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        let mut acc = self.accumulator();
        acc.update(data);
        acc.finalize()
    }
}

impl FromStr for Algorithm {
    type Err = ChunksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match name.as_str() {
            "blake2b512" => Some(Algorithm::Blake2b512),
            "blake2s256" => Some(Algorithm::Blake2s256),
            "sha-1" => Some(Algorithm::Sha1),
            _ => None,
        };
        alias
            .or_else(|| Algorithm::ALL.into_iter().find(|a| a.name() == name))
            .ok_or_else(|| ChunksumError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
