//! CRC32 (IEEE) checksums for document records
//!
//! Every read validates the checksum; a mismatch is reported as corruption.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
