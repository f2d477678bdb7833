//! Portable slice-by-8 CRC-32 kernel.
//!
//! Processes 8 bytes per iteration via 8 x 256-entry lookup tables built at
//! compile time, with little-endian loads so the same code is endian-correct
//! everywhere. This is the always-available fallback tier.

// SAFETY: Table indexing uses `& 0xFF` masked indices into 256-entry tables.
#![allow(clippy::indexing_slicing)]

use crate::common::tables::{CRC32_POLY, generate_crc32_tables_8};

static TABLES: [[u32; 256]; 8] = generate_crc32_tables_8(CRC32_POLY);

/// Slice-by-8 CRC-32 update.
///
/// `crc` is the raw register state (pre-inverted); returns the updated raw
/// state.
#[must_use]
pub fn crc32_slice8(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let mut chunks = data.chunks_exact(8);

  for chunk in chunks.by_ref() {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(chunk);
    let d = u64::from_le_bytes(bytes);

    let lo = (crc as u64 ^ (d & 0xFFFF_FFFF)) as u32;
    let hi = (d >> 32) as u32;

    crc = TABLES[7][(lo & 0xFF) as usize]
      ^ TABLES[6][((lo >> 8) & 0xFF) as usize]
      ^ TABLES[5][((lo >> 16) & 0xFF) as usize]
      ^ TABLES[4][((lo >> 24) & 0xFF) as usize]
      ^ TABLES[3][(hi & 0xFF) as usize]
      ^ TABLES[2][((hi >> 8) & 0xFF) as usize]
      ^ TABLES[1][((hi >> 16) & 0xFF) as usize]
      ^ TABLES[0][((hi >> 24) & 0xFF) as usize];
  }

  for &byte in chunks.remainder() {
    crc = (crc >> 8) ^ TABLES[0][((crc ^ byte as u32) & 0xFF) as usize];
  }

  crc
}
