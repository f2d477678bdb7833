//! aarch64 hardware CRC-32 kernel (ARMv8 CRC extension).
//!
//! # Safety
//!
//! Uses `unsafe` for aarch64 intrinsics. Callers must ensure the CRC
//! extension is available before executing the accelerated path (the
//! dispatcher does this).
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::*;

/// CRC-32 update using the ARMv8 CRC extension.
///
/// `crc` is the raw register state (pre-inverted).
#[inline]
#[target_feature(enable = "crc")]
unsafe fn crc32_armv8(crc: u32, data: &[u8]) -> u32 {
  let mut state = crc;

  let mut chunks8 = data.chunks_exact(8);
  for chunk in chunks8.by_ref() {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(chunk);
    state = __crc32d(state, u64::from_le_bytes(bytes));
  }

  let tail = chunks8.remainder();
  let mut chunks4 = tail.chunks_exact(4);
  for chunk in chunks4.by_ref() {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(chunk);
    state = __crc32w(state, u32::from_le_bytes(bytes));
  }

  for &b in chunks4.remainder() {
    state = __crc32b(state, b);
  }

  state
}

/// Safe wrapper for the ARMv8 CRC extension kernel.
#[inline]
#[must_use]
pub fn crc32_armv8_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: Dispatcher verifies the CRC extension before selecting this kernel.
  unsafe { crc32_armv8(crc, data) }
}
