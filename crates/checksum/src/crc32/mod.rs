//! CRC-32 (IEEE 802.3, reflected polynomial 0xEDB88320).
//!
//! This module wires the kernel tiers to the public driver surface:
//!
//! - [`crc32`] / [`Crc32`] - incremental hashing
//! - [`crc32_combine`], [`crc32_zeros`], [`crc32_unzero`] - composition
//! - [`crc32_multiply`], [`crc32_2pow`], [`crc32_256pow`] - field arithmetic
//! - [`crc32_init`], [`crc32_kernel`], [`crc32_backend_name`] - lifecycle and
//!   introspection
//!
//! # Convention
//!
//! Public values are finalized (final XOR applied): `crc32(b"", 0) == 0`.
//! Kernels internally operate on the raw register state.

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(test)]
mod proptests;

use backend::dispatch::Selected;
use backend::{KernelCache, KernelTier, candidates};
use platform::Bits256;

use crate::gf;

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel signature: raw state in, raw state out.
type Crc32Fn = fn(u32, &[u8]) -> u32;

static CRC32_KERNEL: KernelCache<Selected<Crc32Fn>> = KernelCache::new();

#[cfg(target_arch = "x86_64")]
fn select_crc32() -> Selected<Crc32Fn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "x86_64/pclmul" => platform::caps::x86::PCLMUL_READY => KernelTier::Simd128 => x86_64::crc32_pclmul_safe,
      "portable/slice8" => Bits256::NONE => KernelTier::Portable => portable::crc32_slice8,
    ],
  )
}

#[cfg(target_arch = "aarch64")]
fn select_crc32() -> Selected<Crc32Fn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "aarch64/crc" => platform::caps::aarch64::CRC_READY => KernelTier::HwAccel => aarch64::crc32_armv8_safe,
      "portable/slice8" => Bits256::NONE => KernelTier::Portable => portable::crc32_slice8,
    ],
  )
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn select_crc32() -> Selected<Crc32Fn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "portable/slice8" => Bits256::NONE => KernelTier::Portable => portable::crc32_slice8,
    ],
  )
}

#[inline]
fn kernel() -> Selected<Crc32Fn> {
  CRC32_KERNEL.resolve(select_crc32)
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver Surface
// ─────────────────────────────────────────────────────────────────────────────

/// Initialise the CRC-32 engine: detects CPU features and caches the kernel
/// selection.
///
/// Idempotent and optional - every entry point initialises lazily on first
/// use, so a forgotten init still produces correct output. Call it once at
/// program start to keep the one-time detection off the hot path.
#[inline]
pub fn crc32_init() {
  let _ = kernel();
}

/// Compute the CRC-32 of `data`, continuing from `init`.
///
/// `init` is a finalized CRC value (0 for a fresh stream); the result is
/// finalized as well, so `crc32(b, crc32(a, 0)) == crc32(ab, 0)`.
#[inline]
#[must_use]
pub fn crc32(data: &[u8], init: u32) -> u32 {
  (kernel().func)(init ^ !0, data) ^ !0
}

/// Given `crc1 = crc(A)` and `crc2 = crc(B)`, returns `crc(A || B)`.
/// `len2` is the length of `B` in bytes.
#[inline]
#[must_use]
pub fn crc32_combine(crc1: u32, crc2: u32, len2: u64) -> u32 {
  gf::combine(crc1, crc2, len2)
}

/// Returns `crc32(zeros, init)` where `zeros` is `len` zero bytes, in
/// O(log len) time.
#[inline]
#[must_use]
pub fn crc32_zeros(init: u32, len: u64) -> u32 {
  gf::zeros(init, len)
}

/// Inverse of [`crc32_zeros`]: given `crc(data || zeros)`, returns
/// `crc(data)`.
#[inline]
#[must_use]
pub fn crc32_unzero(init: u32, len: u64) -> u32 {
  gf::unzero(init, len)
}

/// Product of `a` and `b` in the CRC-32 Galois field.
#[inline]
#[must_use]
pub fn crc32_multiply(a: u32, b: u32) -> u32 {
  gf::multiply(a, b)
}

/// `2^n` (that is, `x^n`) in the CRC-32 field. `n` may be negative.
#[inline]
#[must_use]
pub fn crc32_2pow(n: i64) -> u32 {
  gf::pow2(n)
}

/// `2^(8n)` in the CRC-32 field. Unlike `crc32_2pow(8 * n)`, `n` near
/// `2^64` cannot overflow.
#[inline]
#[must_use]
pub fn crc32_256pow(n: u64) -> u32 {
  gf::pow256(n)
}

/// The acceleration tier of the selected kernel (`Portable` for the scalar
/// table kernel).
#[inline]
#[must_use]
pub fn crc32_kernel() -> KernelTier {
  kernel().tier
}

/// The name of the selected kernel, e.g. `"x86_64/pclmul"`.
#[inline]
#[must_use]
pub fn crc32_backend_name() -> &'static str {
  kernel().name
}

// ─────────────────────────────────────────────────────────────────────────────
// Crc32 Type
// ─────────────────────────────────────────────────────────────────────────────

/// CRC-32 (IEEE) streaming checksum.
///
/// Used by yEnc trailers, Ethernet, gzip, zip, PNG, etc.
///
/// # Properties
///
/// - **Polynomial**: 0x04C11DB7 (normal), 0xEDB88320 (reflected)
/// - **Initial value**: 0xFFFFFFFF
/// - **Final XOR**: 0xFFFFFFFF
/// - **Reflect input/output**: Yes
///
/// # Examples
///
/// ```
/// use checksum::{Checksum, Crc32};
///
/// assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
/// ```
#[derive(Clone, Copy)]
pub struct Crc32 {
  state: u32,
}

impl Crc32 {
  /// Create a hasher resuming from a previously finalized CRC value.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self { state: crc ^ !0 }
  }

  /// The name of the currently selected backend.
  #[must_use]
  pub fn backend_name() -> &'static str {
    crc32_backend_name()
  }
}

impl traits::Checksum for Crc32 {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Self { state: !0 }
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Self { state: initial ^ !0 }
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.state = (kernel().func)(self.state, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    self.state ^ !0
  }

  #[inline]
  fn reset(&mut self) {
    self.state = !0;
  }
}

impl Default for Crc32 {
  fn default() -> Self {
    <Self as traits::Checksum>::new()
  }
}

impl traits::ChecksumCombine for Crc32 {
  fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    gf::combine(crc_a, crc_b, len_b as u64)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
