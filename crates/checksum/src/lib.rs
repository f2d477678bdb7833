//! CRC-32 (IEEE 802.3, reflected) with automatic SIMD acceleration.
//!
//! This crate provides the checksum engine of the ycodec workspace: an
//! incremental CRC-32 plus closed-form composition arithmetic over the CRC
//! Galois field.
//!
//! # External Convention
//!
//! All public CRC values are *finalized*: the final XOR with `0xFFFF_FFFF`
//! has already been applied. Consequently `crc32(b"", 0) == 0` and
//! incremental hashing chains as `crc32(b, crc32(a, 0)) == crc32(a ++ b, 0)`.
//!
//! # Quick Start
//!
//! ```
//! use checksum::{Checksum, Crc32};
//!
//! // One-shot
//! assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
//!
//! // Streaming
//! let mut hasher = Crc32::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), 0xCBF4_3926);
//!
//! // Combine: crc(A || B) from crc(A), crc(B), len(B)
//! let combined = checksum::crc32_combine(Crc32::checksum(b"foo"), Crc32::checksum(b"bar"), 3);
//! assert_eq!(combined, Crc32::checksum(b"foobar"));
//! ```
//!
//! # Kernels
//!
//! | Kernel | Requires | Tier |
//! |--------|----------|------|
//! | `portable/slice8` | - | 0 |
//! | `x86_64/pclmul` | PCLMULQDQ + SSE4.1 | 2 |
//! | `aarch64/crc` | ARMv8 CRC extension | 1 |
//!
//! The kernel is selected once per process and cached; [`crc32_init`] forces
//! the selection eagerly but is optional.
//!
//! # Feature Flags
//!
//! - `std` (default): runtime CPU detection for optimal dispatch
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(test)]
extern crate alloc;

mod common;
pub mod crc32;
pub mod gf;

pub use crc32::{
  Crc32, crc32, crc32_256pow, crc32_2pow, crc32_backend_name, crc32_combine, crc32_init, crc32_kernel, crc32_multiply,
  crc32_unzero, crc32_zeros,
};
// Re-export traits for convenience.
pub use traits::{Checksum, ChecksumCombine};
