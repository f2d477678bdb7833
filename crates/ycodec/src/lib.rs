//! High-throughput yEnc codec and CRC-32 engine.
//!
//! `ycodec` bundles three byte-stream engines for mail/news clients and
//! archival tools that move multi-megabyte article streams:
//!
//! - the **yEnc encoder**: bytes to yEnc text with hard line wrapping,
//! - the **yEnc decoder**: yEnc text back to bytes, with NNTP dot-unstuffing
//!   and end-of-article detection, in-place capable,
//! - the **CRC-32 engine**: incremental hashing plus closed-form combine /
//!   zero-extend / multiply arithmetic over the CRC Galois field.
//!
//! Each engine probes the CPU once and installs the widest kernel the
//! machine supports; the scalar fallback is always available and all
//! kernels produce byte-identical output.
//!
//! # Quick Start
//!
//! ```
//! use ycodec::{Checksum, Crc32};
//!
//! let data = b"attachment payload";
//!
//! // Encode an article body.
//! let wire = ycodec::encode_to_vec(data, 128);
//!
//! // Decode it back and checksum for the =yend trailer.
//! let decoded = ycodec::decode_to_vec(false, &wire);
//! assert_eq!(decoded, data);
//! assert_eq!(Crc32::checksum(&decoded), Crc32::checksum(data));
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection for optimal dispatch |
//! | `alloc` | via `std` | The `*_to_vec` convenience helpers |
#![cfg_attr(not(feature = "std"), no_std)]

/// Crate version, in `MAJOR.MINOR.PATCH` form.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// CRC-32
// =============================================================================

pub use checksum::{
  Checksum, ChecksumCombine, Crc32, crc32, crc32_256pow, crc32_2pow, crc32_backend_name, crc32_combine, crc32_init,
  crc32_kernel, crc32_multiply, crc32_unzero, crc32_zeros, gf,
};

// =============================================================================
// yEnc
// =============================================================================

#[cfg(feature = "alloc")]
pub use yenc::{decode_to_vec, encode_to_vec};
pub use yenc::{
  DEFAULT_LINE_SIZE, DecodeEnd, Decoder, DecoderState, Encoder, decode, decode_backend_name, decode_in_place,
  decode_incremental, decode_incremental_in_place, decode_init, decode_kernel, encode, encode_backend_name,
  encode_init, encode_kernel, max_encoded_len,
};

// =============================================================================
// Dispatch introspection
// =============================================================================

pub use backend::KernelTier;
pub use platform::{CpuCaps, caps};
