//! yEnc encoder and decoder engines.
//!
//! yEnc is the binary-to-text encoding used for binary attachments on
//! NNTP/Usenet: each byte is shifted by +42 modulo 256 and a small set of
//! critical characters is escaped with a `=` prefix. This crate provides
//! the byte-stream engines only - framing lines (`=ybegin`, `=yend`) are
//! neither produced nor parsed, though the decoder *detects* their start
//! and yields control to the caller.
//!
//! # Engines
//!
//! - **Encoder**: stateful, chunk-driven transformation from arbitrary bytes
//!   to yEnc text with hard line wrapping ([`encode`], [`Encoder`]).
//! - **Decoder**: stateful, in-place-capable transformation from yEnc text
//!   back to bytes, with NNTP dot-unstuffing and end-of-article detection
//!   ([`decode`], [`decode_incremental`], [`Decoder`]).
//!
//! Both engines select a kernel per CPU capability level once per process;
//! the scalar fallback is always available and all kernels produce
//! byte-identical output.
//!
//! # Quick Start
//!
//! ```
//! let data = b"Hello World!";
//!
//! let mut encoded = vec![0u8; yenc::max_encoded_len(data.len(), 128)];
//! let mut column = 0;
//! let n = yenc::encode(128, &mut column, data, &mut encoded, true);
//! encoded.truncate(n);
//!
//! let mut decoded = vec![0u8; encoded.len()];
//! let mut state = yenc::DecoderState::CrLf;
//! let n = yenc::decode(false, &encoded, &mut decoded, &mut state);
//! assert_eq!(&decoded[..n], data);
//! ```
//!
//! # Concurrency
//!
//! All state lives in caller-owned values (the encoder column, the decoder
//! sequence state); the engines own no memory and never allocate on the hot
//! path. After the one-time kernel selection, every entry point is safe to
//! call concurrently on disjoint buffers.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

mod consts;
pub mod decode;
pub mod encode;

#[cfg(test)]
mod proptests;

pub use consts::DEFAULT_LINE_SIZE;
#[cfg(feature = "alloc")]
pub use decode::decode_to_vec;
pub use decode::{
  DecodeEnd, Decoder, DecoderState, decode, decode_backend_name, decode_in_place, decode_incremental,
  decode_incremental_in_place, decode_init, decode_kernel,
};
#[cfg(feature = "alloc")]
pub use encode::encode_to_vec;
pub use encode::{Encoder, encode, encode_backend_name, encode_init, encode_kernel, max_encoded_len};
