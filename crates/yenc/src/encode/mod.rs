//! yEnc encoder: arbitrary bytes to yEnc text.
//!
//! For each input byte `b` the encoder emits `c = (b + 42) mod 256`, or the
//! escape pair `'=', (c + 64) mod 256` when `c` is critical:
//!
//! - `NUL`, `LF`, `CR`, `'='` - always,
//! - `TAB`, `SPACE`, `'.'` - at the start of a line,
//! - `TAB`, `SPACE` - as the very last byte of the article (`is_end`).
//!
//! A hard `\r\n` is emitted once a line reaches `line_size` characters; an
//! escape pair is never split across the break. The column threads through
//! [`encode`] calls so a stream may be fed in arbitrary chunks and the
//! output is byte-identical to a single-shot encode.

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use backend::dispatch::Selected;
use backend::{KernelCache, KernelTier, candidates};
use platform::Bits256;

use crate::consts::SIMD_OVERRUN;

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel signature: `(line_size, column, src, dst, is_end) -> bytes written`.
type EncodeFn = fn(usize, &mut usize, &[u8], &mut [u8], bool) -> usize;

static ENCODE_KERNEL: KernelCache<Selected<EncodeFn>> = KernelCache::new();

#[cfg(target_arch = "x86_64")]
fn select_encode() -> Selected<EncodeFn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "x86_64/avx2" => platform::caps::x86::AVX2_READY => KernelTier::Simd256 => x86_64::encode_avx2_safe,
      "x86_64/sse2" => platform::caps::x86::SSE2 => KernelTier::Simd128 => x86_64::encode_sse2_safe,
      "portable" => Bits256::NONE => KernelTier::Portable => portable::encode_scalar,
    ],
  )
}

#[cfg(target_arch = "aarch64")]
fn select_encode() -> Selected<EncodeFn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "aarch64/neon" => platform::caps::aarch64::NEON_READY => KernelTier::Simd128 => aarch64::encode_neon_safe,
      "portable" => Bits256::NONE => KernelTier::Portable => portable::encode_scalar,
    ],
  )
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn select_encode() -> Selected<EncodeFn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "portable" => Bits256::NONE => KernelTier::Portable => portable::encode_scalar,
    ],
  )
}

#[inline]
fn kernel() -> Selected<EncodeFn> {
  ENCODE_KERNEL.resolve(select_encode)
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver Surface
// ─────────────────────────────────────────────────────────────────────────────

/// Initialise the encoder: detects CPU features and caches the kernel
/// selection.
///
/// Idempotent and optional - [`encode`] initialises lazily on first use.
#[inline]
pub fn encode_init() {
  let _ = kernel();
}

/// Maximum possible encoded length for `len` input bytes at `line_size`,
/// including the tail slack the vector kernels may write.
///
/// Destinations passed to [`encode`] must be at least this large. No engine
/// initialisation is required. `line_size < 2` is clamped to 2.
#[inline]
#[must_use]
pub const fn max_encoded_len(len: usize, line_size: usize) -> usize {
  let line_size = if line_size < 2 { 2 } else { line_size };
  // Worst case: every character escaped, plus a line break allowance and
  // room for vector stores to overshoot the final byte. A line holds at
  // least line_size - 1 characters (a pair that would straddle the limit
  // wraps first), so the break count divides by line_size - 1.
  let base = len * 2 + 2 + SIMD_OVERRUN;
  base + 2 * ((len * 2) / (line_size - 1) + 1)
}

/// Encode `src` into `dst`, threading the line column across calls.
///
/// - `line_size`: target characters per line; 128 is the universal value.
///   Values below 2 are clamped to 2.
/// - `column`: characters already emitted on the current line. Start an
///   article at 0; the final value is written back. After every call
///   `*column < line_size`.
/// - `dst`: must not overlap `src` and must hold at least
///   [`max_encoded_len`]`(src.len(), line_size)` bytes. This is a
///   documented precondition, checked only by `debug_assert`.
/// - `is_end`: set on the final chunk so trailing whitespace is escaped and
///   the output can be spliced directly against an `=yend` line.
///
/// Returns the number of bytes written. The operation cannot fail.
#[inline]
pub fn encode(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  let line_size = line_size.max(2);
  debug_assert!(dst.len() >= max_encoded_len(src.len(), line_size));
  (kernel().func)(line_size, column, src, dst, is_end)
}

/// One-shot encode into a freshly allocated vector with a fresh column and
/// `is_end = true`.
#[cfg(feature = "alloc")]
#[must_use]
pub fn encode_to_vec(src: &[u8], line_size: usize) -> alloc::vec::Vec<u8> {
  let line_size = line_size.max(2);
  let mut dst = alloc::vec![0u8; max_encoded_len(src.len(), line_size)];
  let mut column = 0;
  let n = encode(line_size, &mut column, src, &mut dst, true);
  dst.truncate(n);
  dst
}

/// The acceleration tier of the selected encode kernel.
#[inline]
#[must_use]
pub fn encode_kernel() -> KernelTier {
  kernel().tier
}

/// The name of the selected encode kernel, e.g. `"x86_64/avx2"`.
#[inline]
#[must_use]
pub fn encode_backend_name() -> &'static str {
  kernel().name
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoder Type
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming yEnc encoder.
///
/// Owns the column state so callers can feed an article in arbitrary
/// chunks. A wrapper over [`encode`]; no allocation, no I/O.
///
/// # Examples
///
/// ```
/// use yenc::{Encoder, max_encoded_len};
///
/// let mut enc = Encoder::new(128);
/// let mut out = vec![0u8; max_encoded_len(11, 128)];
/// let mut encoded = Vec::new();
///
/// let n = enc.encode_chunk(b"hello ", &mut out);
/// encoded.extend_from_slice(&out[..n]);
/// let n = enc.encode_last_chunk(b"world", &mut out);
/// encoded.extend_from_slice(&out[..n]);
///
/// assert_eq!(yenc::encode_to_vec(b"hello world", 128), encoded);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
  line_size: usize,
  column: usize,
}

impl Encoder {
  /// Create an encoder at the start of an article.
  ///
  /// `line_size` below 2 is clamped to 2.
  #[must_use]
  pub fn new(line_size: usize) -> Self {
    Self {
      line_size: line_size.max(2),
      column: 0,
    }
  }

  /// The current output column, in `[0, line_size)`.
  #[inline]
  #[must_use]
  pub fn column(&self) -> usize {
    self.column
  }

  /// Encode a non-final chunk. `dst` must hold
  /// [`max_encoded_len`]`(src.len(), line_size)` bytes.
  #[inline]
  pub fn encode_chunk(&mut self, src: &[u8], dst: &mut [u8]) -> usize {
    encode(self.line_size, &mut self.column, src, dst, false)
  }

  /// Encode the final chunk of the article, applying the trailing
  /// whitespace escape, and reset the column for the next article.
  #[inline]
  pub fn encode_last_chunk(&mut self, src: &[u8], dst: &mut [u8]) -> usize {
    let n = encode(self.line_size, &mut self.column, src, dst, true);
    self.column = 0;
    n
  }
}

impl Default for Encoder {
  fn default() -> Self {
    Self::new(crate::consts::DEFAULT_LINE_SIZE)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::vec::Vec;

  use super::*;

  #[test]
  fn single_shot_known_vector() {
    // "\x00" encodes to "*"; 0xD6 encodes to the escaped NUL pair.
    assert_eq!(encode_to_vec(b"\x00", 128), b"*");
    assert_eq!(encode_to_vec(&[0xD6], 128), b"=@");
  }

  #[test]
  fn line_width_bound_holds() {
    let data: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();
    for line_size in [2usize, 3, 16, 128, 256, 1000] {
      let out = encode_to_vec(&data, line_size);
      for line in out.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        assert!(line.len() <= line_size, "line_size={line_size} len={}", line.len());
      }
    }
  }

  #[test]
  fn no_line_starts_with_whitespace_or_dot() {
    let data: Vec<u8> = (0..8192u32).map(|i| (i.wrapping_mul(97)) as u8).collect();
    for line_size in [2usize, 16, 128] {
      let out = encode_to_vec(&data, line_size);
      let mut at_line_start = true;
      for &b in &out {
        if at_line_start {
          assert!(![b'.', b'\t', b' '].contains(&b), "line_size={line_size}");
        }
        at_line_start = b == b'\n';
      }
    }
  }

  #[test]
  fn is_end_escapes_trailing_whitespace() {
    // 0xF6 encodes to SPACE.
    let out = encode_to_vec(&[b'a', 0xF6], 128);
    assert_eq!(out.last(), Some(&b'`'));
    assert_eq!(out[out.len() - 2], b'=');
  }

  #[test]
  fn chunked_equals_single_shot() {
    let data: Vec<u8> = (0..1000u32).map(|i| (i.wrapping_mul(31)) as u8).collect();
    let whole = encode_to_vec(&data, 128);

    for chunk_len in [1usize, 2, 37, 128, 999] {
      let mut enc = Encoder::new(128);
      let mut got = Vec::new();
      let chunks: Vec<&[u8]> = data.chunks(chunk_len).collect();
      let mut buf = std::vec![0u8; max_encoded_len(chunk_len, 128)];
      for (idx, chunk) in chunks.iter().enumerate() {
        let n = if idx + 1 == chunks.len() {
          enc.encode_last_chunk(chunk, &mut buf)
        } else {
          enc.encode_chunk(chunk, &mut buf)
        };
        got.extend_from_slice(&buf[..n]);
      }
      assert_eq!(got, whole, "chunk_len={chunk_len}");
    }
  }

  #[test]
  fn tiny_line_size_is_clamped() {
    let out_zero = encode_to_vec(b"abcdef", 0);
    let out_two = encode_to_vec(b"abcdef", 2);
    assert_eq!(out_zero, out_two);
  }

  #[test]
  fn max_encoded_len_is_sufficient_for_worst_case() {
    // All-0xD6 input escapes every byte.
    for line_size in [2usize, 3, 128] {
      let data = std::vec![0xD6u8; 300];
      let out = encode_to_vec(&data, line_size);
      assert!(out.len() <= max_encoded_len(data.len(), line_size), "line_size={line_size}");
    }
  }

  #[test]
  fn kernel_introspection() {
    encode_init();
    assert!(!encode_backend_name().is_empty());
    let _ = encode_kernel().as_u8();
  }
}
