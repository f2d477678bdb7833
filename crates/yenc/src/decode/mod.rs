//! yEnc decoder: yEnc text back to bytes.
//!
//! The decoder walks the wire stream left to right:
//!
//! - `=` consumes the following byte `n` and emits `(n - 106) mod 256`,
//! - `\r` and `\n` are consumed and emit nothing,
//! - anything else emits `(b - 42) mod 256`,
//! - in raw mode a `.` directly after `\r\n` is NNTP dot-stuffing and is
//!   consumed silently.
//!
//! The last few logical bytes seen are summarised in a seven-state
//! [`DecoderState`], which threads across calls so a stream may arrive in
//! arbitrary chunks. The incremental driver additionally stops at the
//! NNTP/yEnc terminators: `\r\n.\r\n` (end of article) and `\r\n=y` (start
//! of a control line such as `=ybegin`/`=yend`, which this crate does not
//! parse).
//!
//! Decoding is total: malformed input produces best-effort output and never
//! errors.

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use backend::dispatch::Selected;
use backend::{KernelCache, KernelTier, candidates};
use platform::Bits256;

// ─────────────────────────────────────────────────────────────────────────────
// State Types
// ─────────────────────────────────────────────────────────────────────────────

/// Decoder sequence state: the last few bytes seen on the logical stream.
///
/// The shorthands name those bytes: CR (`\r`), LF (`\n`), EQ (`=`),
/// DT (`.`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecoderState {
  /// Last was `\r\n`: line-start context. The initial state.
  #[default]
  CrLf,
  /// Last was `\r`.
  Cr,
  /// Last was `=`: mid-escape, the next byte is payload.
  Eq,
  /// Mid-line, no special context.
  None,
  /// `\r\n.` seen (raw mode): dot-stuffing, possibly end-of-article.
  CrLfDt,
  /// `\r\n.\r` seen.
  CrLfDtCr,
  /// `\r\n=` seen: possibly the start of a control line.
  CrLfEq,
}

/// Why an incremental decode stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecodeEnd {
  /// The end of the input was reached without a terminator.
  #[default]
  None,
  /// `\r\n=y` was found; input position is just after the `y`. The caller
  /// owns parsing the control line (`=ybegin`, `=yend`, ...) and should
  /// resume decoding after its terminating `\r\n`.
  Control,
  /// `\r\n.\r\n` was found; input position is just after the final `\n`.
  Article,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel signature over raw pointers so one kernel serves both the
/// disjoint and the in-place (`src == dst`) drivers.
///
/// Safety contract: `src` valid for `len` reads, `dst` for `len` writes,
/// and when the regions alias the kernel keeps the write index at or below
/// the read index.
type DecodeFn = unsafe fn(bool, *const u8, *mut u8, usize, &mut DecoderState) -> usize;

static DECODE_KERNEL: KernelCache<Selected<DecodeFn>> = KernelCache::new();

#[cfg(target_arch = "x86_64")]
fn select_decode() -> Selected<DecodeFn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "x86_64/avx2" => platform::caps::x86::AVX2_READY => KernelTier::Simd256 => x86_64::decode_avx2_entry,
      "x86_64/sse2" => platform::caps::x86::SSE2 => KernelTier::Simd128 => x86_64::decode_sse2_entry,
      "portable" => Bits256::NONE => KernelTier::Portable => portable::decode_scalar,
    ],
  )
}

#[cfg(target_arch = "aarch64")]
fn select_decode() -> Selected<DecodeFn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "aarch64/neon" => platform::caps::aarch64::NEON_READY => KernelTier::Simd128 => aarch64::decode_neon_entry,
      "portable" => Bits256::NONE => KernelTier::Portable => portable::decode_scalar,
    ],
  )
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn select_decode() -> Selected<DecodeFn> {
  backend::dispatch::select(
    platform::caps(),
    candidates![
      "portable" => Bits256::NONE => KernelTier::Portable => portable::decode_scalar,
    ],
  )
}

#[inline]
fn kernel() -> Selected<DecodeFn> {
  DECODE_KERNEL.resolve(select_decode)
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver Surface
// ─────────────────────────────────────────────────────────────────────────────

/// Initialise the decoder: detects CPU features and caches the kernel
/// selection.
///
/// Idempotent and optional - every entry point initialises lazily.
#[inline]
pub fn decode_init() {
  let _ = kernel();
}

/// Decode `src` into `dst`, threading the sequence state across calls.
///
/// - `is_raw`: enable NNTP dot-unstuffing at line starts.
/// - `dst`: must hold at least `src.len()` bytes (output never exceeds
///   input). Checked only by `debug_assert`.
/// - `state`: start an article at [`DecoderState::CrLf`].
///
/// Returns the number of bytes written. For decoding within one buffer use
/// [`decode_in_place`].
#[inline]
pub fn decode(is_raw: bool, src: &[u8], dst: &mut [u8], state: &mut DecoderState) -> usize {
  debug_assert!(dst.len() >= src.len());
  // SAFETY: src and dst are live, disjoint slices (guaranteed by the borrow
  // checker) and dst holds at least src.len() bytes.
  unsafe { (kernel().func)(is_raw, src.as_ptr(), dst.as_mut_ptr(), src.len(), state) }
}

/// Decode `buf` onto itself, threading the sequence state across calls.
///
/// Decoded output always fits: two wire bytes shrink to one for escapes and
/// line breaks vanish, so the writer can never pass the reader.
///
/// Returns the number of decoded bytes at the front of `buf`; the remainder
/// holds leftover wire bytes.
#[inline]
pub fn decode_in_place(is_raw: bool, buf: &mut [u8], state: &mut DecoderState) -> usize {
  let ptr = buf.as_mut_ptr();
  // SAFETY: src == dst is part of the kernel contract: every kernel keeps
  // the write index at or below the read index.
  unsafe { (kernel().func)(is_raw, ptr as *const u8, ptr, buf.len(), state) }
}

/// Decode until an NNTP/yEnc terminator or the end of `src` (raw mode
/// implied).
///
/// Returns `(consumed, written, end)`: input bytes consumed, output bytes
/// written, and why decoding stopped. On [`DecodeEnd::Control`] the
/// position is just past the `y` of `\r\n=y`; on [`DecodeEnd::Article`]
/// just past the final `\n` of `\r\n.\r\n`. On either terminator the state
/// is reset to [`DecoderState::CrLf`].
///
/// `dst` must hold at least `src.len()` bytes.
#[inline]
pub fn decode_incremental(src: &[u8], dst: &mut [u8], state: &mut DecoderState) -> (usize, usize, DecodeEnd) {
  debug_assert!(dst.len() >= src.len());
  // SAFETY: live disjoint slices; dst holds at least src.len() bytes.
  unsafe { portable::decode_end_scalar(src.as_ptr(), dst.as_mut_ptr(), src.len(), state) }
}

/// In-place variant of [`decode_incremental`].
///
/// The decoded bytes land at the front of `buf`; `consumed` tells where the
/// unread wire bytes start.
#[inline]
pub fn decode_incremental_in_place(buf: &mut [u8], state: &mut DecoderState) -> (usize, usize, DecodeEnd) {
  let ptr = buf.as_mut_ptr();
  // SAFETY: src == dst with the writer at or below the reader, as in
  // `decode_in_place`.
  unsafe { portable::decode_end_scalar(ptr as *const u8, ptr, buf.len(), state) }
}

/// One-shot decode into a freshly allocated vector with a fresh state.
#[cfg(feature = "alloc")]
#[must_use]
pub fn decode_to_vec(is_raw: bool, src: &[u8]) -> alloc::vec::Vec<u8> {
  let mut dst = alloc::vec![0u8; src.len()];
  let mut state = DecoderState::CrLf;
  let n = decode(is_raw, src, &mut dst, &mut state);
  dst.truncate(n);
  dst
}

/// The acceleration tier of the selected decode kernel.
#[inline]
#[must_use]
pub fn decode_kernel() -> KernelTier {
  kernel().tier
}

/// The name of the selected decode kernel, e.g. `"x86_64/avx2"`.
#[inline]
#[must_use]
pub fn decode_backend_name() -> &'static str {
  kernel().name
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder Type
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming yEnc decoder.
///
/// Owns the sequence state so callers can feed wire data in arbitrary
/// chunks. A wrapper over [`decode`]; no allocation, no I/O.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
  raw: bool,
  state: DecoderState,
}

impl Decoder {
  /// Create a decoder at line-start state.
  ///
  /// `raw` enables NNTP dot-unstuffing.
  #[must_use]
  pub fn new(raw: bool) -> Self {
    Self {
      raw,
      state: DecoderState::CrLf,
    }
  }

  /// The current sequence state.
  #[inline]
  #[must_use]
  pub fn state(&self) -> DecoderState {
    self.state
  }

  /// Decode one chunk into `dst` (must hold `src.len()` bytes).
  #[inline]
  pub fn decode_chunk(&mut self, src: &[u8], dst: &mut [u8]) -> usize {
    decode(self.raw, src, dst, &mut self.state)
  }

  /// Decode one chunk in place.
  #[inline]
  pub fn decode_chunk_in_place(&mut self, buf: &mut [u8]) -> usize {
    decode_in_place(self.raw, buf, &mut self.state)
  }

  /// Reset to line-start state for the next article.
  #[inline]
  pub fn reset(&mut self) {
    self.state = DecoderState::CrLf;
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
  fn decode_matches_in_place() {
    let mut wire = Vec::new();
    let mut k = 3u64;
    while wire.len() < 2000 {
      k = k.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
      match k % 17 {
        0 => wire.extend_from_slice(b"\r\n"),
        1 => wire.extend_from_slice(b"\r\n.."),
        2 => wire.extend_from_slice(&[b'=', (k >> 8) as u8]),
        _ => wire.push((k >> 16) as u8),
      }
    }

    for raw in [false, true] {
      let mut fresh = std::vec![0u8; wire.len()];
      let mut state_a = DecoderState::CrLf;
      let na = decode(raw, &wire, &mut fresh, &mut state_a);

      let mut buf = wire.clone();
      let mut state_b = DecoderState::CrLf;
      let nb = decode_in_place(raw, &mut buf, &mut state_b);

      assert_eq!(nb, na);
      assert_eq!(&buf[..nb], &fresh[..na]);
      assert_eq!(state_b, state_a);
    }
  }

  #[test]
  fn chunked_equals_single_shot() {
    let mut wire = Vec::new();
    for i in 0..600u32 {
      match i % 13 {
        0 => wire.extend_from_slice(b"\r\n"),
        1 => wire.extend_from_slice(b"\r\n.x"),
        2 => wire.extend_from_slice(&[b'=', (i * 7) as u8]),
        _ => wire.push((i * 11) as u8),
      }
    }

    let whole = decode_to_vec(true, &wire);

    for chunk_len in [1usize, 2, 3, 7, 64, 599] {
      let mut dec = Decoder::new(true);
      let mut got = Vec::new();
      let mut buf = std::vec![0u8; chunk_len];
      for chunk in wire.chunks(chunk_len) {
        let n = dec.decode_chunk(chunk, &mut buf[..chunk.len()]);
        got.extend_from_slice(&buf[..n]);
      }
      assert_eq!(got, whole, "chunk_len={chunk_len}");
    }
  }

  #[test]
  fn incremental_stops_at_article_end() {
    let wire = b"abc\r\n.\r\nrest";
    let mut dst = std::vec![0u8; wire.len()];
    let mut state = DecoderState::CrLf;
    let (consumed, written, end) = decode_incremental(wire, &mut dst, &mut state);

    assert_eq!(end, DecodeEnd::Article);
    assert_eq!(consumed, 8); // just past the final \n
    let expected: Vec<u8> = b"abc".iter().map(|b| b.wrapping_sub(42)).collect();
    assert_eq!(&dst[..written], expected.as_slice());
    assert_eq!(state, DecoderState::CrLf);
  }

  #[test]
  fn incremental_stops_at_control() {
    let wire = b"ab\r\n=ybegin line=128\r\n";
    let mut dst = std::vec![0u8; wire.len()];
    let mut state = DecoderState::CrLf;
    let (consumed, written, end) = decode_incremental(wire, &mut dst, &mut state);

    assert_eq!(end, DecodeEnd::Control);
    assert_eq!(consumed, 6); // just past the 'y'
    assert_eq!(written, 2);
    assert_eq!(state, DecoderState::CrLf);
  }

  #[test]
  fn incremental_control_at_stream_start() {
    // The initial state is line-start, so an article beginning with =y
    // yields Control immediately.
    let wire = b"=ybegin part=1\r\n";
    let mut dst = std::vec![0u8; wire.len()];
    let mut state = DecoderState::CrLf;
    let (consumed, written, end) = decode_incremental(wire, &mut dst, &mut state);

    assert_eq!(end, DecodeEnd::Control);
    assert_eq!(consumed, 2);
    assert_eq!(written, 0);
  }

  #[test]
  fn stuffed_dot_escape_is_not_control() {
    // \r\n.=y: the dot is stuffing, so =y is an ordinary escape pair.
    let wire = b"\r\n.=yZ";
    let mut dst = std::vec![0u8; wire.len()];
    let mut state = DecoderState::CrLf;
    let (consumed, written, end) = decode_incremental(wire, &mut dst, &mut state);

    assert_eq!(end, DecodeEnd::None);
    assert_eq!(consumed, wire.len());
    assert_eq!(&dst[..written], &[b'y'.wrapping_sub(106), b'Z'.wrapping_sub(42)]);
  }

  #[test]
  fn incremental_terminators_split_across_chunks() {
    let wire = b"abc\r\n.\r\n";
    for split in 1..wire.len() {
      let mut state = DecoderState::CrLf;
      let mut dst = std::vec![0u8; wire.len()];
      let mut total_written = 0;
      let (c1, w1, e1) = decode_incremental(&wire[..split], &mut dst, &mut state);
      total_written += w1;
      assert_eq!(c1, split, "split={split}");
      if e1 == DecodeEnd::Article {
        continue; // terminator fully inside the first chunk
      }
      let (c2, w2, e2) = decode_incremental(&wire[split..], &mut dst[w1..], &mut state);
      total_written += w2;
      assert_eq!(e2, DecodeEnd::Article, "split={split}");
      assert_eq!(split + c2, wire.len(), "split={split}");
      assert_eq!(total_written, 3, "split={split}");
    }
  }

  #[test]
  fn incremental_in_place_matches_disjoint() {
    let wire = b"hello\r\nworld\r\n.\r\ntail";
    let mut dst = std::vec![0u8; wire.len()];
    let mut state_a = DecoderState::CrLf;
    let (ca, wa, ea) = decode_incremental(wire, &mut dst, &mut state_a);

    let mut buf = wire.to_vec();
    let mut state_b = DecoderState::CrLf;
    let (cb, wb, eb) = decode_incremental_in_place(&mut buf, &mut state_b);

    assert_eq!((cb, wb, eb), (ca, wa, ea));
    assert_eq!(&buf[..wb], &dst[..wa]);
  }

  #[test]
  fn total_on_garbage() {
    // Arbitrary bytes, including a trailing '=': no panic, state parks.
    let wire = [0xFFu8, 0x00, b'=', b'\r', b'=', b'\n', 0x80, b'='];
    let mut dst = std::vec![0u8; wire.len()];
    let mut state = DecoderState::CrLf;
    let n = decode(true, &wire, &mut dst, &mut state);
    assert!(n <= wire.len());
    assert_eq!(state, DecoderState::Eq);
  }

  #[test]
  fn kernel_introspection() {
    decode_init();
    assert!(!decode_backend_name().is_empty());
    let _ = decode_kernel().as_u8();
  }
}
