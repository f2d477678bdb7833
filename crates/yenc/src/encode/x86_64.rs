//! x86_64 yEnc encode kernels (SSE2 / AVX2).
//!
//! The hot loop classifies a full vector of shifted bytes against the
//! always-critical set; a clean window away from line boundaries is stored
//! in one shot, and everything else - escapes, line starts, wraps, the final
//! byte of the stream - bridges through the scalar step so the output is
//! byte-identical to the portable kernel.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure the required
//! features are available before executing the accelerated path (the
//! dispatcher does this).
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
// SAFETY: Destination indexing is covered by the documented capacity
// precondition.
#![allow(clippy::indexing_slicing)]

use core::arch::x86_64::*;

use super::portable::encode_byte;
use crate::consts::{CR, ESCAPE, LF, NUL, SHIFT};

#[target_feature(enable = "sse2")]
unsafe fn encode_sse2(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  let mut col = *column;
  let mut out = 0usize;
  let mut i = 0usize;
  let n = src.len();

  let shift = _mm_set1_epi8(SHIFT as i8);
  let crit_nul = _mm_set1_epi8(NUL as i8);
  let crit_lf = _mm_set1_epi8(LF as i8);
  let crit_cr = _mm_set1_epi8(CR as i8);
  let crit_eq = _mm_set1_epi8(ESCAPE as i8);

  while n - i >= 16 {
    // The final byte carries the trailing-whitespace rule; leave it (and
    // anything after the last full window) to the scalar tail.
    if is_end && n - i == 16 {
      break;
    }
    // Line starts and wraps inside the window need column-aware handling.
    if col == 0 || col + 16 > line_size {
      let last = is_end && i + 1 == n;
      encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
      i += 1;
      continue;
    }

    let v = _mm_add_epi8(_mm_loadu_si128(src.as_ptr().add(i) as *const __m128i), shift);
    let mask = _mm_or_si128(
      _mm_or_si128(_mm_cmpeq_epi8(v, crit_nul), _mm_cmpeq_epi8(v, crit_lf)),
      _mm_or_si128(_mm_cmpeq_epi8(v, crit_cr), _mm_cmpeq_epi8(v, crit_eq)),
    );
    if _mm_movemask_epi8(mask) != 0 {
      let last = is_end && i + 1 == n;
      encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
      i += 1;
      continue;
    }

    _mm_storeu_si128(dst.as_mut_ptr().add(out) as *mut __m128i, v);
    out += 16;
    col += 16;
    i += 16;

    if col >= line_size {
      dst[out] = CR;
      dst[out + 1] = LF;
      out += 2;
      col = 0;
    }
  }

  while i < n {
    let last = is_end && i + 1 == n;
    encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
    i += 1;
  }

  *column = col;
  out
}

#[target_feature(enable = "avx2")]
unsafe fn encode_avx2(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  let mut col = *column;
  let mut out = 0usize;
  let mut i = 0usize;
  let n = src.len();

  let shift = _mm256_set1_epi8(SHIFT as i8);
  let crit_nul = _mm256_set1_epi8(NUL as i8);
  let crit_lf = _mm256_set1_epi8(LF as i8);
  let crit_cr = _mm256_set1_epi8(CR as i8);
  let crit_eq = _mm256_set1_epi8(ESCAPE as i8);

  while n - i >= 32 {
    if is_end && n - i == 32 {
      break;
    }
    if col == 0 || col + 32 > line_size {
      let last = is_end && i + 1 == n;
      encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
      i += 1;
      continue;
    }

    let v = _mm256_add_epi8(_mm256_loadu_si256(src.as_ptr().add(i) as *const __m256i), shift);
    let mask = _mm256_or_si256(
      _mm256_or_si256(_mm256_cmpeq_epi8(v, crit_nul), _mm256_cmpeq_epi8(v, crit_lf)),
      _mm256_or_si256(_mm256_cmpeq_epi8(v, crit_cr), _mm256_cmpeq_epi8(v, crit_eq)),
    );
    if _mm256_movemask_epi8(mask) != 0 {
      let last = is_end && i + 1 == n;
      encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
      i += 1;
      continue;
    }

    _mm256_storeu_si256(dst.as_mut_ptr().add(out) as *mut __m256i, v);
    out += 32;
    col += 32;
    i += 32;

    if col >= line_size {
      dst[out] = CR;
      dst[out + 1] = LF;
      out += 2;
      col = 0;
    }
  }

  while i < n {
    let last = is_end && i + 1 == n;
    encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
    i += 1;
  }

  *column = col;
  out
}

/// Safe wrapper for the SSE2 encode kernel.
pub(crate) fn encode_sse2_safe(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  // SAFETY: Dispatcher verifies SSE2 before selecting this kernel.
  unsafe { encode_sse2(line_size, column, src, dst, is_end) }
}

/// Safe wrapper for the AVX2 encode kernel.
pub(crate) fn encode_avx2_safe(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  // SAFETY: Dispatcher verifies AVX2 before selecting this kernel.
  unsafe { encode_avx2(line_size, column, src, dst, is_end) }
}

#[cfg(test)]
mod tests {
  use std::vec::Vec;

  use super::*;
  use crate::encode::portable::encode_scalar;
  use crate::max_encoded_len;

  fn generate(len: usize) -> Vec<u8> {
    (0..len)
      .map(|i| {
        let i = i as u64;
        ((i.wrapping_mul(2654435761) ^ (i >> 3)) & 0xFF) as u8
      })
      .collect()
  }

  fn cross_check(kernel: fn(usize, &mut usize, &[u8], &mut [u8], bool) -> usize) {
    for len in [0usize, 1, 15, 16, 17, 31, 32, 33, 100, 127, 128, 129, 1000, 4096] {
      let data = generate(len);
      for line_size in [2usize, 16, 128, 1000] {
        for is_end in [false, true] {
          for start_col in [0usize, 1, 7] {
            let cap = max_encoded_len(data.len(), line_size);
            let mut expected = std::vec![0u8; cap];
            let mut got = std::vec![0u8; cap];
            let mut col_a = start_col;
            let mut col_b = start_col;
            let na = encode_scalar(line_size, &mut col_a, &data, &mut expected, is_end);
            let nb = kernel(line_size, &mut col_b, &data, &mut got, is_end);
            assert_eq!(nb, na, "len={len} line={line_size} end={is_end} col={start_col}");
            assert_eq!(&got[..nb], &expected[..na], "len={len} line={line_size} end={is_end} col={start_col}");
            assert_eq!(col_b, col_a, "len={len} line={line_size} end={is_end} col={start_col}");
          }
        }
      }
    }
  }

  #[test]
  fn sse2_matches_scalar() {
    if !platform::caps().has(platform::caps::x86::SSE2) {
      return;
    }
    cross_check(encode_sse2_safe);
  }

  #[test]
  fn avx2_matches_scalar() {
    if !platform::caps().has(platform::caps::x86::AVX2_READY) {
      return;
    }
    cross_check(encode_avx2_safe);
  }
}
