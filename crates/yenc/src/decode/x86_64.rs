//! x86_64 yEnc decode kernels (SSE2 / AVX2).
//!
//! A window containing none of `=`, `\r`, `\n` is pure shifted data: it is
//! un-shifted and stored in one shot. Escapes, line breaks, stuffed dots
//! and everything stateful bridge through the scalar step, so the output is
//! byte-identical to the portable kernel.
//!
//! # Safety
//!
//! Uses `unsafe` both for x86 SIMD intrinsics and for the raw-pointer
//! in-place contract: the write index never exceeds the read index, and a
//! window is loaded into registers before its output span is stored, so
//! `src == dst` is safe. The dispatcher verifies the required CPU features.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::DecoderState;
use super::portable::{Step, decode_step};
use crate::consts::{CR, DOT, ESCAPE, LF, SHIFT};

#[target_feature(enable = "sse2")]
unsafe fn decode_sse2(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  let mut out = 0usize;
  let mut i = 0usize;

  let shift = _mm_set1_epi8(SHIFT as i8);
  let crit_eq = _mm_set1_epi8(ESCAPE as i8);
  let crit_cr = _mm_set1_epi8(CR as i8);
  let crit_lf = _mm_set1_epi8(LF as i8);

  while len - i >= 16 {
    let clean_state = *state == DecoderState::None
      || (*state == DecoderState::CrLf && !(raw && *src.add(i) == DOT));
    if !clean_state {
      let b = *src.add(i);
      i += 1;
      if let Step::Emit(v) = decode_step(state, b, raw, false) {
        *dst.add(out) = v;
        out += 1;
      }
      continue;
    }

    let v = _mm_loadu_si128(src.add(i) as *const __m128i);
    let mask = _mm_or_si128(
      _mm_or_si128(_mm_cmpeq_epi8(v, crit_eq), _mm_cmpeq_epi8(v, crit_cr)),
      _mm_cmpeq_epi8(v, crit_lf),
    );
    if _mm_movemask_epi8(mask) != 0 {
      let b = *src.add(i);
      i += 1;
      if let Step::Emit(v) = decode_step(state, b, raw, false) {
        *dst.add(out) = v;
        out += 1;
      }
      continue;
    }

    _mm_storeu_si128(dst.add(out) as *mut __m128i, _mm_sub_epi8(v, shift));
    i += 16;
    out += 16;
    *state = DecoderState::None;
  }

  while i < len {
    let b = *src.add(i);
    i += 1;
    if let Step::Emit(v) = decode_step(state, b, raw, false) {
      *dst.add(out) = v;
      out += 1;
    }
  }

  out
}

#[target_feature(enable = "avx2")]
unsafe fn decode_avx2(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  let mut out = 0usize;
  let mut i = 0usize;

  let shift = _mm256_set1_epi8(SHIFT as i8);
  let crit_eq = _mm256_set1_epi8(ESCAPE as i8);
  let crit_cr = _mm256_set1_epi8(CR as i8);
  let crit_lf = _mm256_set1_epi8(LF as i8);

  while len - i >= 32 {
    let clean_state = *state == DecoderState::None
      || (*state == DecoderState::CrLf && !(raw && *src.add(i) == DOT));
    if !clean_state {
      let b = *src.add(i);
      i += 1;
      if let Step::Emit(v) = decode_step(state, b, raw, false) {
        *dst.add(out) = v;
        out += 1;
      }
      continue;
    }

    let v = _mm256_loadu_si256(src.add(i) as *const __m256i);
    let mask = _mm256_or_si256(
      _mm256_or_si256(_mm256_cmpeq_epi8(v, crit_eq), _mm256_cmpeq_epi8(v, crit_cr)),
      _mm256_cmpeq_epi8(v, crit_lf),
    );
    if _mm256_movemask_epi8(mask) != 0 {
      let b = *src.add(i);
      i += 1;
      if let Step::Emit(v) = decode_step(state, b, raw, false) {
        *dst.add(out) = v;
        out += 1;
      }
      continue;
    }

    _mm256_storeu_si256(dst.add(out) as *mut __m256i, _mm256_sub_epi8(v, shift));
    i += 32;
    out += 32;
    *state = DecoderState::None;
  }

  while i < len {
    let b = *src.add(i);
    i += 1;
    if let Step::Emit(v) = decode_step(state, b, raw, false) {
      *dst.add(out) = v;
      out += 1;
    }
  }

  out
}

/// SSE2 decode kernel entry.
///
/// # Safety
///
/// Same contract as [`super::portable::decode_scalar`]; additionally the
/// dispatcher must have verified SSE2.
pub(crate) unsafe fn decode_sse2_entry(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  decode_sse2(raw, src, dst, len, state)
}

/// AVX2 decode kernel entry.
///
/// # Safety
///
/// Same contract as [`super::portable::decode_scalar`]; additionally the
/// dispatcher must have verified AVX2.
pub(crate) unsafe fn decode_avx2_entry(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  decode_avx2(raw, src, dst, len, state)
}
