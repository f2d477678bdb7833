//! aarch64 yEnc encode kernel (NEON).
//!
//! Same structure as the x86_64 kernels: classify a 16-byte window of
//! shifted bytes, bulk-store clean windows, bridge everything else through
//! the scalar step.
//!
//! # Safety
//!
//! Uses `unsafe` for NEON intrinsics. NEON is part of the aarch64 baseline;
//! the dispatcher still gates on it for uniformity.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
// SAFETY: Destination indexing is covered by the documented capacity
// precondition.
#![allow(clippy::indexing_slicing)]

use core::arch::aarch64::*;

use super::portable::encode_byte;
use crate::consts::{CR, ESCAPE, LF, NUL, SHIFT};

#[target_feature(enable = "neon")]
unsafe fn encode_neon(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  let mut col = *column;
  let mut out = 0usize;
  let mut i = 0usize;
  let n = src.len();

  let shift = vdupq_n_u8(SHIFT);
  let crit_nul = vdupq_n_u8(NUL);
  let crit_lf = vdupq_n_u8(LF);
  let crit_cr = vdupq_n_u8(CR);
  let crit_eq = vdupq_n_u8(ESCAPE);

  while n - i >= 16 {
    if is_end && n - i == 16 {
      break;
    }
    if col == 0 || col + 16 > line_size {
      let last = is_end && i + 1 == n;
      encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
      i += 1;
      continue;
    }

    let v = vaddq_u8(vld1q_u8(src.as_ptr().add(i)), shift);
    let mask = vorrq_u8(
      vorrq_u8(vceqq_u8(v, crit_nul), vceqq_u8(v, crit_lf)),
      vorrq_u8(vceqq_u8(v, crit_cr), vceqq_u8(v, crit_eq)),
    );
    if vmaxvq_u8(mask) != 0 {
      let last = is_end && i + 1 == n;
      encode_byte(line_size, &mut col, &mut out, dst, src[i], last);
      i += 1;
      continue;
    }

    vst1q_u8(dst.as_mut_ptr().add(out), v);
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

/// Safe wrapper for the NEON encode kernel.
pub(crate) fn encode_neon_safe(line_size: usize, column: &mut usize, src: &[u8], dst: &mut [u8], is_end: bool) -> usize {
  // SAFETY: Dispatcher verifies NEON before selecting this kernel.
  unsafe { encode_neon(line_size, column, src, dst, is_end) }
}
