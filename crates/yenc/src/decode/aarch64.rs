//! aarch64 yEnc decode kernel (NEON).
//!
//! Same structure as the x86_64 kernels: a window free of `=`, `\r`, `\n`
//! is un-shifted and stored in one shot; everything stateful bridges
//! through the scalar step.
//!
//! # Safety
//!
//! Uses `unsafe` for NEON intrinsics and the raw-pointer in-place contract
//! (the write index never exceeds the read index).
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::*;

use super::DecoderState;
use super::portable::{Step, decode_step};
use crate::consts::{CR, DOT, ESCAPE, LF, SHIFT};

#[target_feature(enable = "neon")]
unsafe fn decode_neon(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  let mut out = 0usize;
  let mut i = 0usize;

  let shift = vdupq_n_u8(SHIFT);
  let crit_eq = vdupq_n_u8(ESCAPE);
  let crit_cr = vdupq_n_u8(CR);
  let crit_lf = vdupq_n_u8(LF);

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

    let v = vld1q_u8(src.add(i));
    let mask = vorrq_u8(vorrq_u8(vceqq_u8(v, crit_eq), vceqq_u8(v, crit_cr)), vceqq_u8(v, crit_lf));
    if vmaxvq_u8(mask) != 0 {
      let b = *src.add(i);
      i += 1;
      if let Step::Emit(v) = decode_step(state, b, raw, false) {
        *dst.add(out) = v;
        out += 1;
      }
      continue;
    }

    vst1q_u8(dst.add(out), vsubq_u8(v, shift));
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

/// NEON decode kernel entry.
///
/// # Safety
///
/// Same contract as [`super::portable::decode_scalar`]; additionally the
/// dispatcher must have verified NEON.
pub(crate) unsafe fn decode_neon_entry(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  decode_neon(raw, src, dst, len, state)
}

#[cfg(test)]
mod tests {
  use std::vec::Vec;

  use super::*;
  use crate::decode::portable::decode_scalar;

  #[test]
  fn neon_matches_scalar() {
    if !platform::caps().has(platform::caps::aarch64::NEON_READY) {
      return;
    }

    let mut data = Vec::new();
    let mut k = 7u64;
    while data.len() < 4096 {
      k = k.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
      match k % 19 {
        0 => data.extend_from_slice(b"\r\n"),
        1 => data.extend_from_slice(b"\r\n.."),
        2 => data.extend_from_slice(&[b'=', (k >> 8) as u8]),
        _ => data.push((k >> 16) as u8),
      }
    }

    for raw in [false, true] {
      let mut expected = std::vec![0u8; data.len()];
      let mut got = std::vec![0u8; data.len()];
      let mut state_a = DecoderState::CrLf;
      let mut state_b = DecoderState::CrLf;
      // SAFETY: disjoint buffers sized to the input.
      let na = unsafe { decode_scalar(raw, data.as_ptr(), expected.as_mut_ptr(), data.len(), &mut state_a) };
      let nb = unsafe { decode_neon_entry(raw, data.as_ptr(), got.as_mut_ptr(), data.len(), &mut state_b) };
      assert_eq!(nb, na, "raw={raw}");
      assert_eq!(&got[..nb], &expected[..na], "raw={raw}");
      assert_eq!(state_b, state_a, "raw={raw}");
    }
  }
}
