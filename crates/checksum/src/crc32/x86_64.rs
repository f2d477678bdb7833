//! x86_64 carryless-multiply folding kernel (PCLMULQDQ).
//!
//! Folds four 128-bit lanes over 64-byte blocks, reduces to one lane, then
//! to 64 and 32 bits, and finishes with a Barrett reduction. The folding
//! constants are the published `x^n mod P` values for the reflected IEEE
//! polynomial.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure PCLMULQDQ and
//! SSE4.1 are available before executing the accelerated path (the
//! dispatcher does this).
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::portable;

// x^(4*128+64) mod P and x^(4*128) mod P: fold 64 bytes at a distance.
const K1: i64 = 0x0154_442b_d4;
const K2: i64 = 0x01c6_e415_96;
// x^(128+64) mod P and x^128 mod P: fold 16 bytes at a distance.
const K3: i64 = 0x0175_1997_d0;
const K4: i64 = 0x00cc_aa00_9e;
// x^64 mod P: the 96 -> 64 bit reduction step.
const K5: i64 = 0x0163_cd61_24;
// Barrett reduction constants: P(x) and floor(x^64 / P(x)).
const P_X: i64 = 0x01db_7106_41;
const U_PRIME: i64 = 0x01f7_0116_41;

/// Minimum input length for the folding path. Shorter buffers go through the
/// portable kernel (the setup cost dominates below this).
const FOLD_MIN: usize = 128;

#[inline]
#[target_feature(enable = "pclmulqdq,sse4.1")]
unsafe fn fold16(a: __m128i, b: __m128i, keys: __m128i) -> __m128i {
  let lo = _mm_clmulepi64_si128::<0x00>(a, keys);
  let hi = _mm_clmulepi64_si128::<0x11>(a, keys);
  _mm_xor_si128(_mm_xor_si128(lo, hi), b)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load16(data: &[u8], offset: usize) -> __m128i {
  _mm_loadu_si128(data.as_ptr().add(offset) as *const __m128i)
}

/// CRC-32 update via PCLMULQDQ folding.
///
/// `crc` is the raw register state (pre-inverted).
#[target_feature(enable = "pclmulqdq,sse4.1")]
unsafe fn crc32_pclmul(crc: u32, data: &[u8]) -> u32 {
  if data.len() < FOLD_MIN {
    return portable::crc32_slice8(crc, data);
  }

  let mut offset = 64usize;

  // x3 holds the lowest-address lane; the incoming CRC folds into it.
  let mut x3 = load16(data, 0);
  let mut x2 = load16(data, 16);
  let mut x1 = load16(data, 32);
  let mut x0 = load16(data, 48);
  x3 = _mm_xor_si128(x3, _mm_cvtsi32_si128(crc as i32));

  let k1k2 = _mm_set_epi64x(K2, K1);
  while data.len() - offset >= 64 {
    x3 = fold16(x3, load16(data, offset), k1k2);
    x2 = fold16(x2, load16(data, offset + 16), k1k2);
    x1 = fold16(x1, load16(data, offset + 32), k1k2);
    x0 = fold16(x0, load16(data, offset + 48), k1k2);
    offset += 64;
  }

  // Reduce the four lanes to one.
  let k3k4 = _mm_set_epi64x(K4, K3);
  let mut x = fold16(x3, x2, k3k4);
  x = fold16(x, x1, k3k4);
  x = fold16(x, x0, k3k4);

  while data.len() - offset >= 16 {
    x = fold16(x, load16(data, offset), k3k4);
    offset += 16;
  }

  // Reduce 128 bits to 64.
  x = _mm_xor_si128(_mm_clmulepi64_si128::<0x10>(x, k3k4), _mm_srli_si128::<8>(x));

  // Reduce 64 bits to 32.
  let low32 = _mm_set_epi32(0, 0, 0, !0);
  x = _mm_xor_si128(
    _mm_clmulepi64_si128::<0x00>(_mm_and_si128(x, low32), _mm_set_epi64x(0, K5)),
    _mm_srli_si128::<4>(x),
  );

  // Barrett reduction to the final 32-bit remainder.
  let pu = _mm_set_epi64x(U_PRIME, P_X);
  let t1 = _mm_clmulepi64_si128::<0x10>(_mm_and_si128(x, low32), pu);
  let t2 = _mm_clmulepi64_si128::<0x00>(_mm_and_si128(t1, low32), pu);
  let folded = _mm_extract_epi32::<1>(_mm_xor_si128(x, t2)) as u32;

  // The sub-16-byte tail goes through the table kernel.
  portable::crc32_slice8(folded, &data[offset..])
}

/// Safe wrapper for the PCLMULQDQ folding kernel.
#[inline]
#[must_use]
pub fn crc32_pclmul_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: Dispatcher verifies PCLMULQDQ + SSE4.1 before selecting this kernel.
  unsafe { crc32_pclmul(crc, data) }
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;

  fn pclmul_available() -> bool {
    platform::caps().has(platform::caps::x86::PCLMUL_READY)
  }

  fn generate(len: usize) -> Vec<u8> {
    (0..len)
      .map(|i| {
        let i = i as u64;
        ((i.wrapping_mul(2654435761) ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15)) & 0xFF) as u8
      })
      .collect()
  }

  #[test]
  fn matches_portable_across_lengths() {
    if !pclmul_available() {
      return;
    }
    for len in [0, 1, 15, 16, 63, 64, 127, 128, 129, 191, 192, 255, 256, 1024, 4096, 65536] {
      let data = generate(len);
      assert_eq!(
        crc32_pclmul_safe(!0, &data),
        portable::crc32_slice8(!0, &data),
        "len={len}"
      );
    }
  }

  #[test]
  fn matches_portable_unaligned() {
    if !pclmul_available() {
      return;
    }
    let data = generate(4096 + 16);
    for off in 0..16 {
      let slice = &data[off..off + 4096];
      assert_eq!(
        crc32_pclmul_safe(0x1234_5678, slice),
        portable::crc32_slice8(0x1234_5678, slice),
        "off={off}"
      );
    }
  }

  #[test]
  fn streaming_matches_oneshot() {
    if !pclmul_available() {
      return;
    }
    let data = generate(8192);
    let oneshot = crc32_pclmul_safe(!0, &data);
    let mut crc = !0;
    for part in data.chunks(1000) {
      crc = crc32_pclmul_safe(crc, part);
    }
    assert_eq!(crc, oneshot);
  }
}
