//! Runtime CPU detection.
//!
//! This module provides the `caps()` implementation behind the crate root:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (via `is_x86_feature_detected!` / `is_aarch64_feature_detected!`)
//! - Caching (via `OnceLock` with `std`)
//! - User-supplied overrides for bare metal and testing
//!
//! The standard-library detection macros already gate AVX features on OS
//! register-state support (OSXSAVE/XCR0), so a detected feature is always
//! safe to execute.

use crate::caps::{Bits256, CpuCaps};

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
static OVERRIDE: std::sync::RwLock<Option<CpuCaps>> = std::sync::RwLock::new(None);

#[cfg(feature = "std")]
pub fn set_caps_override(value: Option<CpuCaps>) {
  if let Ok(mut guard) = OVERRIDE.write() {
    *guard = value;
  }
}

#[cfg(feature = "std")]
#[must_use]
pub fn has_override() -> bool {
  matches!(OVERRIDE.read().map(|g| g.is_some()), Ok(true))
}

#[cfg(feature = "std")]
fn read_override() -> Option<CpuCaps> {
  OVERRIDE.read().ok().and_then(|g| *g)
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry point
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[must_use]
pub fn caps() -> CpuCaps {
  #[cfg(feature = "std")]
  {
    if let Some(forced) = read_override() {
      return forced;
    }
    static CACHE: std::sync::OnceLock<CpuCaps> = std::sync::OnceLock::new();
    *CACHE.get_or_init(detect)
  }

  #[cfg(not(feature = "std"))]
  {
    CpuCaps::new(caps_static())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-time detection
// ─────────────────────────────────────────────────────────────────────────────

/// Features known at compile time (`-C target-feature=...` / `-C target-cpu=...`).
#[must_use]
fn caps_static() -> Bits256 {
  #[allow(unused_mut)]
  let mut bits = Bits256::NONE;

  #[cfg(target_arch = "x86_64")]
  {
    use crate::caps::x86;

    // SSE2 is part of the x86_64 baseline.
    bits |= x86::SSE2;
    if cfg!(target_feature = "ssse3") {
      bits |= x86::SSSE3;
    }
    if cfg!(target_feature = "sse4.1") {
      bits |= x86::SSE41;
    }
    if cfg!(target_feature = "sse4.2") {
      bits |= x86::SSE42;
    }
    if cfg!(target_feature = "avx2") {
      bits |= x86::AVX2;
    }
    if cfg!(target_feature = "pclmulqdq") {
      bits |= x86::PCLMULQDQ;
    }
    if cfg!(target_feature = "vpclmulqdq") {
      bits |= x86::VPCLMULQDQ;
    }
    if cfg!(target_feature = "avx512f") {
      bits |= x86::AVX512F;
    }
    if cfg!(target_feature = "avx512vl") {
      bits |= x86::AVX512VL;
    }
    if cfg!(target_feature = "avx512bw") {
      bits |= x86::AVX512BW;
    }
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64;

    // NEON is part of the aarch64 baseline.
    bits |= aarch64::NEON;
    if cfg!(target_feature = "crc") {
      bits |= aarch64::CRC;
    }
    if cfg!(target_feature = "aes") {
      bits |= aarch64::PMULL;
    }
  }

  bits
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
#[must_use]
fn detect() -> CpuCaps {
  let mut bits = caps_static();

  #[cfg(target_arch = "x86_64")]
  {
    use crate::caps::x86;

    if std::arch::is_x86_feature_detected!("ssse3") {
      bits |= x86::SSSE3;
    }
    if std::arch::is_x86_feature_detected!("sse4.1") {
      bits |= x86::SSE41;
    }
    if std::arch::is_x86_feature_detected!("sse4.2") {
      bits |= x86::SSE42;
    }
    if std::arch::is_x86_feature_detected!("avx2") {
      bits |= x86::AVX2;
    }
    if std::arch::is_x86_feature_detected!("pclmulqdq") {
      bits |= x86::PCLMULQDQ;
    }
    if std::arch::is_x86_feature_detected!("vpclmulqdq") {
      bits |= x86::VPCLMULQDQ;
    }
    if std::arch::is_x86_feature_detected!("avx512f") {
      bits |= x86::AVX512F;
    }
    if std::arch::is_x86_feature_detected!("avx512vl") {
      bits |= x86::AVX512VL;
    }
    if std::arch::is_x86_feature_detected!("avx512bw") {
      bits |= x86::AVX512BW;
    }
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64;

    if std::arch::is_aarch64_feature_detected!("neon") {
      bits |= aarch64::NEON;
    }
    if std::arch::is_aarch64_feature_detected!("crc") {
      bits |= aarch64::CRC;
    }
    if std::arch::is_aarch64_feature_detected!("pmull") {
      bits |= aarch64::PMULL;
    }
  }

  CpuCaps::new(bits)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::caps::Arch;

  // Baseline checks and the override round-trip live in one test so the
  // global override cannot race the baseline assertions on parallel runs.
  #[test]
  fn detection_and_override() {
    let detected = caps();
    assert_eq!(detected.arch, Arch::current());

    #[cfg(target_arch = "x86_64")]
    assert!(detected.has(crate::caps::x86::SSE2));

    #[cfg(target_arch = "aarch64")]
    assert!(detected.has(crate::caps::aarch64::NEON));

    crate::init_with_caps(CpuCaps::NONE);
    assert!(has_override());
    assert_eq!(caps(), CpuCaps::NONE);

    set_caps_override(None);
    assert!(!has_override());
    assert_eq!(caps(), detected);
  }
}
