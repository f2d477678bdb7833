//! Kernel acceleration tiers.
//!
//! Tiers classify kernels by the hardware they require, from the always
//! available scalar fallback to wide SIMD. The numeric value doubles as the
//! diagnostic kernel identifier reported by the engines, with 0 meaning
//! "generic scalar".
//!
//! | Tier | Name | Description |
//! |------|------|-------------|
//! | 0 | Portable | Scalar table/state-machine kernels - always available |
//! | 1 | HwAccel | Native instructions for the operation (e.g. ARMv8 CRC) |
//! | 2 | Simd128 | 128-bit SIMD (SSE2/PCLMULQDQ, NEON) |
//! | 3 | Simd256 | 256-bit SIMD (AVX2) |
//! | 4 | Simd512 | 512-bit SIMD (AVX-512) |

/// Kernel acceleration tier.
///
/// Tiers are ordered from lowest (always available) to highest (widest
/// vectors, most stringent requirements).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum KernelTier {
  /// Tier 0: portable scalar implementation. Always available.
  #[default]
  Portable = 0,

  /// Tier 1: hardware-native instructions for the operation.
  ///
  /// - aarch64: CRC extension (`crc32x` family)
  HwAccel = 1,

  /// Tier 2: 128-bit SIMD.
  ///
  /// - x86_64: SSE2 / PCLMULQDQ
  /// - aarch64: NEON
  Simd128 = 2,

  /// Tier 3: 256-bit SIMD (x86_64 AVX2).
  Simd256 = 3,

  /// Tier 4: 512-bit SIMD (x86_64 AVX-512).
  Simd512 = 4,
}

impl KernelTier {
  /// Convert to the numeric diagnostic identifier.
  #[inline]
  #[must_use]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  /// Human-readable tier name.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      Self::HwAccel => "hwaccel",
      Self::Simd128 => "simd128",
      Self::Simd256 => "simd256",
      Self::Simd512 => "simd512",
    }
  }

  /// Check if this tier requires runtime capability detection.
  #[inline]
  #[must_use]
  pub const fn requires_runtime_detection(self) -> bool {
    !matches!(self, Self::Portable)
  }
}
