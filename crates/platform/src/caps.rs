//! CPU capability representation.
//!
//! This module provides a unified capability model for all supported
//! architectures. It answers the question: "What instructions can I legally
//! run on this machine?"
//!
//! # Design
//!
//! [`CpuCaps`] is a compact bitset representing available CPU features. Each
//! bit corresponds to a specific ISA extension. The bits are
//! architecture-specific but the API is uniform, so dispatch code reads the
//! same on every target.

/// 256-bit feature bitset.
///
/// This provides enough room for all ISA features we care about across all
/// architectures. Each architecture uses a different region of the bitset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bits256(pub [u64; 4]);

impl Bits256 {
  /// Empty bitset (no features).
  pub const NONE: Self = Self([0; 4]);

  /// Check if all bits in `other` are set in `self`.
  #[inline]
  #[must_use]
  pub const fn contains(self, other: Self) -> bool {
    (self.0[0] & other.0[0]) == other.0[0]
      && (self.0[1] & other.0[1]) == other.0[1]
      && (self.0[2] & other.0[2]) == other.0[2]
      && (self.0[3] & other.0[3]) == other.0[3]
  }

  /// Union of two bitsets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([
      self.0[0] | other.0[0],
      self.0[1] | other.0[1],
      self.0[2] | other.0[2],
      self.0[3] | other.0[3],
    ])
  }

  /// Create a bitset with a single bit set.
  #[inline]
  #[must_use]
  pub const fn from_bit(bit: u16) -> Self {
    let word = (bit / 64) as usize;
    let bit_in_word = bit % 64;
    let mut bits = [0u64; 4];
    bits[word] = 1u64 << bit_in_word;
    Self(bits)
  }

  /// Check if the bitset is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
  }
}

impl core::ops::BitOr for Bits256 {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for Bits256 {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
      Self::Other
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// CPU Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: what instructions can run on this machine.
///
/// This is the core type for capability-based dispatch. It combines
/// architecture identification with the feature bitset.
///
/// # Thread Safety
///
/// `CpuCaps` is `Copy`, `Send`, and `Sync`. It can be freely shared across
/// threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuCaps {
  /// Target architecture.
  pub arch: Arch,
  /// Feature bits.
  pub bits: Bits256,
}

impl CpuCaps {
  /// No capabilities (portable baseline).
  pub const NONE: Self = Self {
    arch: Arch::Other,
    bits: Bits256::NONE,
  };

  /// Create capabilities for the current architecture with given bits.
  #[inline]
  #[must_use]
  pub const fn new(bits: Bits256) -> Self {
    Self {
      arch: Arch::current(),
      bits,
    }
  }

  /// Check if `self` has all the capabilities required by `required`.
  #[inline]
  #[must_use]
  pub const fn has(self, required: Bits256) -> bool {
    self.bits.contains(required)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature bit definitions
// ─────────────────────────────────────────────────────────────────────────────
//
// Layout:
// - Bits 0-63:   x86_64 features
// - Bits 64-127: aarch64 features

/// x86_64 feature bits (bits 0-63).
pub mod x86 {
  use super::Bits256;

  pub const SSE2: Bits256 = Bits256::from_bit(0);
  pub const SSSE3: Bits256 = Bits256::from_bit(1);
  pub const SSE41: Bits256 = Bits256::from_bit(2);
  pub const SSE42: Bits256 = Bits256::from_bit(3);
  pub const AVX2: Bits256 = Bits256::from_bit(4);
  pub const PCLMULQDQ: Bits256 = Bits256::from_bit(5);
  pub const VPCLMULQDQ: Bits256 = Bits256::from_bit(6);
  pub const AVX512F: Bits256 = Bits256::from_bit(7);
  pub const AVX512VL: Bits256 = Bits256::from_bit(8);
  pub const AVX512BW: Bits256 = Bits256::from_bit(9);

  /// Everything the PCLMULQDQ folding kernels need.
  pub const PCLMUL_READY: Bits256 = PCLMULQDQ.union(SSE41);

  /// Everything the 256-bit encode/decode kernels need.
  pub const AVX2_READY: Bits256 = AVX2;
}

/// aarch64 feature bits (bits 64-127).
pub mod aarch64 {
  use super::Bits256;

  pub const NEON: Bits256 = Bits256::from_bit(64);
  pub const CRC: Bits256 = Bits256::from_bit(65);
  pub const PMULL: Bits256 = Bits256::from_bit(66);

  /// Everything the ARMv8 CRC-extension kernel needs.
  pub const CRC_READY: Bits256 = CRC;

  /// Everything the NEON encode/decode kernels need.
  pub const NEON_READY: Bits256 = NEON;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bitset_contains() {
    let a = x86::SSE2 | x86::PCLMULQDQ;
    assert!(a.contains(x86::SSE2));
    assert!(a.contains(Bits256::NONE));
    assert!(!a.contains(x86::AVX2));
    assert!(!Bits256::NONE.contains(x86::SSE2));
  }

  #[test]
  fn bitset_cross_word() {
    let a = x86::SSE2 | aarch64::NEON;
    assert!(a.contains(aarch64::NEON));
    assert!(!x86::SSE2.contains(aarch64::NEON));
  }

  #[test]
  fn composite_bits() {
    assert!(x86::PCLMUL_READY.contains(x86::PCLMULQDQ));
    assert!(x86::PCLMUL_READY.contains(x86::SSE41));
  }

  #[test]
  fn caps_none_has_nothing() {
    assert!(!CpuCaps::NONE.has(x86::SSE2));
    assert!(CpuCaps::NONE.has(Bits256::NONE));
  }
}
