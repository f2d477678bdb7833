//! Kernel dispatch: selection over detected capabilities.
//!
//! This module provides the core dispatch primitives:
//!
//! - [`Candidate`]: a kernel with capability requirements and a tier
//! - [`Selected`]: the result of kernel selection
//! - [`select`]: choose the best kernel from a candidate list
//!
//! Candidate lists are ordered best to worst; the last entry must be a
//! portable fallback with no capability requirement, so selection always
//! succeeds.

use platform::{Bits256, CpuCaps};

use crate::tier::KernelTier;

// ─────────────────────────────────────────────────────────────────────────────
// Candidate List Macro
// ─────────────────────────────────────────────────────────────────────────────

/// Creates a static slice of [`Candidate`]s with concise syntax.
///
/// Each entry specifies a name, required capabilities, a tier, and the
/// kernel function.
///
/// # Syntax
///
/// ```text
/// candidates![
///     "name" => CAPS_EXPR => TIER_EXPR => kernel_fn,
///     ...
/// ]
/// ```
///
/// See the `checksum` and `yenc` crates for usage.
#[macro_export]
macro_rules! candidates {
  // Note: `$func as _` coerces function items to function pointers. Each fn
  // item has a unique zero-sized type, so the array literal would fail to
  // compile without the coercion.
  [ $( $name:literal => $caps:expr => $tier:expr => $func:expr ),+ $(,)? ] => {
    &[
      $(
        $crate::dispatch::Candidate::new($name, $caps, $tier, $func as _),
      )+
    ]
  };
}

// Re-export at crate root for ergonomic imports.
pub use candidates;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected
/// capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/pclmul").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Bits256,
  /// Acceleration tier, reported through kernel introspection.
  pub tier: KernelTier,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Bits256, tier: KernelTier, func: F) -> Self {
    Self {
      name,
      requires,
      tier,
      func,
    }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// Acceleration tier of the selected kernel.
  pub tier: KernelTier,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  /// Create a new selected result.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, tier: KernelTier, func: F) -> Self {
    Self { name, tier, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`.
///
/// # Panics
///
/// Panics if no candidate matches. The last candidate must always have
/// `requires = Bits256::NONE` as a fallback.
#[inline(always)]
#[must_use]
pub fn select<F: Copy>(caps: CpuCaps, candidates: &[Candidate<F>]) -> Selected<F> {
  for candidate in candidates {
    if caps.has(candidate.requires) {
      return Selected::new(candidate.name, candidate.tier, candidate.func);
    }
  }
  panic!("No matching kernel found! Candidate list must include a portable fallback.");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use platform::caps::x86;

  use super::*;

  fn fast(x: u32, _data: &[u8]) -> u32 {
    x + 2
  }

  fn slow(x: u32, _data: &[u8]) -> u32 {
    x + 1
  }

  type Kernel = fn(u32, &[u8]) -> u32;

  const LIST: &[Candidate<Kernel>] = candidates![
    "test/fast" => x86::PCLMUL_READY => KernelTier::Simd128 => fast,
    "test/slow" => Bits256::NONE => KernelTier::Portable => slow,
  ];

  #[test]
  fn selects_fallback_without_caps() {
    let selected = select(CpuCaps::NONE, LIST);
    assert_eq!(selected.name, "test/slow");
    assert_eq!(selected.tier, KernelTier::Portable);
    assert_eq!((selected.func)(0, b""), 1);
  }

  #[test]
  fn selects_best_with_caps() {
    let caps = CpuCaps::new(x86::PCLMUL_READY);
    let selected = select(caps, LIST);
    assert_eq!(selected.name, "test/fast");
    assert_eq!(selected.tier, KernelTier::Simd128);
    assert_eq!((selected.func)(0, b""), 2);
  }

  #[test]
  fn partial_caps_fall_through() {
    let caps = CpuCaps::new(x86::PCLMULQDQ);
    let selected = select(caps, LIST);
    assert_eq!(selected.name, "test/slow");
  }
}
