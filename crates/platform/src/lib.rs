//! CPU detection and capabilities for ycodec.
//!
//! This crate is the **single source of truth** for CPU feature detection
//! across the ycodec workspace. Engine crates query [`caps()`] once and
//! select a kernel; they never do ad-hoc detection.
//!
//! # Core Types
//!
//! - [`CpuCaps`]: what instructions can run on this machine
//! - [`Bits256`]: the underlying feature bitset
//!
//! # Main Entry Point
//!
//! ```ignore
//! let caps = platform::caps();
//!
//! if caps.has(platform::caps::x86::PCLMUL_READY) {
//!     // Use the PCLMULQDQ folding kernel
//! }
//! ```
//!
//! # Design
//!
//! 1. **One API**: engines query [`caps()`] instead of doing ad-hoc detection.
//! 2. **Zero-cost when possible**: compile-time features are detected via `cfg!`.
//! 3. **Cached otherwise**: runtime detection is cached in a `OnceLock` (std).
//! 4. **Overridable**: [`init_with_caps`] / [`set_caps_override`] bypass
//!    detection for tests and known-CPU deployments; call them before the
//!    first [`caps()`].
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, Bits256, CpuCaps};

/// Get detected CPU capabilities.
///
/// This is the main entry point for capability-based dispatch.
///
/// # Caching
///
/// - With `std`: results are cached in a `OnceLock` (one-time detection).
/// - Without `std`: compile-time detection only (`cfg!(target_feature)`),
///   which is free at runtime.
#[inline]
#[must_use]
pub fn caps() -> CpuCaps {
  detect::caps()
}

/// Initialize with user-supplied capabilities, bypassing detection.
///
/// Useful when the deployment CPU is known ahead of time, or in tests that
/// pin a specific kernel tier:
///
/// ```ignore
/// platform::init_with_caps(CpuCaps::new(platform::caps::x86::PCLMUL_READY));
/// ```
///
/// Equivalent to [`set_caps_override`]`(Some(caps))`. Call it before any
/// engine use: dispatchers keep the kernel they first selected.
#[cfg(feature = "std")]
#[inline]
pub fn init_with_caps(caps: CpuCaps) {
  detect::set_caps_override(Some(caps));
}

/// Set or clear the capabilities override.
///
/// When set, [`caps()`] returns the override value instead of detecting.
/// Pass `None` to clear the override and resume detection.
///
/// The override only affects [`caps()`] calls made after it; dispatchers
/// that already cached a kernel selection keep it. Call this early in
/// program initialization, before any engine use.
#[cfg(feature = "std")]
#[inline]
pub fn set_caps_override(value: Option<CpuCaps>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[cfg(feature = "std")]
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
