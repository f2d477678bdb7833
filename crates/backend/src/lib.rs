//! Backend crate: dispatch primitives for the ycodec engines.
//!
//! This crate provides the foundation for the ycodec acceleration subsystem:
//!
//! - **Dispatch**: cached runtime kernel selection over CPU capabilities
//! - **Tiers**: the [`KernelTier`] diagnostic classification of kernels
//! - **Caching**: [`KernelCache`] for one-time selection results
//!
//! # Architecture
//!
//! Engine crates register kernels as an ordered list of `Candidate`s, best
//! first, with a portable fallback last. The dispatcher detects CPU features
//! once and caches the selected kernel; subsequent calls are a single
//! indirect call.
//!
//! # Usage
//!
//! ```ignore
//! use backend::dispatch::{Selected, select};
//! use backend::{KernelTier, candidates};
//! use platform::caps::x86;
//!
//! fn select_crc32() -> Selected<fn(u32, &[u8]) -> u32> {
//!     select(platform::caps(), candidates![
//!         "x86_64/pclmul"  => x86::PCLMUL_READY => KernelTier::Simd128 => pclmul_kernel,
//!         "portable/slice8" => platform::Bits256::NONE => KernelTier::Portable => portable_kernel,
//!     ])
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod dispatch;
pub mod tier;

pub use cache::KernelCache;
// Re-export platform for convenience.
pub use platform;
pub use tier::KernelTier;
