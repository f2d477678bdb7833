//! Caching for one-time kernel selection.
//!
//! Every engine in this workspace resolves its kernel once and reuses the
//! result for the life of the process. [`KernelCache`] holds that
//! resolution:
//!
//! - With `std`, the first call stores the selection in a `OnceLock` and
//!   later calls are a plain load.
//! - Without `std`, capabilities come from compile-time target features, so
//!   selection is a handful of bitset compares over a short candidate list.
//!   The selector simply runs on every call and no state is kept - shared
//!   mutable storage would cost `unsafe` and save almost nothing.
//!
//! Selectors must therefore be deterministic: a call site always passes the
//! same function, and on no_std it runs more than once.

/// Cache for a one-time kernel selection result.
///
/// # Example
///
/// ```ignore
/// static KERNEL: KernelCache<Selected<Crc32Fn>> = KernelCache::new();
///
/// fn kernel() -> Selected<Crc32Fn> {
///   KERNEL.resolve(select_crc32)
/// }
/// ```
pub struct KernelCache<T: Copy> {
  #[cfg(feature = "std")]
  slot: std::sync::OnceLock<T>,
  #[cfg(not(feature = "std"))]
  _selected: core::marker::PhantomData<T>,
}

impl<T: Copy> KernelCache<T> {
  /// Create an empty cache.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      #[cfg(feature = "std")]
      slot: std::sync::OnceLock::new(),
      #[cfg(not(feature = "std"))]
      _selected: core::marker::PhantomData,
    }
  }

  /// Return the cached selection, running `select` to produce it if needed.
  ///
  /// With `std`, `select` runs at most once per process (concurrent first
  /// calls are serialized by the `OnceLock`). Without `std` it runs on
  /// every call, so it must be deterministic.
  #[inline]
  pub fn resolve(&self, select: fn() -> T) -> T {
    #[cfg(feature = "std")]
    {
      *self.slot.get_or_init(select)
    }

    #[cfg(not(feature = "std"))]
    {
      select()
    }
  }
}

impl<T: Copy> Default for KernelCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pick_seven() -> u32 {
    7
  }

  fn pick_nine() -> u32 {
    9
  }

  #[test]
  fn first_selection_is_kept() {
    static CACHE: KernelCache<u32> = KernelCache::new();
    assert_eq!(CACHE.resolve(pick_seven), 7);

    // With std the original resolution sticks even if a different selector
    // is (wrongly) passed later.
    #[cfg(feature = "std")]
    assert_eq!(CACHE.resolve(pick_nine), 7);
    #[cfg(not(feature = "std"))]
    assert_eq!(CACHE.resolve(pick_nine), 9);
  }

  #[test]
  fn holds_function_pointers() {
    fn kernel(x: u32) -> u32 {
      x + 1
    }
    fn select() -> fn(u32) -> u32 {
      kernel
    }

    static CACHE: KernelCache<fn(u32) -> u32> = KernelCache::new();
    assert_eq!((CACHE.resolve(select))(1), 2);
  }
}
