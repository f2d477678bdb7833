extern crate std;

use proptest::prelude::*;
use traits::Checksum;

use super::*;
use crate::common::{reference::crc32_bitwise, tables::CRC32_POLY};

proptest! {
  #[test]
  fn crc32_matches_portable(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    let ours = crc32(&data, 0);
    let portable = portable::crc32_slice8(!0, &data) ^ !0;
    prop_assert_eq!(ours, portable);
  }

  #[test]
  fn crc32_matches_reference(data in proptest::collection::vec(any::<u8>(), 0..=512)) {
    let ours = crc32(&data, 0);
    let reference = crc32_bitwise(CRC32_POLY, !0, &data) ^ !0;
    prop_assert_eq!(ours, reference);
  }

  // ─────────────────────────────────────────────────────────────────────────
  // Cross-validation against crc32fast
  // ─────────────────────────────────────────────────────────────────────────

  #[test]
  fn crc32_matches_crc32fast(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    let ours = crc32(&data, 0);
    let mut reference = crc32fast::Hasher::new();
    reference.update(&data);
    prop_assert_eq!(ours, reference.finalize());
  }

  #[test]
  fn streaming_matches_oneshot(data in proptest::collection::vec(any::<u8>(), 0..=4096), chunk in 1usize..=257) {
    let mut hasher = Crc32::new();
    for part in data.chunks(chunk) {
      hasher.update(part);
    }
    prop_assert_eq!(hasher.finalize(), crc32(&data, 0));
  }

  #[test]
  fn combine_matches_concatenation(data in proptest::collection::vec(any::<u8>(), 0..=2048), split in any::<usize>()) {
    let split = split % (data.len() + 1);
    let (a, b) = data.split_at(split);
    let combined = crc32_combine(crc32(a, 0), crc32(b, 0), b.len() as u64);
    prop_assert_eq!(combined, crc32(&data, 0));
  }

  #[test]
  fn zeros_matches_explicit_zero_run(prefix in proptest::collection::vec(any::<u8>(), 0..=256), n in 0usize..=2048) {
    let c = crc32(&prefix, 0);
    let zeroes = std::vec![0u8; n];
    prop_assert_eq!(crc32_zeros(c, n as u64), crc32(&zeroes, c));
  }

  #[test]
  fn unzero_inverts_zeros(c in any::<u32>(), n in any::<u64>()) {
    prop_assert_eq!(crc32_unzero(crc32_zeros(c, n), n), c);
  }

  #[test]
  fn pow256_matches_pow2(n in 0u64..=(i64::MAX as u64 / 8)) {
    prop_assert_eq!(crc32_256pow(n), crc32_2pow(8 * n as i64));
  }

  #[test]
  fn pow2_inverse_law(n in 1i64..=i64::MAX) {
    prop_assert_eq!(crc32_multiply(crc32_2pow(-n), crc32_2pow(n)), crc32_2pow(0));
  }
}
