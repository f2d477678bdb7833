extern crate std;

use std::vec::Vec;

use proptest::prelude::*;

use crate::{Decoder, DecoderState, Encoder, decode, decode_to_vec, encode_to_vec, max_encoded_len};

/// The line sizes the format cares about, from pathological to long.
const LINE_SIZES: &[usize] = &[2, 3, 16, 128, 256, 1000];

fn line_size_strategy() -> impl Strategy<Value = usize> {
  proptest::sample::select(LINE_SIZES)
}

proptest! {
  #[test]
  fn encode_decode_round_trip(
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    line_size in line_size_strategy(),
  ) {
    let encoded = encode_to_vec(&data, line_size);
    prop_assert!(encoded.len() <= max_encoded_len(data.len(), line_size));
    prop_assert_eq!(decode_to_vec(false, &encoded), data);
  }

  #[test]
  fn round_trip_survives_raw_transport(
    data in proptest::collection::vec(any::<u8>(), 0..=2048),
    line_size in line_size_strategy(),
  ) {
    // The encoder dot-stuffs at line starts, so a raw-mode decode of its
    // output is identical to a non-raw decode.
    let encoded = encode_to_vec(&data, line_size);
    prop_assert_eq!(decode_to_vec(true, &encoded), data);
  }

  #[test]
  fn chunked_encode_equivalence(
    data in proptest::collection::vec(any::<u8>(), 0..=2048),
    line_size in line_size_strategy(),
    chunk_len in 1usize..=257,
  ) {
    let whole = encode_to_vec(&data, line_size);

    let mut enc = Encoder::new(line_size);
    let mut got = Vec::new();
    let mut buf = std::vec![0u8; max_encoded_len(chunk_len, line_size)];
    let chunks: Vec<&[u8]> = if data.is_empty() { std::vec![&data[..]] } else { data.chunks(chunk_len).collect() };
    for (idx, chunk) in chunks.iter().enumerate() {
      let n = if idx + 1 == chunks.len() {
        enc.encode_last_chunk(chunk, &mut buf)
      } else {
        enc.encode_chunk(chunk, &mut buf)
      };
      got.extend_from_slice(&buf[..n]);
    }

    prop_assert_eq!(got, whole);
  }

  #[test]
  fn chunked_decode_equivalence(
    data in proptest::collection::vec(any::<u8>(), 0..=2048),
    line_size in line_size_strategy(),
    chunk_len in 1usize..=257,
  ) {
    let wire = encode_to_vec(&data, line_size);
    let whole = decode_to_vec(true, &wire);

    let mut dec = Decoder::new(true);
    let mut got = Vec::new();
    let mut buf = std::vec![0u8; chunk_len];
    for chunk in wire.chunks(chunk_len) {
      let n = dec.decode_chunk(chunk, &mut buf[..chunk.len()]);
      got.extend_from_slice(&buf[..n]);
    }

    prop_assert_eq!(got, whole);
  }

  #[test]
  fn in_place_decode_equivalence(
    wire in proptest::collection::vec(any::<u8>(), 0..=2048),
    raw in any::<bool>(),
  ) {
    // Arbitrary (often malformed) wire bytes: in-place and fresh-buffer
    // decodes must agree byte for byte, and never panic.
    let mut fresh = std::vec![0u8; wire.len()];
    let mut state_a = DecoderState::CrLf;
    let n_a = decode(raw, &wire, &mut fresh, &mut state_a);

    let mut buf = wire.clone();
    let mut state_b = DecoderState::CrLf;
    let n_b = crate::decode_in_place(raw, &mut buf, &mut state_b);

    prop_assert_eq!(n_b, n_a);
    prop_assert_eq!(&buf[..n_b], &fresh[..n_a]);
    prop_assert_eq!(state_b, state_a);
  }

  #[test]
  fn encoded_lines_never_exceed_line_size(
    data in proptest::collection::vec(any::<u8>(), 0..=2048),
    line_size in line_size_strategy(),
  ) {
    let encoded = encode_to_vec(&data, line_size);
    for line in encoded.split(|&b| b == b'\n') {
      let line = line.strip_suffix(b"\r").unwrap_or(line);
      prop_assert!(line.len() <= line_size);
    }
  }

  #[test]
  fn encoded_line_starts_are_clean(
    data in proptest::collection::vec(any::<u8>(), 0..=2048),
    line_size in line_size_strategy(),
  ) {
    let encoded = encode_to_vec(&data, line_size);
    let mut at_line_start = true;
    for &b in &encoded {
      if at_line_start {
        prop_assert!(b != b'.' && b != b'\t' && b != b' ');
      }
      at_line_start = b == b'\n';
    }
    // is_end was set: no unescaped trailing whitespace either.
    if let Some(&last) = encoded.last() {
      prop_assert!(last != b'\t' && last != b' ');
    }
  }
}
