//! Portable scalar yEnc decode kernel and the sequence state machine.
//!
//! [`decode_step`] is the single source of truth for the decoder's
//! transition table; the scalar kernels and the vector kernels' bridging
//! regions all run through it so every tier observes identical state.

#![allow(unsafe_code)]

use super::{DecodeEnd, DecoderState};
use crate::consts::{CR, DOT, ESCAPE, ESCAPE_DECODE_SHIFT, LF, SHIFT};

/// The effect of consuming one input byte.
pub(crate) enum Step {
  /// Emit one output byte.
  Emit(u8),
  /// The byte was consumed without output (line breaks, escape leads,
  /// stuffed dots).
  Skip,
  /// An end sequence completed (incremental mode only).
  End(DecodeEnd),
}

/// Advance the sequence state by one input byte.
///
/// `raw` enables NNTP dot-unstuffing; `incremental` enables the
/// end-of-article and end-of-control terminators. In non-incremental mode
/// `Step::End` is never returned: the `=y` of a control line decodes as an
/// ordinary escape pair and `\r\n.\r\n` is consumed as stuffing plus a line
/// break.
///
/// After `\r\n.` the stuffed dot has already been dropped, so a following
/// `=` enters the ordinary escape state: `\r\n.=y` is data, never a control
/// terminator. [`DecoderState::CrLfEq`] therefore means exactly "`\r\n=`
/// seen".
#[inline]
pub(crate) fn decode_step(state: &mut DecoderState, b: u8, raw: bool, incremental: bool) -> Step {
  match *state {
    DecoderState::Eq => {
      *state = DecoderState::None;
      Step::Emit(b.wrapping_sub(ESCAPE_DECODE_SHIFT))
    }
    DecoderState::CrLfEq => {
      if incremental && b == b'y' {
        *state = DecoderState::CrLf;
        return Step::End(DecodeEnd::Control);
      }
      *state = DecoderState::None;
      Step::Emit(b.wrapping_sub(ESCAPE_DECODE_SHIFT))
    }
    current => match b {
      CR => {
        *state = if current == DecoderState::CrLfDt {
          DecoderState::CrLfDtCr
        } else {
          DecoderState::Cr
        };
        Step::Skip
      }
      LF => match current {
        DecoderState::Cr => {
          *state = DecoderState::CrLf;
          Step::Skip
        }
        DecoderState::CrLfDtCr => {
          *state = DecoderState::CrLf;
          if incremental {
            Step::End(DecodeEnd::Article)
          } else {
            Step::Skip
          }
        }
        // A bare LF is dropped but does not open line-start context.
        _ => {
          *state = DecoderState::None;
          Step::Skip
        }
      },
      ESCAPE => {
        *state = if current == DecoderState::CrLf {
          DecoderState::CrLfEq
        } else {
          DecoderState::Eq
        };
        Step::Skip
      }
      DOT if raw && current == DecoderState::CrLf => {
        *state = DecoderState::CrLfDt;
        Step::Skip
      }
      _ => {
        *state = DecoderState::None;
        Step::Emit(b.wrapping_sub(SHIFT))
      }
    },
  }
}

/// Scalar full-buffer decode kernel.
///
/// # Safety
///
/// `src` must be valid for `len` reads and `dst` for `len` writes. The
/// regions may alias exactly (`src == dst`): the write index never exceeds
/// the read index, so every byte is read before its slot can be
/// overwritten.
pub(crate) unsafe fn decode_scalar(raw: bool, src: *const u8, dst: *mut u8, len: usize, state: &mut DecoderState) -> usize {
  let mut out = 0usize;
  let mut i = 0usize;

  while i < len {
    // SAFETY: i < len, and out <= i holds because each consumed input byte
    // emits at most one output byte.
    let b = unsafe { *src.add(i) };
    i += 1;
    if let Step::Emit(v) = decode_step(state, b, raw, false) {
      unsafe { *dst.add(out) = v };
      out += 1;
    }
  }

  out
}

/// Scalar incremental decode kernel (`raw` implied).
///
/// Returns `(consumed, written, end)`. On a terminator, `consumed` points
/// just past it: after the `y` of `\r\n=y` for [`DecodeEnd::Control`], after
/// the final `\n` of `\r\n.\r\n` for [`DecodeEnd::Article`].
///
/// # Safety
///
/// Same contract as [`decode_scalar`].
pub(crate) unsafe fn decode_end_scalar(
  src: *const u8,
  dst: *mut u8,
  len: usize,
  state: &mut DecoderState,
) -> (usize, usize, DecodeEnd) {
  let mut out = 0usize;
  let mut i = 0usize;

  while i < len {
    // SAFETY: i < len and out <= i as in `decode_scalar`.
    let b = unsafe { *src.add(i) };
    i += 1;
    match decode_step(state, b, true, true) {
      Step::Emit(v) => {
        unsafe { *dst.add(out) = v };
        out += 1;
      }
      Step::Skip => {}
      Step::End(end) => return (i, out, end),
    }
  }

  (i, out, DecodeEnd::None)
}
