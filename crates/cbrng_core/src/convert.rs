//! Stable word-to-unit-interval mapping.
//!
//! Downstream samplers turn generator words into reals through these
//! functions only, so the mapping is identical on every backend. Each
//! conversion keeps the top `p` bits of the word, where `p` is the smaller
//! of the word width and the mantissa precision (53 for `f64`, 24 for
//! `f32`), and scales by `2^-p`:
//!
//! | Interval | Formula on the kept bits `m` |
//! |----------|------------------------------|
//! | `[0, 1)` | `m * 2^-p` |
//! | `(0, 1]` | `(m + 1) * 2^-p` |
//! | `(0, 1)` | `(m + 0.5) * 2^-p` |
//! | `[0, 1]` | `m / (2^p - 1)` |
//!
//! The open interval keeps one bit fewer when the word is at least as wide
//! as the mantissa (`p = 52` for `u64` to `f64`, `p = 23` for `f32`);
//! otherwise the largest value would round up to exactly 1.
//!
//! The `f32` methods use the same formulas with `p = 24` for both word
//! widths, so a `u32` and a `u64` sharing their leading bits give the same
//! `f32`.
//!
//! # Examples
//! ```
//! use cbrng_core::convert::UnitInterval;
//!
//! assert_eq!(0u32.closed_open(), 0.0);
//! assert_eq!(u32::MAX.closed_closed(), 1.0);
//! assert!(u64::MAX.closed_open() < 1.0);
//! assert!(0u64.open_open() > 0.0);
//! assert!(u64::MAX.open_open_f32() < 1.0);
//! ```

/// Conversion of a generator word to `f64` or `f32` in the unit interval.
pub trait UnitInterval: Copy {
    /// Number of leading word bits kept by the `f64` conversions.
    const PRECISION: u32;

    /// Kept high bits as an exact `f64`.
    fn kept_bits(self) -> f64;

    /// The leading `bits` bits of the word, `1 <= bits <= width`.
    fn top_bits(self, bits: u32) -> u64;

    /// Maps into `[0, 1)`.
    #[inline]
    fn closed_open(self) -> f64 {
        self.kept_bits() * scale(Self::PRECISION)
    }

    /// Maps into `(0, 1]`.
    #[inline]
    fn open_closed(self) -> f64 {
        (self.kept_bits() + 1.0) * scale(Self::PRECISION)
    }

    /// Maps into `(0, 1)`.
    #[inline]
    fn open_open(self) -> f64 {
        (self.kept_bits() + 0.5) * scale(Self::PRECISION)
    }

    /// Maps into `[0, 1]`.
    #[inline]
    fn closed_closed(self) -> f64 {
        self.kept_bits() / (2f64.powi(Self::PRECISION as i32) - 1.0)
    }

    /// Maps into `[0, 1)` as `f32`.
    #[inline]
    fn closed_open_f32(self) -> f32 {
        self.top_bits(F32_PRECISION) as f32 * scale_f32(F32_PRECISION)
    }

    /// Maps into `(0, 1]` as `f32`.
    #[inline]
    fn open_closed_f32(self) -> f32 {
        (self.top_bits(F32_PRECISION) + 1) as f32 * scale_f32(F32_PRECISION)
    }

    /// Maps into `(0, 1)` as `f32`. Keeps one bit fewer so the largest
    /// value stays below 1.
    #[inline]
    fn open_open_f32(self) -> f32 {
        (self.top_bits(F32_PRECISION - 1) as f32 + 0.5) * scale_f32(F32_PRECISION - 1)
    }

    /// Maps into `[0, 1]` as `f32`.
    #[inline]
    fn closed_closed_f32(self) -> f32 {
        self.top_bits(F32_PRECISION) as f32 / ((1u32 << F32_PRECISION) - 1) as f32
    }
}

/// Mantissa precision of `f32`.
const F32_PRECISION: u32 = 24;

#[inline(always)]
fn scale_f32(precision: u32) -> f32 {
    2f32.powi(-(precision as i32))
}

#[inline(always)]
fn scale(precision: u32) -> f64 {
    2f64.powi(-(precision as i32))
}

impl UnitInterval for u32 {
    const PRECISION: u32 = 32;

    #[inline(always)]
    fn kept_bits(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn top_bits(self, bits: u32) -> u64 {
        (self >> (32 - bits)) as u64
    }
}

impl UnitInterval for u64 {
    const PRECISION: u32 = 53;

    #[inline(always)]
    fn kept_bits(self) -> f64 {
        (self >> 11) as f64
    }

    #[inline(always)]
    fn top_bits(self, bits: u32) -> u64 {
        self >> (64 - bits)
    }

    #[inline]
    fn open_open(self) -> f64 {
        ((self >> 12) as f64 + 0.5) * scale(Self::PRECISION - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_u32_endpoints() {
        assert_eq!(0u32.closed_open(), 0.0);
        assert_eq!(u32::MAX.open_closed(), 1.0);
        assert_relative_eq!(u32::MAX.closed_open(), 1.0 - 2f64.powi(-32));
        assert_relative_eq!(0u32.open_open(), 2f64.powi(-33));
    }

    #[test]
    fn test_u64_endpoints() {
        assert_eq!(0u64.closed_open(), 0.0);
        assert_eq!(u64::MAX.open_closed(), 1.0);
        assert_eq!(u64::MAX.closed_closed(), 1.0);
        assert!(u64::MAX.open_open() < 1.0);
        assert_relative_eq!(0u64.open_open(), 2f64.powi(-53));
    }

    #[test]
    fn test_midpoint() {
        assert_relative_eq!((1u64 << 63).closed_open(), 0.5);
        assert_relative_eq!((1u32 << 31).closed_open(), 0.5);
    }

    #[test]
    fn test_f32_closed_open() {
        assert_eq!(0u32.closed_open_f32(), 0.0);
        assert!(u32::MAX.closed_open_f32() < 1.0);
        assert!(u64::MAX.closed_open_f32() < 1.0);
        assert_relative_eq!((1u32 << 31).closed_open_f32(), 0.5);
        assert_relative_eq!((1u64 << 63).closed_open_f32(), 0.5);
    }

    #[test]
    fn test_f32_endpoints() {
        for (lo, hi) in [
            (0u32.open_closed_f32(), u32::MAX.open_closed_f32()),
            (0u64.open_closed_f32(), u64::MAX.open_closed_f32()),
        ] {
            assert!(lo > 0.0);
            assert_eq!(hi, 1.0);
        }
        assert_eq!(0u32.closed_closed_f32(), 0.0);
        assert_eq!(u32::MAX.closed_closed_f32(), 1.0);
        assert_eq!(u64::MAX.closed_closed_f32(), 1.0);

        assert!(0u32.open_open_f32() > 0.0);
        assert!(u32::MAX.open_open_f32() < 1.0);
        assert!(u64::MAX.open_open_f32() < 1.0);
        assert_relative_eq!(0u64.open_open_f32(), 2f32.powi(-24));
    }

    #[test]
    fn test_f32_agrees_across_word_widths() {
        // A u32 and a u64 with the same leading bits map to the same f32.
        let word = 0xDEAD_BEEFu32;
        let wide = (word as u64) << 32 | 0x1234_5678;
        assert_eq!(word.closed_open_f32(), wide.closed_open_f32());
        assert_eq!(word.open_open_f32(), wide.open_open_f32());
        assert_eq!(word.closed_closed_f32(), wide.closed_closed_f32());
    }
}
