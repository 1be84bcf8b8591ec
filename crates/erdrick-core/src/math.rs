//! 8/16-bit integer helpers used by damage and price calculations.
//!
//! All results stay inside 16 bits the way the game's shift-and-add routines
//! do: products wrap to their low word and division reports the remainder.

/// Full 16-bit product of two bytes.
#[inline]
pub const fn mul8x8(a: u8, b: u8) -> u16 {
    a as u16 * b as u16
}

/// Low word of a 16x16 product.
#[inline]
pub const fn mul16(a: u16, b: u16) -> u16 {
    a.wrapping_mul(b)
}

/// Quotient and remainder, or `None` for a zero divisor.
#[inline]
pub const fn div16(dividend: u16, divisor: u16) -> Option<(u16, u16)> {
    if divisor == 0 {
        None
    } else {
        Some((dividend / divisor, dividend % divisor))
    }
}

/// `(value * rnd) >> shift`, computed without overflow.
#[inline]
pub const fn scale(value: u16, rnd: u8, shift: u32) -> u16 {
    ((value as u32 * rnd as u32) >> shift) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn products() {
        assert_eq!(mul8x8(255, 255), 65025);
        assert_eq!(mul16(300, 300), (90_000u32 & 0xFFFF) as u16);
    }

    #[test]
    fn division_reports_remainder() {
        assert_eq!(div16(100, 7), Some((14, 2)));
        assert_eq!(div16(5, 0), None);
    }

    #[test]
    fn scale_never_overflows() {
        assert_eq!(scale(u16::MAX, 255, 8), 65279);
        assert_eq!(scale(100, 255, 10), 24);
        assert_eq!(scale(100, 0, 10), 0);
    }

    proptest! {
        #[test]
        fn mul16_keeps_the_low_word(a in any::<u16>(), b in any::<u16>()) {
            prop_assert_eq!(mul16(a, b), (u32::from(a) * u32::from(b)) as u16);
        }

        #[test]
        fn division_recombines(n in any::<u16>(), d in 1..=u16::MAX) {
            let (q, r) = div16(n, d).expect("non-zero divisor");
            prop_assert!(r < d);
            prop_assert_eq!(u32::from(q) * u32::from(d) + u32::from(r), u32::from(n));
        }
    }
}
