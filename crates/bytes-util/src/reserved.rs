/// A reserved region of a bit-packed structure.
///
/// Container specifications mandate a constant pattern for reserved bits
/// (usually all ones or all zeros). Writers always emit [`ReservedBits::value`];
/// readers consume [`ReservedBits::width`] bits and may compare against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservedBits {
    width: u8,
    value: u64,
}

impl ReservedBits {
    /// A region of `width` bits, all set to `1`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `width` is 0 or above 64.
    pub const fn ones(width: u8) -> Self {
        assert!(width > 0 && width <= 64, "reserved region must be 1..=64 bits");
        let value = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Self { width, value }
    }

    /// A region of `width` bits, all set to `0`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `width` is 0 or above 64.
    pub const fn zeros(width: u8) -> Self {
        assert!(width > 0 && width <= 64, "reserved region must be 1..=64 bits");
        Self { width, value: 0 }
    }

    /// Number of bits in the region.
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// The mandated value of the region.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns `true` if `value` is the mandated pattern.
    pub const fn matches(&self, value: u64) -> bool {
        self.value == value
    }
}

/// Returns `true` if `value` can be represented in `bits` unsigned bits.
pub const fn fits_in_bits(value: u64, bits: u8) -> bool {
    if bits >= 64 {
        true
    } else {
        value >> bits == 0
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_patterns() {
        const FOUR_ONES: ReservedBits = ReservedBits::ones(4);
        assert_eq!(FOUR_ONES.width(), 4);
        assert_eq!(FOUR_ONES.value(), 0b1111);
        assert!(FOUR_ONES.matches(0b1111));
        assert!(!FOUR_ONES.matches(0b0111));

        assert_eq!(ReservedBits::ones(64).value(), u64::MAX);
        assert_eq!(ReservedBits::zeros(28).value(), 0);
        assert_eq!(ReservedBits::zeros(28).width(), 28);
    }

    #[test]
    fn test_fits_in_bits() {
        assert!(fits_in_bits(0, 1));
        assert!(fits_in_bits(1, 1));
        assert!(!fits_in_bits(2, 1));
        assert!(fits_in_bits(0xFFFF, 16));
        assert!(!fits_in_bits(0x1_0000, 16));
        assert!(fits_in_bits((1 << 48) - 1, 48));
        assert!(!fits_in_bits(1 << 48, 48));
        assert!(fits_in_bits(u64::MAX, 64));
    }
}
