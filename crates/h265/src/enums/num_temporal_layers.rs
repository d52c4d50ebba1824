/// `numTemporalLayers` of an HEVC configuration record (3 bits).
///
/// `0` and `1` carry special meaning, any other value is a layer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum NumTemporalLayers {
    /// It is unknown whether the stream is temporally scalable.
    #[default]
    Unknown,
    /// The stream is not temporally scalable.
    NotScalable,
    /// The stream has this many temporal layers (`sps_max_sub_layers_minus1 + 1`).
    Count(u8),
}

impl From<u8> for NumTemporalLayers {
    fn from(value: u8) -> Self {
        match value {
            0 => NumTemporalLayers::Unknown,
            1 => NumTemporalLayers::NotScalable,
            count => NumTemporalLayers::Count(count),
        }
    }
}

impl From<NumTemporalLayers> for u8 {
    fn from(value: NumTemporalLayers) -> Self {
        match value {
            NumTemporalLayers::Unknown => 0,
            NumTemporalLayers::NotScalable => 1,
            NumTemporalLayers::Count(count) => count,
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_special_values() {
        assert_eq!(NumTemporalLayers::from(0), NumTemporalLayers::Unknown);
        assert_eq!(NumTemporalLayers::from(1), NumTemporalLayers::NotScalable);
        assert_eq!(NumTemporalLayers::from(5), NumTemporalLayers::Count(5));
    }

    #[test]
    fn test_into_raw() {
        for raw in 0..8u8 {
            assert_eq!(u8::from(NumTemporalLayers::from(raw)), raw);
        }
    }
}
