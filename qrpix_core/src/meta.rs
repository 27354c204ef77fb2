use std::str::FromStr;

/// Error correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ecl {
    /// Low: 7% recovery rate.
    L,
    /// Medium: 15% recovery rate.
    #[default]
    M,
    /// Quartile: 25% recovery rate.
    Q,
    /// High: 30% recovery rate.
    H,
}

impl FromStr for Ecl {
    type Err = InvalidLevel;

    /// Parse one of the four level letters, case-insensitively.
    /// # Example
    /// ```
    /// use qrpix_core::Ecl;
    /// assert_eq!("q".parse::<Ecl>().unwrap(), Ecl::Q);
    /// assert!("X".parse::<Ecl>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l" | "L" => Ok(Self::L),
            "m" | "M" => Ok(Self::M),
            "q" | "Q" => Ok(Self::Q),
            "h" | "H" => Ok(Self::H),
            other => Err(InvalidLevel(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Ecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::L => 'L',
            Self::M => 'M',
            Self::Q => 'Q',
            Self::H => 'H',
        };
        write!(f, "{}", letter)
    }
}

/// Error returned when a string does not name an error correction level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid level: {0}")]
pub struct InvalidLevel(String);

/// Version of a QR code symbol, which determines its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SymbolVersion(u8);

impl SymbolVersion {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(40);

    /// Construct a version given its number. Valid numbers are in the range 1..=40.
    /// # Example
    /// ```
    /// use qrpix_core::SymbolVersion;
    /// assert!(SymbolVersion::new(1).is_some());
    /// assert!(SymbolVersion::new(41).is_none());
    /// ```
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number <= 40 {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Get the version number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Side length of this version's module matrix.
    /// # Example
    /// ```
    /// use qrpix_core::SymbolVersion;
    /// assert_eq!(SymbolVersion::MIN.side(), 21);
    /// assert_eq!(SymbolVersion::MAX.side(), 177);
    /// ```
    pub fn side(self) -> usize {
        17 + self.0 as usize * 4
    }

    /// Get the next higher version, if it exists.
    pub fn incr(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl std::fmt::Display for SymbolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// Encoding mode of the symbol data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mode {
    /// Encoding for digits 0-9.
    Num,
    /// Encoding for digits 0-9, capital letters and a few symbols.
    Alnum,
    /// Encoding for arbitrary byte strings.
    Bytes,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_parsing_ignores_case() {
        for (input, expected) in [("l", Ecl::L), ("M", Ecl::M), ("q", Ecl::Q), ("H", Ecl::H)] {
            assert_eq!(input.parse::<Ecl>().unwrap(), expected);
        }
    }

    #[test]
    fn test_invalid_level_diagnostic() {
        let err = "Z".parse::<Ecl>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid level: Z");
    }

    #[test]
    fn test_version_bounds() {
        assert_eq!(SymbolVersion::new(0), None);
        assert_eq!(SymbolVersion::new(40), Some(SymbolVersion::MAX));
        assert_eq!(SymbolVersion::MAX.incr(), None);
        assert_eq!(SymbolVersion::new(2).unwrap().side(), 25);
    }
}
