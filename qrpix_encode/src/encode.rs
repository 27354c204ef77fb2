use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

use qrpix_core::{Ecl, Mode, Module, ModuleMatrix, SymbolVersion};

/// Encoder for a QR code symbol.
///
/// Segmentation, error correction and mask selection all happen inside the
/// external encoder; this type only resolves the constraints (level, minimum
/// version, mode, case handling) and hands back the finished module matrix.
pub struct Encoder {
    constraints: Constraints,
}

impl Encoder {
    /// Construct a new encoder with the default constraints: level M, byte
    /// mode, case-sensitive, smallest version that fits.
    pub fn new() -> Self {
        Self {
            constraints: Default::default(),
        }
    }

    /// Constrain to the specified `ecl`.
    pub fn with_ecl(mut self, ecl: Ecl) -> Self {
        self.constraints.ecl = ecl;
        self
    }

    /// Require a symbol of at least `version`. Without this, the smallest
    /// version that fits the data is chosen.
    pub fn with_min_version(mut self, version: SymbolVersion) -> Self {
        self.constraints.min_version = Some(version);
        self
    }

    /// Encode data segments with `mode`.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.constraints.mode = mode;
        self
    }

    /// Treat lowercase and uppercase input as distinct (the default). When
    /// disabled, input is folded to ASCII uppercase before encoding.
    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.constraints.case_sensitive = case_sensitive;
        self
    }

    /// Encode `data` into a module matrix.
    pub fn encode<T: AsRef<[u8]>>(&self, data: T) -> Result<ModuleMatrix, EncodingError> {
        let data = data.as_ref();
        let folded;
        let data = if self.constraints.case_sensitive {
            data
        } else {
            folded = data.to_ascii_uppercase();
            &folded
        };
        check_mode(data, self.constraints.mode)?;

        let mut version = Some(self.constraints.min_version.unwrap_or(SymbolVersion::MIN));
        while let Some(v) = version {
            match self.try_version(data, v) {
                Ok(code) => return Ok(matrix_from(code)),
                // This version cannot hold the data, try the next one up.
                Err(QrError::DataTooLong) => version = v.incr(),
                Err(err) => return Err(EncodingError::Rejected(err)),
            }
        }
        Err(EncodingError::DataTooBig(
            data.len(),
            SymbolVersion::MAX,
            self.constraints.ecl,
        ))
    }

    /// Attempt to encode `data` into a symbol of exactly `version`.
    fn try_version(&self, data: &[u8], version: SymbolVersion) -> Result<QrCode, QrError> {
        let ecl = ec_level(self.constraints.ecl);
        let mut bits = Bits::new(Version::Normal(i16::from(version.number())));
        match self.constraints.mode {
            Mode::Num => bits.push_numeric_data(data)?,
            Mode::Alnum => bits.push_alphanumeric_data(data)?,
            Mode::Bytes => bits.push_byte_data(data)?,
        }
        bits.push_terminator(ecl)?;
        QrCode::with_bits(bits, ecl)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Constraints {
    ecl: Ecl,
    min_version: Option<SymbolVersion>,
    mode: Mode,
    case_sensitive: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            ecl: Ecl::M,
            min_version: None,
            mode: Mode::Bytes,
            case_sensitive: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("cannot encode byte 0x{0:x} using mode {1:?}")]
    CannotEncodeWithMode(u8, Mode),
    #[error("cannot encode {0} B of data with best case version {1} and ECL {2}")]
    DataTooBig(usize, SymbolVersion, Ecl),
    #[error("encoder rejected the input: {0}")]
    Rejected(#[source] QrError),
}

/// Verify that every byte of `data` is representable in `mode`. The external
/// encoder does not validate segment contents itself.
fn check_mode(data: &[u8], mode: Mode) -> Result<(), EncodingError> {
    let representable = |byte: u8| match mode {
        Mode::Num => byte.is_ascii_digit(),
        Mode::Alnum => matches!(
            byte,
            b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':'
        ),
        Mode::Bytes => true,
    };
    match data.iter().find(|&&byte| !representable(byte)) {
        Some(&byte) => Err(EncodingError::CannotEncodeWithMode(byte, mode)),
        None => Ok(()),
    }
}

fn ec_level(ecl: Ecl) -> EcLevel {
    match ecl {
        Ecl::L => EcLevel::L,
        Ecl::M => EcLevel::M,
        Ecl::Q => EcLevel::Q,
        Ecl::H => EcLevel::H,
    }
}

fn matrix_from(code: QrCode) -> ModuleMatrix {
    let size = code.width();
    let modules = code.into_colors().into_iter().map(|color| match color {
        qrcode::Color::Dark => Module::Dark,
        qrcode::Color::Light => Module::Light,
    });
    ModuleMatrix::from_modules(size, modules).expect("encoder returned a non-square matrix")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_short_input_fits_the_smallest_version() {
        let matrix = Encoder::new().encode("HELLO").unwrap();
        assert_eq!(matrix.size(), SymbolVersion::MIN.side());
    }

    #[test]
    fn test_min_version_is_honored() {
        let version = SymbolVersion::new(5).unwrap();
        let matrix = Encoder::new()
            .with_min_version(version)
            .encode("HELLO")
            .unwrap();
        assert_eq!(matrix.size(), version.side());
    }

    #[test]
    fn test_growing_data_grows_the_symbol() {
        // 100 bytes exceed V1-M capacity (14 data bytes) by a wide margin.
        let matrix = Encoder::new().encode(vec![b'x'; 100]).unwrap();
        assert!(matrix.size() > SymbolVersion::MIN.side());
    }

    #[test]
    fn test_oversized_data_is_rejected() {
        // 3000 bytes exceed even V40-L capacity.
        let err = Encoder::new()
            .with_ecl(Ecl::L)
            .encode(vec![b'x'; 3000])
            .unwrap_err();
        assert!(matches!(err, EncodingError::DataTooBig(3000, _, Ecl::L)));
    }

    #[test]
    fn test_case_folding_when_insensitive() {
        let folded = Encoder::new()
            .with_case_sensitivity(false)
            .encode("hello")
            .unwrap();
        let upper = Encoder::new().encode("HELLO").unwrap();
        assert_eq!(folded, upper);
    }

    #[test]
    fn test_case_sensitive_inputs_differ() {
        let lower = Encoder::new().encode("hello").unwrap();
        let upper = Encoder::new().encode("HELLO").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_mode_mismatch_is_reported() {
        let err = Encoder::new()
            .with_mode(Mode::Num)
            .encode("12a4")
            .unwrap_err();
        assert!(matches!(
            err,
            EncodingError::CannotEncodeWithMode(b'a', Mode::Num)
        ));
    }

    #[test]
    fn test_alnum_mode_accepts_its_charset() {
        assert!(Encoder::new().with_mode(Mode::Alnum).encode("AC-42").is_ok());
    }
}
