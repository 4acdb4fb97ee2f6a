//! Fixed-width big-endian integer and float codec
//!
//! Every encoder either returns exactly `width` bytes or fails; nothing is
//! truncated or coerced. Output values use a variable-width form: 4 bytes
//! for values that fit a signed 32-bit integer, otherwise the 8-byte
//! encoding of the negated value. A decoder that reads a negative 4-byte
//! prefix knows to read 8 bytes instead.

use crate::constants::*;
use crate::error::{Result, TxError};

/// IntToBytes: ℕ × {1..8} → 𝔹^width
pub fn int_to_bytes(value: u64, width: usize) -> Result<Vec<u8>> {
    if width == 0 || width > 8 {
        return Err(TxError::UnsupportedWidth(width));
    }
    if width < 8 && value >> (8 * width) != 0 {
        return Err(TxError::IntegerRange { value, width });
    }
    Ok(value.to_be_bytes()[8 - width..].to_vec())
}

/// SignedIntToBytes: ℤ × {1,2,4,8} → 𝔹^width (two's complement)
pub fn signed_int_to_bytes(value: i64, width: usize) -> Result<Vec<u8>> {
    let out_of_range = || TxError::SignedIntegerRange { value, width };
    match width {
        1 => Ok(i8::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec()),
        2 => Ok(i16::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec()),
        4 => Ok(i32::try_from(value).map_err(|_| out_of_range())?.to_be_bytes().to_vec()),
        8 => Ok(value.to_be_bytes().to_vec()),
        _ => Err(TxError::UnsupportedWidth(width)),
    }
}

/// FloatToBytes: IEEE-754 big-endian, 8 bytes (f64) or 4 bytes (f32)
///
/// The 4-byte form only accepts values an f32 holds exactly.
pub fn float_to_bytes(value: f64, width: usize) -> Result<Vec<u8>> {
    match width {
        8 => Ok(value.to_be_bytes().to_vec()),
        4 => {
            let narrow = value as f32;
            if !value.is_nan() && f64::from(narrow) != value {
                return Err(TxError::Serialization(format!(
                    "{} does not fit in a 4-byte float",
                    value
                )));
            }
            Ok(narrow.to_be_bytes().to_vec())
        }
        _ => Err(TxError::UnsupportedWidth(width)),
    }
}

/// OutputValueToBytes: [0, 2^43] → 𝔹^4 ∪ 𝔹^8
///
/// Zero is encodable; transfers are required to be positive by `validate_tx`.
pub fn output_value_to_bytes(value: u64) -> Result<Vec<u8>> {
    if value > MAX_OUTPUT_VALUE {
        return Err(TxError::OutputValue(format!(
            "value {} exceeds maximum {}",
            value, MAX_OUTPUT_VALUE
        )));
    }
    if value > MAX_OUTPUT_VALUE_32 {
        // MAX_OUTPUT_VALUE < i64::MAX, the cast is lossless
        signed_int_to_bytes(-(value as i64), 8)
    } else {
        signed_int_to_bytes(value as i64, 4)
    }
}

/// Decode an unsigned big-endian integer of 1 to 8 bytes
pub fn bytes_to_int(bytes: &[u8]) -> Result<u64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return Err(TxError::UnsupportedWidth(bytes.len()));
    }
    Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

/// Decode a two's-complement big-endian integer of 1, 2, 4 or 8 bytes
pub fn bytes_to_signed_int(bytes: &[u8]) -> Result<i64> {
    match bytes.len() {
        1 => Ok(i64::from(bytes[0] as i8)),
        2 => Ok(i64::from(i16::from_be_bytes([bytes[0], bytes[1]]))),
        4 => Ok(i64::from(i32::from_be_bytes(fixed::<4>(bytes)?))),
        8 => Ok(i64::from_be_bytes(fixed::<8>(bytes)?)),
        n => Err(TxError::UnsupportedWidth(n)),
    }
}

/// Decode an IEEE-754 big-endian float of 4 or 8 bytes
pub fn bytes_to_float(bytes: &[u8]) -> Result<f64> {
    match bytes.len() {
        8 => Ok(f64::from_be_bytes(fixed::<8>(bytes)?)),
        4 => Ok(f64::from(f32::from_be_bytes(fixed::<4>(bytes)?))),
        n => Err(TxError::UnsupportedWidth(n)),
    }
}

/// Decode a variable-width output value; returns the value and bytes consumed
pub fn bytes_to_output_value(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut reader = Reader::new(bytes);
    let value = reader.read_output_value()?;
    Ok((value, reader.position()))
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| TxError::Deserialization(format!("expected {} bytes, got {}", N, bytes.len())))
}

/// Cursor over a byte slice for decoding
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(TxError::Deserialization(format!(
                "need {} bytes at offset {}, only {} left",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        fixed::<N>(self.read_bytes(N)?)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array::<4>()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array::<8>()?))
    }

    pub fn read_output_value(&mut self) -> Result<u64> {
        let short = i32::from_be_bytes(self.read_array::<4>()?);
        if short >= 0 {
            return Ok(short as u64);
        }
        // Negative prefix: rewind and read the 8-byte form
        self.pos -= 4;
        let wide = i64::from_be_bytes(self.read_array::<8>()?);
        let value = wide.unsigned_abs();
        if wide >= 0 || value <= MAX_OUTPUT_VALUE_32 || value > MAX_OUTPUT_VALUE {
            return Err(TxError::OutputValue(format!("invalid wide output value {}", wide)));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_bytes() {
        assert_eq!(int_to_bytes(1, 1).unwrap(), vec![0x01]);
        assert_eq!(int_to_bytes(1, 2).unwrap(), vec![0x00, 0x01]);
        assert_eq!(int_to_bytes(0x1234, 2).unwrap(), vec![0x12, 0x34]);
        assert_eq!(int_to_bytes(1550249803, 4).unwrap(), vec![0x5c, 0x66, 0xef, 0x4b]);
        assert_eq!(int_to_bytes(u64::MAX, 8).unwrap(), vec![0xff; 8]);
    }

    #[test]
    fn test_int_to_bytes_range() {
        assert_eq!(
            int_to_bytes(256, 1),
            Err(TxError::IntegerRange { value: 256, width: 1 })
        );
        assert!(int_to_bytes(0x1_0000, 2).is_err());
        assert!(int_to_bytes(0xffff_ffff, 4).is_ok());
        assert!(int_to_bytes(0x1_0000_0000, 4).is_err());
        assert_eq!(int_to_bytes(1, 0), Err(TxError::UnsupportedWidth(0)));
        assert_eq!(int_to_bytes(1, 9), Err(TxError::UnsupportedWidth(9)));
    }

    #[test]
    fn test_signed_int_to_bytes() {
        assert_eq!(signed_int_to_bytes(-1, 1).unwrap(), vec![0xff]);
        assert_eq!(signed_int_to_bytes(-2, 2).unwrap(), vec![0xff, 0xfe]);
        assert_eq!(signed_int_to_bytes(1000, 4).unwrap(), vec![0x00, 0x00, 0x03, 0xe8]);
        assert_eq!(
            signed_int_to_bytes(-3_000_000_000, 8).unwrap(),
            vec![0xff, 0xff, 0xff, 0xff, 0x4d, 0x2f, 0xa2, 0x00]
        );
        assert!(signed_int_to_bytes(128, 1).is_err());
        assert!(signed_int_to_bytes(-129, 1).is_err());
        assert!(signed_int_to_bytes(i64::from(i32::MAX) + 1, 4).is_err());
        assert_eq!(signed_int_to_bytes(1, 3), Err(TxError::UnsupportedWidth(3)));
    }

    #[test]
    fn test_float_to_bytes() {
        assert_eq!(
            float_to_bytes(18.5, 8).unwrap(),
            vec![0x40, 0x32, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(float_to_bytes(1.0, 4).unwrap(), vec![0x3f, 0x80, 0x00, 0x00]);
        assert!(matches!(float_to_bytes(0.1, 4), Err(TxError::Serialization(_))));
        assert!(float_to_bytes(f64::NAN, 4).is_ok());
        assert!(float_to_bytes(1.0, 2).is_err());
    }

    #[test]
    fn test_output_value_width() {
        assert_eq!(output_value_to_bytes(1).unwrap().len(), 4);
        assert_eq!(output_value_to_bytes(MAX_OUTPUT_VALUE_32).unwrap().len(), 4);
        assert_eq!(output_value_to_bytes(MAX_OUTPUT_VALUE_32 + 1).unwrap().len(), 8);
        assert_eq!(output_value_to_bytes(MAX_OUTPUT_VALUE).unwrap().len(), 8);
    }

    #[test]
    fn test_output_value_zero() {
        assert_eq!(output_value_to_bytes(0).unwrap(), vec![0x00, 0x00, 0x00, 0x00]);
        assert_eq!(bytes_to_output_value(&[0, 0, 0, 0]).unwrap(), (0, 4));
    }

    #[test]
    fn test_output_value_errors() {
        assert!(matches!(output_value_to_bytes(MAX_OUTPUT_VALUE + 1), Err(TxError::OutputValue(_))));
        assert!(matches!(output_value_to_bytes(1 << 60), Err(TxError::OutputValue(_))));
    }

    #[test]
    fn test_output_value_decoding() {
        let bytes = output_value_to_bytes(3_000_000_000).unwrap();
        assert_eq!(bytes_to_output_value(&bytes).unwrap(), (3_000_000_000, 8));

        let bytes = output_value_to_bytes(1000).unwrap();
        assert_eq!(bytes_to_output_value(&bytes).unwrap(), (1000, 4));

        assert!(bytes_to_output_value(&[0xff, 0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_decoders() {
        assert_eq!(bytes_to_int(&[0x12, 0x34]).unwrap(), 0x1234);
        assert_eq!(bytes_to_signed_int(&[0xff, 0xfe]).unwrap(), -2);
        assert_eq!(bytes_to_float(&float_to_bytes(21.5, 8).unwrap()).unwrap(), 21.5);
        assert!(bytes_to_int(&[]).is_err());
        assert!(bytes_to_signed_int(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_reader_bounds() {
        let mut reader = Reader::new(&[0x00, 0x01, 0x02]);
        assert_eq!(reader.read_u16().unwrap(), 1);
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_u16().is_err());
        assert_eq!(reader.read_u8().unwrap(), 2);
        assert!(reader.is_empty());
    }
}
