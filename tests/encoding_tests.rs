//! Tests for the fixed-width codec and output value encoding

use ledger_tx::constants::*;
use ledger_tx::encoding::*;
use ledger_tx::*;

#[test]
fn test_int_widths() {
    assert_eq!(int_to_bytes(0, 1).unwrap(), vec![0x00]);
    assert_eq!(int_to_bytes(255, 1).unwrap(), vec![0xff]);
    assert_eq!(int_to_bytes(12345, 4).unwrap(), vec![0x00, 0x00, 0x30, 0x39]);
    assert_eq!(int_to_bytes(u64::from(u32::MAX), 4).unwrap(), vec![0xff; 4]);
    assert!(matches!(int_to_bytes(1 << 32, 4), Err(TxError::IntegerRange { .. })));
    assert_eq!(int_to_bytes(1, 0), Err(TxError::UnsupportedWidth(0)));
    assert_eq!(int_to_bytes(1, 9), Err(TxError::UnsupportedWidth(9)));
}

#[test]
fn test_signed_int_widths() {
    assert_eq!(signed_int_to_bytes(-1, 1).unwrap(), vec![0xff]);
    assert_eq!(signed_int_to_bytes(-2, 2).unwrap(), vec![0xff, 0xfe]);
    assert_eq!(signed_int_to_bytes(i64::from(i32::MIN), 4).unwrap(), vec![0x80, 0, 0, 0]);
    assert_eq!(
        signed_int_to_bytes(128, 1),
        Err(TxError::SignedIntegerRange { value: 128, width: 1 })
    );
    assert_eq!(signed_int_to_bytes(1, 3), Err(TxError::UnsupportedWidth(3)));
}

#[test]
fn test_float_encoding() {
    assert_eq!(hex::encode(float_to_bytes(18.5, 8).unwrap()), "4032800000000000");
    assert_eq!(hex::encode(float_to_bytes(1.5, 4).unwrap()), "3fc00000");
    assert_eq!(bytes_to_float(&float_to_bytes(21.17, 8).unwrap()).unwrap(), 21.17);
    assert_eq!(float_to_bytes(1.0, 2), Err(TxError::UnsupportedWidth(2)));
    // narrowing that loses precision is refused
    assert!(float_to_bytes(18.3, 4).is_err());
    assert!(float_to_bytes(18.5, 4).is_ok());
}

#[test]
fn test_output_value_narrow() {
    assert_eq!(output_value_to_bytes(0).unwrap(), vec![0, 0, 0, 0]);
    assert_eq!(output_value_to_bytes(1).unwrap(), vec![0, 0, 0, 1]);
    assert_eq!(output_value_to_bytes(1000).unwrap(), vec![0x00, 0x00, 0x03, 0xe8]);
    assert_eq!(
        output_value_to_bytes(MAX_OUTPUT_VALUE_32).unwrap(),
        vec![0x7f, 0xff, 0xff, 0xff]
    );
}

#[test]
fn test_output_value_wide() {
    assert_eq!(
        hex::encode(output_value_to_bytes(MAX_OUTPUT_VALUE_32 + 1).unwrap()),
        "ffffffff80000000"
    );
    assert_eq!(
        hex::encode(output_value_to_bytes(3_000_000_000).unwrap()),
        "ffffffff4d2fa200"
    );
    assert_eq!(
        hex::encode(output_value_to_bytes(MAX_OUTPUT_VALUE).unwrap()),
        "fffff80000000000"
    );
}

#[test]
fn test_output_value_out_of_range() {
    let too_big = output_value_to_bytes(MAX_OUTPUT_VALUE + 1).unwrap_err();
    assert_eq!(too_big.kind(), ErrorKind::OutputValue);
    assert!(output_value_to_bytes(1 << 60).is_err());
}

#[test]
fn test_output_value_decoding() {
    assert_eq!(bytes_to_output_value(&[0, 0, 3, 0xe8]).unwrap(), (1000, 4));
    let wide = hex::decode("ffffffff4d2fa200").unwrap();
    assert_eq!(bytes_to_output_value(&wide).unwrap(), (3_000_000_000, 8));

    // a negative prefix with only 4 bytes is truncated
    assert!(bytes_to_output_value(&[0xff, 0xff, 0xff, 0xff]).is_err());
    // a wide encoding of a value that fits in 4 bytes is not canonical
    let non_canonical = (-1000i64).to_be_bytes();
    assert!(bytes_to_output_value(&non_canonical).is_err());
}

#[test]
fn test_reader_sequence() {
    let mut buf = Vec::new();
    buf.extend(int_to_bytes(7, 1).unwrap());
    buf.extend(int_to_bytes(0x1234, 2).unwrap());
    buf.extend(int_to_bytes(0xdeadbeef, 4).unwrap());
    buf.extend(float_to_bytes(2.5, 8).unwrap());
    buf.extend(output_value_to_bytes(5_000_000_000).unwrap());

    let mut reader = Reader::new(&buf);
    assert_eq!(reader.read_u8().unwrap(), 7);
    assert_eq!(reader.read_u16().unwrap(), 0x1234);
    assert_eq!(reader.read_u32().unwrap(), 0xdeadbeef);
    assert_eq!(reader.read_f64().unwrap(), 2.5);
    assert_eq!(reader.read_output_value().unwrap(), 5_000_000_000);
    assert!(reader.is_empty());
    assert!(reader.read_u8().is_err());
}

#[test]
fn test_bytes_to_int() {
    assert_eq!(bytes_to_int(&[0x5c, 0x66, 0xef, 0x4b]).unwrap(), 1550249803);
    assert_eq!(bytes_to_signed_int(&[0xff, 0xfe]).unwrap(), -2);
    assert!(bytes_to_int(&[]).is_err());
    assert!(bytes_to_signed_int(&[0; 3]).is_err());
}
