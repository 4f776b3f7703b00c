//! Cell parameter and attribute values.

use kiln_common::BitVec;
use serde::{Deserialize, Serialize};

/// A keyed parameter or attribute value on a cell.
///
/// Parameters arrive from synthesis as strings, integers, or bit-strings.
/// Accessors normalise between the representations: binary text is
/// MSB-first, integer bit order is LSB-first, matching [`BitVec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    /// A string value (including `0`/`1` binary text).
    Str(String),
    /// An integer value.
    Int(i64),
    /// An explicit bit-string value.
    Bits(BitVec),
}

impl ParamValue {
    /// The value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer.
    ///
    /// Strings parse as decimal; bit-strings convert through their numeric
    /// value when they fit in 64 bits.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Str(s) => s.trim().parse().ok(),
            ParamValue::Bits(b) => b.to_u64().map(|v| v as i64),
        }
    }

    /// The value as a boolean: any nonzero integer interpretation is true.
    pub fn as_bool(&self) -> bool {
        self.as_int().map(|v| v != 0).unwrap_or(false)
    }

    /// The value as a float. Strings parse as decimal reals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Str(s) => s.trim().parse().ok(),
            ParamValue::Bits(b) => b.to_u64().map(|v| v as f64),
        }
    }

    /// The value as a bit vector of exactly `width` bits.
    ///
    /// Binary text is read MSB-first; integers LSB-first. Values are
    /// zero-extended or truncated at the most significant end. A string
    /// that is not pure binary text yields all zeros.
    pub fn as_bits(&self, width: u32) -> BitVec {
        match self {
            ParamValue::Str(s) => BitVec::from_binary_str(s)
                .map(|b| b.resized(width))
                .unwrap_or_else(|| BitVec::new(width)),
            ParamValue::Int(i) => BitVec::from_u64(*i as u64, width.min(64)).resized(width),
            ParamValue::Bits(b) => b.resized(width),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<BitVec> for ParamValue {
    fn from(b: BitVec) -> Self {
        ParamValue::Bits(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_accessors() {
        let v = ParamValue::from("SAME_EDGE");
        assert_eq!(v.as_str(), Some("SAME_EDGE"));
        assert_eq!(v.as_int(), None);
        assert!(!v.as_bool());
    }

    #[test]
    fn int_accessors() {
        let v = ParamValue::from(5);
        assert_eq!(v.as_int(), Some(5));
        assert!(v.as_bool());
        assert_eq!(v.as_f64(), Some(5.0));
    }

    #[test]
    fn numeric_string_parses() {
        let v = ParamValue::from("12");
        assert_eq!(v.as_int(), Some(12));
        assert_eq!(v.as_f64(), Some(12.0));
    }

    #[test]
    fn real_string_parses() {
        let v = ParamValue::from("5.25");
        assert_eq!(v.as_f64(), Some(5.25));
    }

    #[test]
    fn zero_is_false() {
        assert!(!ParamValue::from(0).as_bool());
        assert!(!ParamValue::from("0").as_bool());
    }

    #[test]
    fn bits_from_int_lsb_first() {
        let b = ParamValue::from(0b1000).as_bits(4);
        assert!(b.get(3));
        assert!(!b.get(0));
    }

    #[test]
    fn bits_from_binary_text_msb_first() {
        // "1000" is the 4-bit value 8: bit 3 set.
        let b = ParamValue::from("1000").as_bits(4);
        assert!(b.get(3));
        assert!(!b.get(0));
    }

    #[test]
    fn bits_zero_extend() {
        let b = ParamValue::from("11").as_bits(8);
        assert_eq!(b.to_u64(), Some(3));
        assert_eq!(b.width(), 8);
    }

    #[test]
    fn bits_truncate_high() {
        let b = ParamValue::from("1011").as_bits(2);
        assert_eq!(b.to_u64(), Some(3));
    }

    #[test]
    fn non_binary_string_yields_zeros() {
        let b = ParamValue::from("MASK").as_bits(4);
        assert_eq!(b.to_u64(), Some(0));
    }

    #[test]
    fn explicit_bits_passthrough() {
        let bits = BitVec::from_binary_str("101").unwrap();
        let v = ParamValue::from(bits.clone());
        assert_eq!(v.as_bits(3), bits);
        assert_eq!(v.as_int(), Some(5));
    }

    #[test]
    fn serde_roundtrip() {
        let v = ParamValue::from("LVCMOS33");
        let json = serde_json::to_string(&v).unwrap();
        let back: ParamValue = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
