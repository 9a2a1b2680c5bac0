use crate::{MAX_RANDOMNESS, MAX_TIMESTAMP};
use fstr::FStr;
use std::{error, fmt, str};

/// Digit characters used in the canonical Crockford base32 notation.
const DIGITS: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// An O(1) map from ASCII code points to Crockford base32 digit values.
///
/// Upper and lower case letters decode alike; `0xff` marks a code point outside the alphabet
/// (including the ambiguous letters I, L, O, and U).
const DECODE_MAP: [u8; 256] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11, 0xff, 0x12, 0x13, 0xff, 0x14, 0x15, 0xff,
    0x16, 0x17, 0x18, 0x19, 0x1a, 0xff, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11, 0xff, 0x12, 0x13, 0xff, 0x14, 0x15, 0xff,
    0x16, 0x17, 0x18, 0x19, 0x1a, 0xff, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

/// Represents a ULID and provides converters and comparison operators.
///
/// A ULID is a 128-bit value laid out as a 48-bit Unix millisecond timestamp followed by 80 bits
/// of randomness, both big-endian. The derived comparison operators sort identifiers by the
/// byte-wise order of the raw representation, which coincides with the numeric order of the
/// (timestamp, randomness) pair and with the lexicographic order of the encoded strings.
///
/// # Examples
///
/// ```rust
/// use ulid128::Ulid;
///
/// let x = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse::<Ulid>()?;
/// assert_eq!(x.to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
///
/// let y = Ulid::from(0x018b_cfe5_6800_0102_0304_0506_0708_090au128);
/// assert_eq!(y.to_u128(), 0x018b_cfe5_6800_0102_0304_0506_0708_090au128);
/// # Ok::<(), ulid128::ParseError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[repr(transparent)]
pub struct Ulid([u8; 16]);

impl Ulid {
    /// Creates an object from a 128-bit unsigned integer.
    pub const fn from_u128(int_value: u128) -> Self {
        Self(int_value.to_be_bytes())
    }

    /// Returns the 128-bit unsigned integer representation.
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Creates an object from a 16-byte big-endian byte array.
    pub const fn from_bytes(array_value: [u8; 16]) -> Self {
        Self(array_value)
    }

    /// Returns the big-endian byte array representation.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns a reference to the big-endian byte array representation.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an object from the timestamp and randomness field values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid128::Ulid;
    ///
    /// let x = Ulid::from_parts(0x018b_cfe5_6800, 0x0102_0304_0506_0708_090a);
    /// assert_eq!(x.encode(), "01HF7YAT00041061050R3GG28A");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` exceeds the 48-bit range or `randomness` exceeds the 80-bit range.
    pub const fn from_parts(timestamp: u64, randomness: u128) -> Self {
        if timestamp > MAX_TIMESTAMP || randomness > MAX_RANDOMNESS {
            panic!("invalid field value");
        } else {
            Self::from_u128(((timestamp as u128) << 80) | randomness)
        }
    }

    /// Returns the 48-bit `timestamp` field value: Unix time in milliseconds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid128::Ulid;
    ///
    /// let x = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse::<Ulid>()?;
    /// assert_eq!(x.timestamp(), 0x01_563e_3ab5_d3);
    /// assert_eq!(x.randomness(), 0xd676_4c61_efb9_9302_bd5b);
    /// # Ok::<(), ulid128::ParseError>(())
    /// ```
    pub const fn timestamp(&self) -> u64 {
        (self.to_u128() >> 80) as u64
    }

    /// Returns the 80-bit `randomness` field value.
    pub const fn randomness(&self) -> u128 {
        self.to_u128() & MAX_RANDOMNESS
    }

    /// Creates an object from the 26-digit string representation.
    ///
    /// Letters are matched case-insensitively, but the ambiguous letters I, L, O, and U are not
    /// part of the alphabet and are rejected, not remapped. The first digit must be `0` through
    /// `7` because a larger value would not fit in 128 bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid128::Ulid;
    ///
    /// let x = Ulid::try_from_str("01hf7yat00041061050r3gg28a")?;
    /// let y = "01HF7YAT00041061050R3GG28A".parse::<Ulid>()?;
    /// assert_eq!(x, y);
    /// # Ok::<(), ulid128::ParseError>(())
    /// ```
    pub const fn try_from_str(str_value: &str) -> Result<Self, ParseError> {
        let bs = str_value.as_bytes();
        if bs.len() != 26 {
            return Err(ParseError::invalid_length(bs.len()));
        }

        let mut int_value = 0u128;
        let mut i = 0;
        while i < 26 {
            let n = DECODE_MAP[bs[i] as usize];
            if n == 0xff || (i == 0 && n > 7) {
                return Err(ParseError::invalid_character(str_value, i));
            }
            int_value = (int_value << 5) | n as u128;
            i += 1;
        }
        Ok(Self::from_u128(int_value))
    }

    /// Returns the 26-digit canonical string representation stored in a stack-allocated
    /// string-like type that can be handled like [`String`] through common traits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid128::Ulid;
    ///
    /// let x = "01HF7YAT00041061050R3GG28A".parse::<Ulid>()?;
    /// let y = x.encode();
    /// assert_eq!(y, "01HF7YAT00041061050R3GG28A");
    /// assert_eq!(format!("{}", y), "01HF7YAT00041061050R3GG28A");
    /// # Ok::<(), ulid128::ParseError>(())
    /// ```
    pub const fn encode(&self) -> FStr<26> {
        // 26 five-bit groups hold 130 bits; the first group carries only the top three bits of
        // the value, hence the first digit never exceeds '7'
        let int_value = self.to_u128();
        let mut dst = [0u8; 26];
        let mut i = 0;
        while i < 26 {
            dst[i] = DIGITS[((int_value >> (125 - 5 * i)) & 0x1f) as usize];
            i += 1;
        }

        // SAFETY: All bytes in `dst` are valid ASCII characters.
        unsafe { FStr::from_inner_unchecked(dst) }
    }
}

impl From<u128> for Ulid {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Ulid> for u128 {
    fn from(object: Ulid) -> Self {
        object.to_u128()
    }
}

impl From<[u8; 16]> for Ulid {
    /// Creates an object from a 16-byte big-endian byte array.
    fn from(value: [u8; 16]) -> Self {
        Self::from_bytes(value)
    }
}

impl From<Ulid> for [u8; 16] {
    /// Returns the big-endian byte array representation.
    fn from(object: Ulid) -> Self {
        object.to_bytes()
    }
}

impl AsRef<[u8]> for Ulid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl str::FromStr for Ulid {
    type Err = ParseError;

    /// Creates an object from the 26-digit string representation.
    fn from_str(str_value: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(str_value)
    }
}

impl TryFrom<String> for Ulid {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_str(&value)
    }
}

impl From<Ulid> for String {
    fn from(object: Ulid) -> Self {
        object.encode().into()
    }
}

impl fmt::Display for Ulid {
    /// Returns the 26-digit canonical string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ulid128::Ulid;
    ///
    /// let x = "00000RPPMC041061050R3GG28A".parse::<Ulid>()?;
    /// assert_eq!(format!("{}", x), "00000RPPMC041061050R3GG28A");
    /// assert_eq!(format!("{:30}", x), "00000RPPMC041061050R3GG28A    ");
    /// assert_eq!(format!("{:.^8.6}", x), ".00000R.");
    /// # Ok::<(), ulid128::ParseError>(())
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.encode().as_str(), f)
    }
}

/// An error parsing an invalid string representation of ULID.
#[derive(Clone, Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
}

#[derive(Clone, Eq, PartialEq, Debug)]
enum ParseErrorKind {
    InvalidLength {
        n_bytes: usize,
    },
    InvalidCharacter {
        /// Holds the invalid character as a UTF-8 byte array to work in the const context.
        utf8_char: [u8; 4],
        position: usize,
    },
}

impl ParseError {
    /// Creates an `InvalidLength` variant from the actual length.
    const fn invalid_length(n_bytes: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidLength { n_bytes },
        }
    }

    /// Creates an `InvalidCharacter` variant from the entire string and the position of the
    /// offending character.
    const fn invalid_character(src: &str, position: usize) -> Self {
        const fn is_char_boundary(utf8_bytes: &[u8], index: usize) -> bool {
            match index {
                0 => true,
                i if i < utf8_bytes.len() => (utf8_bytes[i] as i8) >= -64,
                _ => index == utf8_bytes.len(),
            }
        }

        let bs = src.as_bytes();
        assert!(is_char_boundary(bs, position));
        let mut utf8_char = [bs[position], 0, 0, 0];

        let mut i = 1;
        while !is_char_boundary(bs, position + i) {
            utf8_char[i] = bs[position + i];
            i += 1;
        }

        Self {
            kind: ParseErrorKind::InvalidCharacter {
                utf8_char,
                position,
            },
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse string as ULID: ")?;
        match self.kind {
            ParseErrorKind::InvalidLength { n_bytes } => {
                write!(f, "invalid length: {} bytes (expected 26)", n_bytes)
            }
            ParseErrorKind::InvalidCharacter {
                utf8_char,
                position,
            } => {
                let chr = str::from_utf8(&utf8_char).unwrap().chars().next().unwrap();
                write!(
                    f,
                    "invalid character '{}' at {}",
                    chr.escape_debug(),
                    position
                )
            }
        }
    }
}

impl error::Error for ParseError {}


#[cfg(feature = "serde")]
mod with_serde {
    use super::{fmt, str, Ulid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Ulid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Ulid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl de::Visitor<'_> for VisitorImpl {
        type Value = Ulid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a ULID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::try_from_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            match <[u8; 16]>::try_from(value) {
                Ok(array_value) => Ok(Self::Value::from_bytes(array_value)),
                Err(err) => match str::from_utf8(value) {
                    Ok(str_value) => self.visit_str(str_value),
                    _ => Err(de::Error::custom(err)),
                },
            }
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
            Ok(Self::Value::from_u128(value))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Ulid;
        use serde_test::{Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases: &[(&str, &[u8; 16])] = &[
                (
                    "0WG2HV2YCX8SMBVNJ0ZC36E6PH",
                    &[
                        28, 128, 163, 177, 121, 157, 70, 104, 189, 214, 64, 251, 6, 103, 26, 209,
                    ],
                ),
                (
                    "1S4GZB2EWG38YVS2B0N4HVHGF9",
                    &[
                        57, 36, 62, 177, 59, 144, 26, 61, 188, 137, 96, 169, 35, 184, 193, 233,
                    ],
                ),
                (
                    "5XKJPKRBBD2S0RQ7946KJ6BRAG",
                    &[
                        189, 156, 173, 60, 45, 109, 22, 65, 139, 157, 36, 52, 228, 101, 225, 80,
                    ],
                ),
                (
                    "3C0EBJN1392ZY0F86ADR425T7K",
                    &[
                        108, 3, 151, 42, 132, 105, 23, 252, 7, 160, 202, 110, 8, 34, 232, 243,
                    ],
                ),
                (
                    "1VHWVZHA4B0V5SM7F68J0NXXPH",
                    &[
                        59, 143, 55, 248, 168, 139, 6, 203, 154, 29, 230, 68, 129, 94, 246, 209,
                    ],
                ),
                (
                    "1JWY7TVGD6PE5ACQPKH6VMT3XH",
                    &[
                        50, 231, 143, 173, 193, 166, 179, 138, 166, 94, 211, 137, 183, 77, 15, 177,
                    ],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Ulid>().unwrap();
                serde_test::assert_tokens(&e.readable(), &[Token::Str(text)]);
                serde_test::assert_tokens(&e.compact(), &[Token::Bytes(*bytes)]);

                // deserialize the other format regardless of human-readability configuration
                serde_test::assert_de_tokens(&e.readable(), &[Token::Bytes(*bytes)]);
                serde_test::assert_de_tokens(&e.compact(), &[Token::Str(text)]);

                // deserialize textual representation even if passed as byte slice
                serde_test::assert_de_tokens(&e.readable(), &[Token::Bytes(text.as_bytes())]);
                serde_test::assert_de_tokens(&e.compact(), &[Token::Bytes(text.as_bytes())]);
            }
        }
    }
}
