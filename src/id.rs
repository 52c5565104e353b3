use std::{fmt, str};

use fstr::FStr;

use crate::ParseError;

/// Index of the byte that carries the version nibble.
const VERSION_BYTE: usize = 6;

/// Index of the byte that carries the variant bits.
const VARIANT_BYTE: usize = 8;

/// Mask of the version nibble in byte 6.
pub const VERSION_MASK: u8 = 0xf0;

/// Version nibble of UUIDv4 (`0100`).
pub const VERSION_4: u8 = 0x40;

/// Mask of the `10` variant bits in byte 8.
pub const VARIANT_10_MASK: u8 = 0b1100_0000;

/// The `10` variant bits (RFC 4122 variant), set on every generated UUID.
pub const VARIANT_10: u8 = 0b1000_0000;

/// Mask of the `110` variant bits in byte 8.
pub const VARIANT_110_MASK: u8 = 0b1110_0000;

/// The `110` variant bits, accepted on input but never generated.
pub const VARIANT_110: u8 = 0b1100_0000;

/// Represents a UUID version 4.
///
/// Every value of this type has the version nibble set at `0100` and the variant bits set at either
/// `10` or `110`. Values are obtained from a generator or by validating external representations.
///
/// # Examples
///
/// ```rust
/// use uuid4_pool::{ParseError, Uuid};
///
/// let x = "6a0c2488-264b-4e26-89f5-bffcc3f4c5cf".parse::<Uuid>()?;
/// assert_eq!(x.to_string(), "6a0c2488-264b-4e26-89f5-bffcc3f4c5cf");
/// assert_eq!(x.as_bytes()[6], 0x4e);
///
/// assert_eq!(Uuid::from_slice(&[0u8; 15]), Err(ParseError::Malformed));
/// # Ok::<(), ParseError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Uuid([u8; 16]);

/// Variant field layouts accepted by [`Uuid`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `10xx` variant (RFC 4122).
    Var10,

    /// `110x` variant (reserved for Microsoft backward compatibility).
    Var110,
}

impl Uuid {
    /// Creates a UUIDv4 from 16 random bytes by overwriting the version and variant fields.
    ///
    /// The version nibble is set at `0100` and the variant bits at `10`; all other bits are kept.
    pub fn from_random_bytes(mut bytes: [u8; 16]) -> Self {
        bytes[VERSION_BYTE] = VERSION_4 | (bytes[VERSION_BYTE] & !VERSION_MASK);
        bytes[VARIANT_BYTE] = VARIANT_10 | (bytes[VARIANT_BYTE] & !VARIANT_10_MASK);
        Self(bytes)
    }

    /// Validates a 16-byte array as UUIDv4.
    ///
    /// The version is checked before the variant, and the first failing check determines the
    /// error.
    pub const fn from_bytes(bytes: [u8; 16]) -> Result<Self, ParseError> {
        if bytes[VERSION_BYTE] & VERSION_MASK != VERSION_4 {
            Err(ParseError::InvalidVersion)
        } else if variant_of(bytes[VARIANT_BYTE]).is_none() {
            Err(ParseError::InvalidVariant)
        } else {
            Ok(Self(bytes))
        }
    }

    /// Validates a byte slice as UUIDv4, returning [`ParseError::Malformed`] unless the slice is
    /// exactly 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        <[u8; 16]>::try_from(bytes)
            .map_err(|_| ParseError::Malformed)
            .and_then(Self::from_bytes)
    }

    /// Parses the 8-4-4-4-12 hexadecimal string representation, accepting both upper and lower
    /// case digits.
    ///
    /// Every character is examined before a structural failure is reported, and the version and
    /// variant are validated only once the structure is sound.
    pub fn parse_str(src: &str) -> Result<Self, ParseError> {
        let src = src.as_bytes();
        if src.len() != 36 {
            return Err(ParseError::Malformed);
        }

        let mut dst = [0u8; 16];
        let mut well_formed = true;
        let mut digits = 0;
        for (i, &c) in src.iter().enumerate() {
            if i == 8 || i == 13 || i == 18 || i == 23 {
                well_formed &= c == b'-';
            } else {
                match char::from(c).to_digit(16) {
                    Some(num) => dst[digits / 2] |= (num as u8) << (4 * (1 - digits % 2)),
                    None => well_formed = false,
                }
                digits += 1;
            }
        }

        if well_formed {
            Self::from_bytes(dst)
        } else {
            Err(ParseError::Malformed)
        }
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the underlying byte array.
    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns the version number, which is always `4`.
    pub const fn version(&self) -> u8 {
        self.0[VERSION_BYTE] >> 4
    }

    /// Returns the variant field layout.
    pub const fn variant(&self) -> Variant {
        match variant_of(self.0[VARIANT_BYTE]) {
            Some(variant) => variant,
            None => unreachable!(),
        }
    }

    /// Returns the 8-4-4-4-12 lowercase hexadecimal string representation stored in a
    /// stack-allocated string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid4_pool::Uuid;
    ///
    /// let x = "6A0C2488-264B-4E26-89F5-BFFCC3F4C5CF".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "6a0c2488-264b-4e26-89f5-bffcc3f4c5cf");
    /// assert_eq!(format!("{}", y), "6a0c2488-264b-4e26-89f5-bffcc3f4c5cf");
    /// # Ok::<(), uuid4_pool::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut j = 0;
        for (i, e) in self.0.iter().enumerate() {
            buffer[j] = DIGITS[(e >> 4) as usize];
            buffer[j + 1] = DIGITS[(e & 15) as usize];
            j += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[j] = b'-';
                j += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: the buffer consists of ASCII hex digits and dashes only.
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }
}

/// Classifies the variant bits of `octet`, returning `None` for layouts other than `10` and `110`.
const fn variant_of(octet: u8) -> Option<Variant> {
    if octet & VARIANT_10_MASK == VARIANT_10 {
        Some(Variant::Var10)
    } else if octet & VARIANT_110_MASK == VARIANT_110 {
        Some(Variant::Var110)
    } else {
        None
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_str(src)
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse_str(src)
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Self::parse_str(&src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = ParseError;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl TryFrom<[u8; 16]> for Uuid {
    type Error = ParseError;

    fn try_from(src: [u8; 16]) -> Result<Self, Self::Error> {
        Self::from_bytes(src)
    }
}

impl TryFrom<u128> for Uuid {
    type Error = ParseError;

    fn try_from(src: u128) -> Result<Self, Self::Error> {
        Self::from_bytes(src.to_be_bytes())
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;
    use crate::ParseError;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl TryFrom<uuid::Uuid> for Uuid {
        type Error = ParseError;

        fn try_from(src: uuid::Uuid) -> Result<Self, Self::Error> {
            Self::from_bytes(src.into_bytes())
        }
    }

}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUIDv4 representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::parse_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{
        Uuid, Variant, VARIANT_10, VARIANT_10_MASK, VARIANT_110, VARIANT_110_MASK, VERSION_4,
        VERSION_MASK,
    };
    use crate::ParseError;

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [([u8; 16], &'static str)] {
        &[
            (
                [0, 1, 2, 3, 4, 5, 0x46, 7, 0xa8, 9, 10, 11, 12, 13, 14, 15],
                "00010203-0405-4607-a809-0a0b0c0d0e0f",
            ),
            (
                [0, 0, 0, 0, 0, 0, 0x40, 0, 0x80, 0, 0, 0, 0, 0, 0, 0],
                "00000000-0000-4000-8000-000000000000",
            ),
            (
                [
                    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x4f, 0xff, 0xbf, 0xff, 0xff, 0xff, 0xff,
                    0xff, 0xff, 0xff,
                ],
                "ffffffff-ffff-4fff-bfff-ffffffffffff",
            ),
            (
                [
                    0x6a, 0x0c, 0x24, 0x88, 0x26, 0x4b, 0x4e, 0x26, 0x89, 0xf5, 0xbf, 0xfc, 0xc3,
                    0xf4, 0xc5, 0xcf,
                ],
                "6a0c2488-264b-4e26-89f5-bffcc3f4c5cf",
            ),
            (
                [
                    0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0x4d, 0xef, 0xc0, 0x11, 0x22, 0x33, 0x44,
                    0x55, 0x66, 0x77,
                ],
                "01234567-89ab-4def-c011-223344556677",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (bytes, text) in prepare_cases() {
            let from_bytes = Uuid::from_bytes(*bytes).unwrap();
            assert_eq!(from_bytes.as_bytes(), bytes);
            assert_eq!(Ok(from_bytes), text.parse());
            assert_eq!(Ok(from_bytes), text.to_uppercase().parse());
            assert_eq!(&from_bytes.encode() as &str, *text);
            assert_eq!(&from_bytes.to_string(), text);
            assert_eq!(String::from(from_bytes), *text);
        }
    }

    /// Validates byte slices by length, version, and variant in order
    #[test]
    fn validates_byte_slices_by_length_version_and_variant_in_order() {
        assert_eq!(Uuid::from_slice(&[]), Err(ParseError::Malformed));
        assert_eq!(Uuid::from_slice(&[0u8; 15]), Err(ParseError::Malformed));
        assert_eq!(Uuid::from_slice(&[0u8; 17]), Err(ParseError::Malformed));
        assert_eq!(Uuid::from_slice(&[0x40u8; 17]), Err(ParseError::Malformed));
        assert_eq!(Uuid::from_slice(&[0u8; 16]), Err(ParseError::InvalidVersion));

        for i in 0..16u8 {
            let mut bytes = [0u8; 16];
            bytes[6] = 0x40;
            bytes[8] = i << 4 | 0x0f;
            let result = Uuid::from_slice(&bytes);
            if i <= 0x07 || i >= 0x0e {
                assert_eq!(result, Err(ParseError::InvalidVariant), "variant nibble {:x}", i);
            } else {
                assert_eq!(result.map(Uuid::into_bytes), Ok(bytes), "variant nibble {:x}", i);
            }
        }
    }

    /// Rejects every version nibble except 4
    #[test]
    fn rejects_every_version_nibble_except_4() {
        for i in 0..16u8 {
            let mut bytes = [0u8; 16];
            bytes[6] = i << 4 | 0x07;
            bytes[8] = 0x80;
            let result = Uuid::from_bytes(bytes);
            if i == 4 {
                assert_eq!(result.map(|e| e.version()), Ok(4));
            } else {
                assert_eq!(result, Err(ParseError::InvalidVersion), "version nibble {:x}", i);
            }
        }

        // version is reported before variant
        let mut bytes = [0u8; 16];
        bytes[6] = 0x50;
        bytes[8] = 0xf0;
        assert_eq!(Uuid::from_bytes(bytes), Err(ParseError::InvalidVersion));
    }

    /// Pins masks to their boundary values
    #[test]
    fn pins_masks_to_their_boundary_values() {
        assert_eq!(0x3f & VERSION_MASK, 0x30);
        assert_eq!(0x40 & VERSION_MASK, VERSION_4);
        assert_eq!(0x4f & VERSION_MASK, VERSION_4);
        assert_eq!(0x50 & VERSION_MASK, 0x50);

        assert_eq!(0x7f & VARIANT_10_MASK, 0x40);
        assert_eq!(0x80 & VARIANT_10_MASK, VARIANT_10);
        assert_eq!(0xbf & VARIANT_10_MASK, VARIANT_10);
        assert_eq!(0xc0 & VARIANT_10_MASK, 0xc0);

        assert_eq!(0xbf & VARIANT_110_MASK, 0xa0);
        assert_eq!(0xc0 & VARIANT_110_MASK, VARIANT_110);
        assert_eq!(0xdf & VARIANT_110_MASK, VARIANT_110);
        assert_eq!(0xe0 & VARIANT_110_MASK, 0xe0);

        let cases = [
            (0x7fu8, None),
            (0x80, Some(Variant::Var10)),
            (0xbf, Some(Variant::Var10)),
            (0xc0, Some(Variant::Var110)),
            (0xdf, Some(Variant::Var110)),
            (0xe0, None),
        ];
        for (octet, expected) in cases {
            let mut bytes = [0u8; 16];
            bytes[6] = 0x40;
            bytes[8] = octet;
            match expected {
                Some(variant) => assert_eq!(Uuid::from_bytes(bytes).unwrap().variant(), variant),
                None => assert_eq!(Uuid::from_bytes(bytes), Err(ParseError::InvalidVariant)),
            }
        }
    }

    /// Sets version and variant fields of random bytes while keeping other bits
    #[test]
    fn sets_version_and_variant_fields_of_random_bytes_while_keeping_other_bits() {
        let e = Uuid::from_random_bytes([0x00; 16]);
        assert_eq!(&e.encode() as &str, "00000000-0000-4000-8000-000000000000");

        let e = Uuid::from_random_bytes([0xff; 16]);
        assert_eq!(&e.encode() as &str, "ffffffff-ffff-4fff-bfff-ffffffffffff");

        let e = Uuid::from_random_bytes([0x01; 16]);
        assert_eq!(&e.encode() as &str, "01010101-0101-4101-8101-010101010101");
        assert_eq!(e.encode().len(), 36);

        let e = Uuid::from_random_bytes([0xc5; 16]);
        assert_eq!(e.as_bytes()[6], 0x45);
        assert_eq!(e.as_bytes()[8], 0x85);
        assert_eq!(e.variant(), Variant::Var10);
        assert_eq!(e.version(), 4);
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let malformed = [
            "",
            "1234ghijk",
            "6a0c2488264b4e2689f5bffcc3f4c5cg",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5cg2",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5c/",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5c:",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5c@",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5cG",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5c`",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5cg",
            "g a0c2488-264b-4e26-89f5-bffcc3f4c5c",
            " 6a0c2488-264b-4e26-89f5-bffcc3f4c5c",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5cf ",
            "{6a0c2488-264b-4e26-89f5-bffcc3f4c5c}",
            "6a0c2488-264b4e26-89f5-bffcc3f4c5cff",
            "6a0c2488_264b-4e26-89f5-bffcc3f4c5cf",
            "6a0c2488-264b_4e26-89f5-bffcc3f4c5cf",
            "6a0c2488-264b-4e26_89f5-bffcc3f4c5cf",
            "6a0c2488-264b-4e26-89f5_bffcc3f4c5cf",
            "6a0c24880264b-4e26-89f5-bffcc3f4c5c-",
            "+a0c2488-264b-4e26-89f5-bffcc3f4c5cf",
            "6a0c2488-264b-4e26-89f5-bffcc3f4c5\u{e9}",
        ];
        for e in malformed {
            assert_eq!(e.parse::<Uuid>(), Err(ParseError::Malformed), "{:?}", e);
        }

        let invalid_version = [
            "00010203-0405-0607-0809-0a0b0c0d0e0f",
            "00010203-0405-3607-0809-0a0b0c0d0e0f",
            "00010203-0405-5607-8809-0a0b0c0d0e0f",
        ];
        for e in invalid_version {
            assert_eq!(e.parse::<Uuid>(), Err(ParseError::InvalidVersion), "{:?}", e);
        }

        for v in "01234567efEF".chars() {
            let e = format!("00010203-0405-4607-{}809-0a0b0c0d0e0f", v);
            assert_eq!(e.parse::<Uuid>(), Err(ParseError::InvalidVariant), "{:?}", e);
        }
    }

    /// Accepts both variants in either case
    #[test]
    fn accepts_both_variants_in_either_case() {
        for v in "89abcdABCD".chars() {
            let lower = format!("00010203-0405-4607-{}009-0a0b0c0d0e0f", v);
            let upper = lower.to_uppercase();
            let e = lower.parse::<Uuid>().unwrap();
            assert_eq!(upper.parse::<Uuid>(), Ok(e));
            assert_eq!(e.to_string(), lower.to_lowercase());
            assert_eq!(e.to_string(), upper.to_lowercase());
        }
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (bytes, text) in prepare_cases() {
            let e = Uuid::from_bytes(*bytes).unwrap();
            assert_eq!(Uuid::try_from(<[u8; 16]>::from(e)), Ok(e));
            assert_eq!(Uuid::try_from(u128::from(e)), Ok(e));
            assert_eq!(Uuid::try_from(&e.as_bytes()[..]), Ok(e));
            assert_eq!(Uuid::try_from(*text), Ok(e));
            assert_eq!(e.encode().parse(), Ok(e));
            assert_eq!(e.encode().to_uppercase().parse(), Ok(e));
            assert_eq!(Uuid::try_from(e.to_string()), Ok(e));
            assert_eq!(Uuid::try_from(e.to_string().to_uppercase()), Ok(e));
        }
    }
}
