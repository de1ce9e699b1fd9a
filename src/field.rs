use num_traits::PrimInt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid hex digit {ch:?} at offset {offset}")]
    BadHexDigit { ch: char, offset: usize },
    #[error("invalid bit character {ch:?} at offset {offset}, expected 0, 1 or ?")]
    BadBitChar { ch: char, offset: usize },
}

fn hex_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'A'..=b'F' => Some((b - b'A' + 10) as u32),
        b'a'..=b'f' => Some((b - b'a' + 10) as u32),
        _ => None,
    }
}

/// Best-effort prefix parse, returning the value and the number of digits consumed.
/// Stops at the first non-hex byte (`?`, blank, anything else).
pub fn parse_hex_prefix(digits: &[u8]) -> (u32, usize) {
    let mut value = 0u32;
    for (i, &b) in digits.iter().enumerate() {
        match hex_value(b) {
            Some(v) => value = (value << 4) | v,
            None => return (value, i),
        }
    }
    (value, digits.len())
}

/// Hex value of `digits`, MSB first; a bad character silently truncates the parse.
pub fn parse_hex(digits: &[u8]) -> u32 {
    parse_hex_prefix(digits).0
}

pub fn parse_hex_exact(digits: &[u8]) -> Result<u32, FieldError> {
    let (value, consumed) = parse_hex_prefix(digits);
    match digits.get(consumed) {
        None => Ok(value),
        Some(&b) => Err(FieldError::BadHexDigit { ch: b as char, offset: consumed }),
    }
}

/// Checks a bit-group slice holds only `0`, `1` or the `?` wildcard.
pub fn check_bit_group(group: &[u8]) -> Result<(), FieldError> {
    match group.iter().position(|b| !matches!(b, b'0' | b'1' | b'?')) {
        None => Ok(()),
        Some(offset) => Err(FieldError::BadBitChar { ch: group[offset] as char, offset }),
    }
}

/// Low `width` bits of `value`, most significant first, zero padded on the left.
pub fn to_binary_digits<T: PrimInt>(value: T, width: usize) -> String {
    let bits = T::zero().count_zeros() as usize;
    (0..width)
        .rev()
        .map(|i| {
            if i < bits && (value >> i) & T::one() == T::one() {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

/// `'1'` is set; every other character, including an unresolved `?`, is clear.
#[inline]
pub fn bit_of(ch: u8) -> bool {
    ch == b'1'
}
