// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId generation
//!
//! A GlobalId is a 128-bit UUID written as 22 characters of the IFC base64
//! alphabet: one leading character pair for the first byte, then four
//! characters per following three-byte group.

use uuid::Uuid;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed GlobalId
pub const GUID_LENGTH: usize = 22;

/// Generate a fresh GlobalId from a random v4 UUID
pub fn new_guid() -> String {
    compress_guid(Uuid::new_v4())
}

/// Compress a UUID into its 22-character IFC form
pub fn compress_guid(uuid: Uuid) -> String {
    let bytes = uuid.as_bytes();
    let mut out = String::with_capacity(GUID_LENGTH);
    push_digits(&mut out, bytes[0] as u32, 2);
    for group in bytes[1..].chunks(3) {
        let n = (group[0] as u32) << 16 | (group[1] as u32) << 8 | group[2] as u32;
        push_digits(&mut out, n, 4);
    }
    out
}

/// Expand a 22-character GlobalId back to the UUID it encodes
pub fn expand_guid(guid: &str) -> Option<Uuid> {
    let digits = guid.as_bytes();
    if digits.len() != GUID_LENGTH {
        return None;
    }
    let mut bytes = [0u8; 16];
    let first = read_digits(&digits[..2])?;
    if first > 0xFF {
        return None;
    }
    bytes[0] = first as u8;
    for (i, chunk) in digits[2..].chunks(4).enumerate() {
        let n = read_digits(chunk)?;
        bytes[1 + i * 3] = (n >> 16) as u8;
        bytes[2 + i * 3] = (n >> 8) as u8;
        bytes[3 + i * 3] = n as u8;
    }
    Some(Uuid::from_bytes(bytes))
}

/// Check the length and alphabet of a GlobalId
pub fn is_valid_guid(guid: &str) -> bool {
    expand_guid(guid).is_some()
}

fn push_digits(out: &mut String, mut n: u32, count: usize) {
    let mut buf = [0u8; 4];
    for slot in buf[..count].iter_mut().rev() {
        *slot = ALPHABET[(n % 64) as usize];
        n /= 64;
    }
    for &c in &buf[..count] {
        out.push(c as char);
    }
}

fn read_digits(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &c| {
        let value = ALPHABET.iter().position(|&a| a == c)? as u32;
        Some(acc * 64 + value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guid_shape() {
        let guid = new_guid();
        assert_eq!(guid.len(), GUID_LENGTH);
        assert!(is_valid_guid(&guid));
        assert_ne!(guid, new_guid());
    }

    #[test]
    fn test_known_values() {
        assert_eq!(compress_guid(Uuid::nil()), "0000000000000000000000");
        assert_eq!(compress_guid(Uuid::from_bytes([0xFF; 16])), "3$$$$$$$$$$$$$$$$$$$$$");
    }

    #[test]
    fn test_expand_inverts_compress() {
        let uuid = Uuid::new_v4();
        assert_eq!(expand_guid(&compress_guid(uuid)), Some(uuid));
        assert!(expand_guid("too-short").is_none());
        assert!(expand_guid("4$$$$$$$$$$$$$$$$$$$$$").is_none());
    }
}
