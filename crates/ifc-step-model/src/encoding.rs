// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP text and value encoding
//!
//! Strings are kept decoded in memory. Decoding understands the ISO 10303-21
//! control directives (`\X\`, `\X2\`, `\X4\`, `\S\`, `\P?\`, `\N\`), encoding
//! emits `\X2\`/`\X4\` runs for anything outside printable ASCII.

use crate::{AttributeValue, Result, StepError};
use std::fmt::Write;

/// Decode the content of a STEP string literal (without surrounding quotes)
pub fn decode_string(raw: &str) -> Result<String> {
    // Fast path: nothing to decode
    if !raw.contains('\\') && !raw.contains("''") {
        return Ok(raw.to_string());
    }

    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                out.push('\'');
                // '' is one quote
                i += if bytes.get(i + 1) == Some(&b'\'') { 2 } else { 1 };
            }
            b'\\' => {
                i = decode_directive(raw, i, &mut out)?;
            }
            _ => {
                // Copy the whole UTF-8 sequence up to the next special byte
                let end = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\\' || b == b'\'')
                    .map_or(bytes.len(), |p| i + p);
                out.push_str(&raw[i..end]);
                i = end;
            }
        }
    }
    Ok(out)
}

/// Decode the directive starting at `raw[start] == '\\'`, returning the next position
fn decode_directive(raw: &str, start: usize, out: &mut String) -> Result<usize> {
    let rest = &raw[start..];
    if rest.starts_with("\\\\") {
        out.push('\\');
        return Ok(start + 2);
    }
    if rest.starts_with("\\N\\") {
        out.push('\n');
        return Ok(start + 3);
    }
    if let Some(tail) = rest.strip_prefix("\\X2\\") {
        let (text, consumed) = decode_hex_run(tail, 4)?;
        out.push_str(&text);
        return Ok(start + 4 + consumed);
    }
    if let Some(tail) = rest.strip_prefix("\\X4\\") {
        let (text, consumed) = decode_hex_run(tail, 8)?;
        out.push_str(&text);
        return Ok(start + 4 + consumed);
    }
    if let Some(tail) = rest.strip_prefix("\\X\\") {
        let hex = tail
            .get(..2)
            .ok_or_else(|| StepError::format(format!("truncated \\X\\ directive in '{}'", raw)))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|_| StepError::format(format!("invalid \\X\\ code '{}'", hex)))?;
        // ISO 8859-1 maps one to one onto the first 256 code points
        out.push(char::from(byte));
        return Ok(start + 5);
    }
    if let Some(tail) = rest.strip_prefix("\\S\\") {
        let c = tail
            .chars()
            .next()
            .ok_or_else(|| StepError::format(format!("truncated \\S\\ directive in '{}'", raw)))?;
        if !c.is_ascii() {
            return Err(StepError::format(format!("invalid \\S\\ character '{}'", c)));
        }
        out.push(char::from(c as u8 + 128));
        return Ok(start + 4);
    }
    let b = rest.as_bytes();
    if b.len() >= 4 && b[1] == b'P' && b[3] == b'\\' {
        // Code page selection, only ISO 8859-1 is supported
        return Ok(start + 4);
    }
    out.push('\\');
    Ok(start + 1)
}

/// Decode hex groups of `width` digits up to `\X0\`, returning text and bytes consumed
fn decode_hex_run(tail: &str, width: usize) -> Result<(String, usize)> {
    let end = tail
        .find("\\X0\\")
        .ok_or_else(|| StepError::format("unterminated \\X2\\ or \\X4\\ directive"))?;
    let hex = &tail[..end];
    if hex.len() % width != 0 {
        return Err(StepError::format(format!(
            "hex run '{}' is not a multiple of {} digits",
            hex, width
        )));
    }

    let mut codes = Vec::with_capacity(hex.len() / width);
    for chunk in hex.as_bytes().chunks(width) {
        let digits = std::str::from_utf8(chunk)
            .map_err(|_| StepError::format("non-ASCII character in hex run"))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| StepError::format(format!("invalid hex digits '{}'", digits)))?;
        codes.push(code);
    }

    let text = if width == 4 {
        let units: Vec<u16> = codes.iter().map(|&c| c as u16).collect();
        char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        codes
            .into_iter()
            .map(|c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    };
    Ok((text, end + 4))
}

#[derive(PartialEq, Clone, Copy)]
enum Run {
    Plain,
    Ucs2,
    Ucs4,
}

/// Encode text for a STEP string literal (without surrounding quotes)
pub fn encode_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let mut run = Run::Plain;
    for c in text.chars() {
        let wanted = match c {
            ' '..='~' | '\n' => Run::Plain,
            c if (c as u32) <= 0xFFFF => Run::Ucs2,
            _ => Run::Ucs4,
        };
        if wanted != run {
            if run != Run::Plain {
                out.push_str("\\X0\\");
            }
            match wanted {
                Run::Ucs2 => out.push_str("\\X2\\"),
                Run::Ucs4 => out.push_str("\\X4\\"),
                Run::Plain => {}
            }
            run = wanted;
        }
        match (run, c) {
            (Run::Plain, '\'') => out.push_str("''"),
            (Run::Plain, '\\') => out.push_str("\\\\"),
            (Run::Plain, '\n') => out.push_str("\\N\\"),
            (Run::Plain, c) => out.push(c),
            (Run::Ucs2, c) => {
                let _ = write!(out, "{:04X}", c as u32);
            }
            (Run::Ucs4, c) => {
                let _ = write!(out, "{:08X}", c as u32);
            }
        }
    }
    if run != Run::Plain {
        out.push_str("\\X0\\");
    }
    out
}

/// Format a real so that it always carries a decimal point
///
/// `1.0` → `1.`, `0.25` → `0.25`, `1.5e-7` → `1.5E-07`.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        log::warn!("Non-finite real {} written as 0.", value);
        return "0.".to_string();
    }
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let mantissa = trim_mantissa(mantissa);
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ("-", digits),
                None => ("", exponent),
            };
            format!("{}E{}{:0>2}", mantissa, sign, digits)
        }
        None => trim_mantissa(&repr),
    }
}

fn trim_mantissa(mantissa: &str) -> String {
    if let Some(stripped) = mantissa.strip_suffix(".0") {
        format!("{}.", stripped)
    } else if mantissa.contains('.') {
        mantissa.to_string()
    } else {
        format!("{}.", mantissa)
    }
}

/// Append the STEP token for one value
pub fn write_value(out: &mut String, value: &AttributeValue) {
    match value {
        AttributeValue::Null => out.push('$'),
        AttributeValue::Derived => out.push('*'),
        AttributeValue::EntityRef(id) => {
            let _ = write!(out, "#{}", id.0);
        }
        AttributeValue::Logical(logical) => {
            let _ = write!(out, ".{}.", logical.token());
        }
        AttributeValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        AttributeValue::Real(f) => out.push_str(&format_real(*f)),
        AttributeValue::String(s) => {
            out.push('\'');
            out.push_str(&encode_string(s));
            out.push('\'');
        }
        AttributeValue::Enum(token) => {
            out.push('.');
            out.push_str(token);
            out.push('.');
        }
        AttributeValue::Binary(bits) => {
            out.push('"');
            out.push_str(bits);
            out.push('"');
        }
        AttributeValue::List(items) => {
            out.push('(');
            write_values(out, items);
            out.push(')');
        }
        AttributeValue::TypedValue(type_name, args) => {
            out.push_str(&type_name.to_ascii_uppercase());
            out.push('(');
            write_values(out, args);
            out.push(')');
        }
    }
}

/// Append comma separated STEP tokens
pub fn write_values(out: &mut String, values: &[AttributeValue]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityId, Logical};

    #[test]
    fn test_decode_plain_and_quotes() {
        assert_eq!(decode_string("Wall-001").unwrap(), "Wall-001");
        assert_eq!(decode_string("Bob''s wall").unwrap(), "Bob's wall");
        assert_eq!(decode_string("C:\\\\temp").unwrap(), "C:\\temp");
    }

    #[test]
    fn test_decode_extended_characters() {
        // ä via \X\, ü via \X2\, umlaut pair in one run
        assert_eq!(decode_string("Gr\\X\\E4te").unwrap(), "Gräte");
        assert_eq!(decode_string("T\\X2\\00FC\\X0\\r").unwrap(), "Tür");
        assert_eq!(decode_string("\\X2\\00C400D6\\X0\\").unwrap(), "ÄÖ");
        assert_eq!(decode_string("\\X4\\0001F600\\X0\\").unwrap(), "😀");
        assert_eq!(decode_string("\\S\\d").unwrap(), "ä");
        assert_eq!(decode_string("\\PA\\\\S\\d").unwrap(), "ä");
        assert_eq!(decode_string("line\\N\\break").unwrap(), "line\nbreak");
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_string("\\X2\\00FC").is_err());
        assert!(decode_string("\\X2\\00F\\X0\\").is_err());
        assert!(decode_string("\\X\\ZZ").is_err());
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(encode_string("Bob's"), "Bob''s");
        assert_eq!(encode_string("a\\b"), "a\\\\b");
        assert_eq!(encode_string("Tür"), "T\\X2\\00FC\\X0\\r");
        assert_eq!(encode_string("ÄÖ"), "\\X2\\00C400D6\\X0\\");
        assert_eq!(encode_string("😀"), "\\X4\\0001F600\\X0\\");
    }

    #[test]
    fn test_string_symmetry() {
        for text in ["plain", "it's", "Grüße 😀 \\ done", "two\nlines", "ÄÖ'x'"] {
            assert_eq!(decode_string(&encode_string(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.0), "1.");
        assert_eq!(format_real(0.25), "0.25");
        assert_eq!(format_real(-3.0), "-3.");
        assert_eq!(format_real(1.5e-7), "1.5E-07");
        assert_eq!(format_real(1e20), "1.E20");
        assert_eq!(format_real(f64::NAN), "0.");
    }

    #[test]
    fn test_write_value() {
        let value = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(5)),
            AttributeValue::Null,
            AttributeValue::Logical(Logical::False),
            AttributeValue::Enum("NOTDEFINED".to_string()),
            AttributeValue::TypedValue(
                "IfcLabel".to_string(),
                vec![AttributeValue::String("x".to_string())],
            ),
            AttributeValue::Derived,
            AttributeValue::Integer(-2),
        ]);
        let mut out = String::new();
        write_value(&mut out, &value);
        assert_eq!(out, "(#5,$,.F.,.NOTDEFINED.,IFCLABEL('x'),*,-2)");
    }
}
