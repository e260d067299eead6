//! UTF-8 / UTF-16 conversion.
//!
//! Strings may hold lone surrogates, so the UTF-8 side is the generalized
//! form: a lone surrogate is written as its own 3-byte sequence and such
//! sequences decode back to the surrogate.

const HI_SURROGATE_MIN: u32 = 0xD800;
const HI_SURROGATE_MAX: u32 = 0xDBFF;
const LO_SURROGATE_MIN: u32 = 0xDC00;
const LO_SURROGATE_MAX: u32 = 0xDFFF;
const REPLACEMENT: u16 = 0xFFFD;

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decodes one code point from `data[*cursor..]`, looking at no more than
/// `max_len` bytes.
///
/// Accepts sequences of up to four bytes (values up to `0x1F_FFFF`). Returns
/// -1 for a truncated, overlong or otherwise malformed sequence; the cursor
/// only advances on success.
pub fn unicode_from_utf8(data: &[u8], max_len: usize, cursor: &mut usize) -> i32 {
    let start = *cursor;
    let Some(rest) = data.get(start..) else {
        return -1;
    };
    let available = rest.len().min(max_len);
    if available == 0 {
        return -1;
    }

    let lead = rest[0];
    let (len, min, initial) = match lead {
        0x00..=0x7F => {
            *cursor = start + 1;
            return i32::from(lead);
        }
        0xC0..=0xDF => (2, 0x80, u32::from(lead & 0x1F)),
        0xE0..=0xEF => (3, 0x800, u32::from(lead & 0x0F)),
        0xF0..=0xF7 => (4, 0x1_0000, u32::from(lead & 0x07)),
        _ => return -1,
    };
    if available < len {
        return -1;
    }

    let mut code_point = initial;
    for &byte in &rest[1..len] {
        if !is_continuation(byte) {
            return -1;
        }
        code_point = (code_point << 6) | u32::from(byte & 0x3F);
    }
    if code_point < min {
        return -1;
    }
    *cursor = start + len;
    code_point as i32
}

/// Converts UTF-8 to UTF-16. Malformed bytes become U+FFFD.
pub fn utf8_to_utf16(data: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(data.len());
    let mut pos = 0;
    while pos < data.len() {
        let code_point = unicode_from_utf8(data, data.len() - pos, &mut pos);
        if code_point < 0 {
            out.push(REPLACEMENT);
            pos += 1;
            continue;
        }
        push_code_point(&mut out, code_point as u32);
    }
    out
}

fn push_code_point(out: &mut Vec<u16>, code_point: u32) {
    match code_point {
        0..=0xFFFF => out.push(code_point as u16),
        0x1_0000..=0x10_FFFF => {
            let v = code_point - 0x1_0000;
            out.push((HI_SURROGATE_MIN + (v >> 10)) as u16);
            out.push((LO_SURROGATE_MIN + (v & 0x3FF)) as u16);
        }
        _ => out.push(REPLACEMENT),
    }
}

/// Iterates code points, joining surrogate pairs and yielding lone
/// surrogates as they are.
fn code_points(units: &[u16]) -> impl Iterator<Item = u32> + '_ {
    let mut i = 0;
    std::iter::from_fn(move || {
        let unit = u32::from(*units.get(i)?);
        i += 1;
        if (HI_SURROGATE_MIN..=HI_SURROGATE_MAX).contains(&unit) {
            if let Some(&next) = units.get(i) {
                let next = u32::from(next);
                if (LO_SURROGATE_MIN..=LO_SURROGATE_MAX).contains(&next) {
                    i += 1;
                    return Some(0x1_0000 + ((unit - HI_SURROGATE_MIN) << 10) + (next - LO_SURROGATE_MIN));
                }
            }
        }
        Some(unit)
    })
}

fn encode(code_point: u32, buf: &mut [u8; 4]) -> usize {
    match code_point {
        0..=0x7F => {
            buf[0] = code_point as u8;
            1
        }
        0x80..=0x7FF => {
            buf[0] = 0xC0 | (code_point >> 6) as u8;
            buf[1] = 0x80 | (code_point & 0x3F) as u8;
            2
        }
        0x800..=0xFFFF => {
            buf[0] = 0xE0 | (code_point >> 12) as u8;
            buf[1] = 0x80 | ((code_point >> 6) & 0x3F) as u8;
            buf[2] = 0x80 | (code_point & 0x3F) as u8;
            3
        }
        _ => {
            buf[0] = 0xF0 | (code_point >> 18) as u8;
            buf[1] = 0x80 | ((code_point >> 12) & 0x3F) as u8;
            buf[2] = 0x80 | ((code_point >> 6) & 0x3F) as u8;
            buf[3] = 0x80 | (code_point & 0x3F) as u8;
            4
        }
    }
}

/// Converts UTF-16 to UTF-8.
pub fn utf16_to_utf8(units: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(utf16_to_utf8_size(units));
    let mut buf = [0u8; 4];
    for code_point in code_points(units) {
        let n = encode(code_point, &mut buf);
        out.extend_from_slice(&buf[..n]);
    }
    out
}

/// Length of [`utf16_to_utf8`]'s output.
pub fn utf16_to_utf8_size(units: &[u16]) -> usize {
    let mut buf = [0u8; 4];
    code_points(units).map(|cp| encode(cp, &mut buf)).sum()
}

/// Writes as much of the UTF-8 form as fits in `out` without splitting a
/// sequence. Returns the bytes written.
pub(crate) fn write_utf16_as_utf8(units: &[u16], out: &mut [u8]) -> usize {
    let mut written = 0;
    let mut buf = [0u8; 4];
    for code_point in code_points(units) {
        let n = encode(code_point, &mut buf);
        if written + n > out.len() {
            break;
        }
        out[written..written + n].copy_from_slice(&buf[..n]);
        written += n;
    }
    written
}
