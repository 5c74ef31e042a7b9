//! String literal encoding.
//!
//! `"hi"` becomes `String.fromCharCode.apply(null, [104,105])`. The list holds
//! UTF-16 code units, so astral characters come out as surrogate pairs which
//! `fromCharCode` joins back together.
//!
//! Values are taken from a literal's raw text rather than the parser's decoded
//! string: a JS string is any sequence of code units, and an escape such as
//! `\uD800` has no `str` representation.

use std::iter::Peekable;
use std::str::Chars;

/// Expression text that evaluates to the string made of `units`. Contains no
/// quote characters.
pub fn encode(units: &[u16]) -> String {
    let units: Vec<String> = units.iter().map(|u| u.to_string()).collect();
    format!("String.fromCharCode.apply(null, [{}])", units.join(","))
}

/// Code units of a quoted string literal, escapes resolved. `None` when `raw`
/// is not a well-formed literal.
pub fn decode_literal(raw: &str) -> Option<Vec<u16>> {
    let quote = raw.chars().next().filter(|q| matches!(q, '"' | '\''))?;
    let body = raw.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut units = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            escape(&mut chars, &mut units)?;
        } else {
            push_char(&mut units, c);
        }
    }
    Some(units)
}

fn push_char(units: &mut Vec<u16>, c: char) {
    let mut buf = [0; 2];
    units.extend_from_slice(c.encode_utf16(&mut buf));
}

/// Resolve one escape sequence; the backslash is already consumed.
fn escape(chars: &mut Peekable<Chars<'_>>, units: &mut Vec<u16>) -> Option<()> {
    match chars.next()? {
        'n' => units.push(0x0a),
        't' => units.push(0x09),
        'r' => units.push(0x0d),
        'b' => units.push(0x08),
        'f' => units.push(0x0c),
        'v' => units.push(0x0b),
        // line continuation
        '\r' => {
            chars.next_if_eq(&'\n');
        }
        '\n' | '\u{2028}' | '\u{2029}' => {}
        'x' => units.push(hex(chars, 2)? as u16),
        'u' if chars.next_if_eq(&'{').is_some() => {
            let mut code = 0u32;
            let mut digits = 0;
            while let Some(d) = chars.next_if(|c| c.is_ascii_hexdigit()) {
                code = code.checked_mul(16)?.checked_add(d.to_digit(16)?)?;
                digits += 1;
            }
            chars.next_if_eq(&'}')?;
            if digits == 0 {
                return None;
            }
            match u16::try_from(code) {
                Ok(unit) => units.push(unit),
                Err(_) => push_char(units, char::from_u32(code)?),
            }
        }
        'u' => units.push(hex(chars, 4)? as u16),
        c @ '0'..='7' => {
            // legacy octal: up to three digits, at most 0o377
            let mut code = c.to_digit(8)?;
            let max_digits = if c <= '3' { 3 } else { 2 };
            for _ in 1..max_digits {
                match chars.next_if(|d| ('0'..='7').contains(d)) {
                    Some(d) => code = code * 8 + d.to_digit(8)?,
                    None => break,
                }
            }
            units.push(code as u16);
        }
        c => push_char(units, c),
    }
    Some(())
}

fn hex(chars: &mut Peekable<Chars<'_>>, len: usize) -> Option<u32> {
    let mut code = 0;
    for _ in 0..len {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}
