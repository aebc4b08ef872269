//! Python literal handling: string decoding, canonical constant rendering,
//! and docstring cleanup.

/// Split a string literal into (prefix, body) with the quotes removed.
///
/// Returns `None` for text that is not a complete quoted literal.
fn split_string_literal(text: &str) -> Option<(String, &str)> {
    let quote_start = text.find(['\'', '"'])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if !prefix.chars().all(|c| matches!(c, 'r' | 'u' | 'b' | 'f')) {
        return None;
    }

    let rest = &text[quote_start..];
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if rest.len() >= quote.len() * 2 && rest.starts_with(quote) && rest.ends_with(quote) {
            return Some((prefix, &rest[quote.len()..rest.len() - quote.len()]));
        }
    }
    None
}

/// Decode a plain `str` literal. f-strings and bytes yield `None`.
pub fn decode_str_literal(text: &str) -> Option<String> {
    let (prefix, body) = split_string_literal(text)?;
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    if prefix.contains('r') {
        return Some(body.to_string());
    }
    Some(unescape(body))
}

/// Decode backslash escapes of a non-raw `str` literal.
///
/// `\N{NAME}` escapes need the Unicode name table and are kept verbatim.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0c}'),
            Some('v') => out.push('\u{0b}'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(tag @ 'x') => push_hex_escape(&mut out, &mut chars, tag, 2),
            Some(tag @ 'u') => push_hex_escape(&mut out, &mut chars, tag, 4),
            Some(tag @ 'U') => push_hex_escape(&mut out, &mut chars, tag, 8),
            Some(first @ '0'..='7') => {
                // One to three octal digits
                let mut value = first.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if let Some(decoded) = char::from_u32(value) {
                    out.push(decoded);
                }
            }
            Some(other) => {
                // Unknown escapes are kept verbatim
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// `\xHH`, `\uHHHH`, `\UHHHHHHHH`; malformed escapes are kept as written.
fn push_hex_escape(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    tag: char,
    width: usize,
) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }

    let decoded = if digits.len() == width {
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    } else {
        None
    };
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(tag);
            out.push_str(&digits);
        }
    }
}

/// Canonical quoted form of a string value.
///
/// Single quotes unless the value contains a single quote and no double quote.
pub fn repr_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render an integer literal in decimal (`0x10` → `16`).
///
/// Values beyond `u128` keep their source spelling.
pub fn render_integer(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    if lower.ends_with('j') || lower.ends_with('l') {
        return cleaned;
    }

    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse::<u128>().ok()
    };

    parsed.map(|v| v.to_string()).unwrap_or(cleaned)
}

/// Render a float literal in shortest round-trip form (`1e3` → `1000.0`).
pub fn render_float(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if cleaned.ends_with(['j', 'J']) {
        return cleaned;
    }
    let Ok(value) = cleaned.parse::<f64>() else {
        return cleaned;
    };
    if !value.is_finite() {
        return "inf".to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // `1e20` / `1.5e-7` → `1e+20` / `1.5e-07`
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// Clean a docstring the way documentation tools expect.
///
/// Tabs expand to 8 columns, the first line loses leading whitespace, the
/// remaining lines lose their common indentation, and blank lines at either
/// end are dropped.
pub fn clean_docstring(raw: &str) -> String {
    let expanded: Vec<String> = raw.lines().map(expand_tabs).collect();
    if expanded.is_empty() {
        return String::new();
    }

    let margin = expanded
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    // Margin is counted in characters: indentation may be multi-byte whitespace
    let mut lines: Vec<String> = Vec::with_capacity(expanded.len());
    lines.push(expanded[0].trim_start().to_string());
    for line in expanded.iter().skip(1) {
        let dedented: String = line.chars().skip(margin).collect();
        lines.push(dedented.trim_end().to_string());
    }

    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0usize;
    for c in line.chars() {
        if c == '\t' {
            let spaces = 8 - (column % 8);
            out.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_raw() {
        assert_eq!(decode_str_literal("\"World\"").as_deref(), Some("World"));
        assert_eq!(decode_str_literal("'a\\nb'").as_deref(), Some("a\nb"));
        assert_eq!(decode_str_literal("r'a\\nb'").as_deref(), Some("a\\nb"));
        assert_eq!(
            decode_str_literal("\"\"\"Doc.\"\"\"").as_deref(),
            Some("Doc.")
        );
    }

    #[test]
    fn test_decode_unicode_and_octal_escapes() {
        assert_eq!(decode_str_literal("'\\u00e9'").as_deref(), Some("é"));
        assert_eq!(decode_str_literal("'\\U0001F600'").as_deref(), Some("\u{1F600}"));
        assert_eq!(decode_str_literal("'\\x41\\101'").as_deref(), Some("AA"));
        assert_eq!(decode_str_literal("'\\0'").as_deref(), Some("\0"));
        assert_eq!(decode_str_literal("'\\012x'").as_deref(), Some("\nx"));
        assert_eq!(decode_str_literal("'\\1234'").as_deref(), Some("S4"));
    }

    #[test]
    fn test_decode_keeps_named_and_malformed_escapes() {
        assert_eq!(
            decode_str_literal("'\\N{BULLET}'").as_deref(),
            Some("\\N{BULLET}")
        );
        assert_eq!(decode_str_literal("'\\u12'").as_deref(), Some("\\u12"));
        assert_eq!(decode_str_literal("'\\q'").as_deref(), Some("\\q"));
    }

    #[test]
    fn test_decode_rejects_fstring_and_bytes() {
        assert!(decode_str_literal("f'{x}'").is_none());
        assert!(decode_str_literal("b'raw'").is_none());
    }

    #[test]
    fn test_repr_str_quote_choice() {
        assert_eq!(repr_str("World"), "'World'");
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_str("say \"hi\" it's"), "'say \"hi\" it\\'s'");
        assert_eq!(repr_str("a\nb"), "'a\\nb'");
    }

    #[test]
    fn test_render_integer() {
        assert_eq!(render_integer("42"), "42");
        assert_eq!(render_integer("0x10"), "16");
        assert_eq!(render_integer("1_000"), "1000");
        assert_eq!(render_integer("0b101"), "5");
        assert_eq!(render_integer("0o17"), "15");
        assert_eq!(
            render_integer("0x1_0000_0000_0000_0000_0000_0000_0000_0000"),
            "0x100000000000000000000000000000000"
        );
    }

    #[test]
    fn test_render_float() {
        assert_eq!(render_float("1.5"), "1.5");
        assert_eq!(render_float("1e3"), "1000.0");
        assert_eq!(render_float("2."), "2.0");
        assert_eq!(render_float("1e20"), "1e+20");
        assert_eq!(render_float("1.5e-7"), "1.5e-07");
    }

    #[test]
    fn test_clean_docstring_dedents() {
        let raw = "Summary line.\n\n    Args:\n        x: value\n    ";
        assert_eq!(clean_docstring(raw), "Summary line.\n\nArgs:\n    x: value");
    }

    #[test]
    fn test_clean_docstring_multibyte_indent() {
        let raw = "Sum.\n      a\n    \u{3000}b\n    ";
        assert_eq!(clean_docstring(raw), "Sum.\n a\nb");
    }

    #[test]
    fn test_clean_docstring_leading_blank() {
        let raw = "\n    Summary.\n    ";
        assert_eq!(clean_docstring(raw), "Summary.");
    }
}
