/// Strip a matching pair of `"` or `'` quotes and interpret escapes.
///
/// Returns `None` when the text is not a well-formed quoted literal: no
/// matching quotes, an unknown escape, or an unescaped delimiter inside.
pub fn unquote(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let quote = chars.next().filter(|&c| c == '"' || c == '\'')?;
    let inner = chars.as_str().strip_suffix(quote)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == quote {
            return None;
        }
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let unescaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => hex_char(&mut chars, 2)?,
            'u' => {
                if chars.as_str().starts_with('{') {
                    chars.next();
                    let rest = chars.as_str();
                    let end = rest.find('}')?;
                    let digits = &rest[..end];
                    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                        return None;
                    }
                    let code = u32::from_str_radix(digits, 16).ok()?;
                    chars = rest[end + 1..].chars();
                    char::from_u32(code)?
                } else {
                    hex_char(&mut chars, 4)?
                }
            }
            _ => return None,
        };
        out.push(unescaped);
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let rest = chars.as_str();
    let hex = rest.get(..digits)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let code = u32::from_str_radix(hex, 16).ok()?;
    *chars = rest[digits..].chars();
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quoted() {
        assert_eq!(unquote("\"hello world\""), Some("hello world".to_string()));
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(unquote("'hello world'"), Some("hello world".to_string()));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(unquote(r#""a\"b""#), Some("a\"b".to_string()));
        assert_eq!(unquote(r#""tab\there""#), Some("tab\there".to_string()));
        assert_eq!(unquote(r#""\x41é\u{1F600}""#), Some("Aé😀".to_string()));
        assert_eq!(unquote(r#"'it\'s'"#), Some("it's".to_string()));
    }

    #[test]
    fn test_empty_literal() {
        assert_eq!(unquote("\"\""), Some(String::new()));
    }

    #[test]
    fn test_not_quoted() {
        assert_eq!(unquote("hello"), None);
        assert_eq!(unquote("\"hello"), None);
        assert_eq!(unquote("\"hello'"), None);
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote(""), None);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(unquote(r#""a"b""#), None);
        assert_eq!(unquote(r#""^10\.""#), None);
        assert_eq!(unquote(r#""\x4""#), None);
        assert_eq!(unquote(r#""trailing\""#), None);
    }

    #[test]
    fn test_braced_unicode_digits() {
        assert_eq!(unquote(r#""\u{41}""#), Some("A".to_string()));
        assert_eq!(unquote(r#""\u{+41}""#), None);
        assert_eq!(unquote(r#""\u{}""#), None);
        assert_eq!(unquote(r#""\u{4 1}""#), None);
    }
}
