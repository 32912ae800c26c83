//! Strict `application/x-www-form-urlencoded` decoding.
//!
//! Unlike lossy decoders, malformed percent escapes, `;` separators and
//! non-UTF-8 content are reported as errors so the caller can reject the
//! request.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("invalid percent escape at byte {0}")]
    InvalidEscape(usize),

    #[error("invalid semicolon separator")]
    Semicolon,

    #[error("form data is not valid UTF-8")]
    InvalidUtf8,
}

/// Decoded form pairs in the order they appeared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn from_bytes(raw: &[u8]) -> Result<Self, FormError> {
        let input = std::str::from_utf8(raw).map_err(|_| FormError::InvalidUtf8)?;
        Self::parse(input)
    }

    pub fn parse(input: &str) -> Result<Self, FormError> {
        let mut pairs = Vec::new();
        let mut offset = 0;
        for segment in input.split('&') {
            let start = offset;
            offset += segment.len() + 1;
            if segment.is_empty() {
                continue;
            }
            if segment.contains(';') {
                return Err(FormError::Semicolon);
            }
            check_escapes(segment, start)?;

            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            pairs.push((decode_component(key)?, decode_component(value)?));
        }
        Ok(Self { pairs })
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn check_escapes(segment: &str, start: usize) -> Result<(), FormError> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(FormError::InvalidEscape(start + i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn decode_component(raw: &str) -> Result<String, FormError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| FormError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pairs() {
        let form = FormFields::parse("status=success&order=42").unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("status"), Some("success"));
        assert_eq!(form.get("order"), Some("42"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_first_value_wins() {
        let form = FormFields::parse("status=failed&status=success").unwrap();
        assert_eq!(form.get("status"), Some("failed"));
    }

    #[test]
    fn test_decodes_plus_and_escapes() {
        let form = FormFields::parse("note=hello+world%21&k%C3%A9y=v").unwrap();
        assert_eq!(form.get("note"), Some("hello world!"));
        assert_eq!(form.get("kéy"), Some("v"));
    }

    #[test]
    fn test_key_without_value_and_empty_segments() {
        let form = FormFields::parse("&&status&&").unwrap();
        assert_eq!(form.len(), 1);
        assert_eq!(form.get("status"), Some(""));
    }

    #[test]
    fn test_empty_input() {
        assert!(FormFields::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_escape() {
        assert_eq!(
            FormFields::parse("status=succ%zzess"),
            Err(FormError::InvalidEscape(11))
        );
        assert_eq!(
            FormFields::parse("a=1&status=%4"),
            Err(FormError::InvalidEscape(11))
        );
        assert!(FormFields::parse("status=%").is_err());
    }

    #[test]
    fn test_rejects_semicolon() {
        assert_eq!(
            FormFields::parse("status=success;x=1"),
            Err(FormError::Semicolon)
        );
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert_eq!(
            FormFields::from_bytes(&[0xff, 0xfe, b'=', b'1']),
            Err(FormError::InvalidUtf8)
        );
        assert_eq!(
            FormFields::parse("status=%ff%fe"),
            Err(FormError::InvalidUtf8)
        );
    }
}
