use anyhow::{bail, Result};

// Character classes of the simple (ASCII) alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Vowel,
    Consonant,
    Digit,
    Punctuation,
    Other,
}

impl CharType {
    pub fn from(c: char) -> Self {
        match c {
            'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'A' | 'E' | 'I' | 'O' | 'U' | 'Y' => Self::Vowel,
            'a'..='z' | 'A'..='Z' => Self::Consonant,
            '0'..='9' => Self::Digit,
            '.' | ',' | ':' | ';' | '!' | '?' | '/' | '-' | '\'' => Self::Punctuation,
            _ => Self::Other,
        }
    }
}

pub fn parse_number(s: &str) -> Result<usize> {
    if s.is_empty() {
        bail!("Failed to parse empty number");
    }

    let mut ret: usize = 0;
    for c in s.chars() {
        let d = match c.to_digit(10) {
            Some(d) => d as usize,
            None => bail!("Failed to parse {:?}", s),
        };

        ret = match ret.checked_mul(10).and_then(|r| r.checked_add(d)) {
            Some(r) => r,
            None => bail!("Number too large: {:?}", s),
        };
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_latin_letters() {
        assert_eq!(CharType::from('a'), CharType::Vowel);
        assert_eq!(CharType::from('Y'), CharType::Vowel);
        assert_eq!(CharType::from('t'), CharType::Consonant);
        assert_eq!(CharType::from('7'), CharType::Digit);
        assert_eq!(CharType::from('/'), CharType::Punctuation);
        assert_eq!(CharType::from('ſ'), CharType::Other);
    }

    #[test]
    fn parses_ascii_numbers() {
        assert_eq!(parse_number("0").unwrap(), 0);
        assert_eq!(parse_number("128").unwrap(), 128);
        assert!(parse_number("").is_err());
        assert!(parse_number("12a").is_err());
    }
}
