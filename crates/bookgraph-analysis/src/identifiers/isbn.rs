use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use bookgraph_core::clean_isbn;

/// A checksum-validated ISBN, always carrying its 13-digit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isbn {
    pub isbn13: String,
    /// Only `978`-prefixed ISBN-13s have a 10-digit form.
    pub isbn10: Option<String>,
}

impl Isbn {
    /// Parse an ISBN-10 or ISBN-13, ignoring hyphens, spaces and labels.
    pub fn parse(input: &str) -> Result<Self> {
        let cleaned = clean_isbn(input);
        let invalid = || AnalysisError::InvalidIsbn(input.to_string());

        match cleaned.len() {
            13 => {
                let digits = decimal_digits(&cleaned).ok_or_else(invalid)?;
                if isbn13_check(&digits[..12]) != digits[12] {
                    return Err(invalid());
                }
                let isbn10 = cleaned
                    .starts_with("978")
                    .then(|| with_isbn10_check(&digits[3..12]));
                Ok(Self { isbn13: cleaned, isbn10 })
            }
            10 => {
                let body = decimal_digits(&cleaned[..9]).ok_or_else(invalid)?;
                if with_isbn10_check(&body) != cleaned {
                    return Err(invalid());
                }
                Ok(Self {
                    isbn13: with_isbn13_check(&body),
                    isbn10: Some(cleaned),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// True when both strings parse to the same ISBN, in either form.
    pub fn equivalent(a: &str, b: &str) -> bool {
        match (Self::parse(a), Self::parse(b)) {
            (Ok(a), Ok(b)) => a.isbn13 == b.isbn13,
            _ => false,
        }
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.isbn13)
    }
}

fn decimal_digits(s: &str) -> Option<Vec<u32>> {
    s.chars().map(|c| c.to_digit(10)).collect()
}

fn isbn13_check(first12: &[u32]) -> u32 {
    let sum: u32 = first12
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10
}

/// `978` + nine body digits + ISBN-13 check digit.
fn with_isbn13_check(body9: &[u32]) -> String {
    let mut digits = vec![9, 7, 8];
    digits.extend_from_slice(body9);
    let check = isbn13_check(&digits);
    digits.push(check);
    digits.iter().map(u32::to_string).collect()
}

/// Nine body digits + ISBN-10 check character (`X` for ten).
fn with_isbn10_check(body9: &[u32]) -> String {
    let sum: u32 = body9
        .iter()
        .enumerate()
        .map(|(i, d)| (10 - i as u32) * d)
        .sum();
    let check = (11 - sum % 11) % 11;
    let mut out: String = body9.iter().map(u32::to_string).collect();
    out.push(if check == 10 { 'X' } else { char::from(b'0' + check as u8) });
    out
}
