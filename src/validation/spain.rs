//! Spanish DNI / NIE control letter.
//!
//! Format `^[XYZ]?\d{7,8}-[A-Z]$`. A NIE prefix stands for a leading digit
//! (`X` = 0, `Y` = 1, `Z` = 2) in front of the next seven digits; a DNI uses
//! its eight digits directly. The control letter is
//! `TRWAGMYFPDXBNJZSQVHLCKE[n mod 23]`.

use regex::Regex;
use std::sync::LazyLock;

use super::CountryNationalIdValidator;

static SPAIN_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[XYZ]?\d{7,8}-[A-Z]$").expect("valid Spain ID pattern"));

const SPAIN_ID_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";
const LETTER_INDEX_DIVISOR: u32 = 23;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpainNationalIdValidator;

impl CountryNationalIdValidator for SpainNationalIdValidator {
    fn validate(&self, national_id: &str) -> bool {
        if !SPAIN_ID_PATTERN.is_match(national_id) {
            return false;
        }
        let Some((body, letter)) = national_id.split_once('-') else {
            return false;
        };
        match dni_number(body) {
            Some(number) => letter.starts_with(control_letter(number)),
            None => false,
        }
    }
}

/// Numeric value of the document body. NIE bodies use the seven digits after
/// the prefix; DNI bodies must have exactly eight digits.
fn dni_number(body: &str) -> Option<u32> {
    let (offset, digits) = match body.as_bytes().first()? {
        b'X' => (0, body.get(1..8)?),
        b'Y' => (10_000_000, body.get(1..8)?),
        b'Z' => (20_000_000, body.get(1..8)?),
        _ if body.len() == 8 => (0, body),
        _ => return None,
    };
    digits.parse::<u32>().ok().map(|n| offset + n)
}

/// Control letter for a DNI number (NIE prefix already folded in).
pub fn control_letter(number: u32) -> char {
    SPAIN_ID_LETTERS[(number % LETTER_INDEX_DIVISOR) as usize] as char
}
