//! Chilean RUT/RUN check digit.
//!
//! Format `^\d{7,8}-[\dK]$`. Digits are weighted `2,3,4,5,6,7,2,3,...`
//! starting from the least significant one; the check value is
//! `11 - (sum mod 11)`, written `K` for 10 and `0` for 11.

use regex::Regex;
use std::sync::LazyLock;

use super::CountryNationalIdValidator;

static CHILE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7,8}-[\dK]$").expect("valid Chile ID pattern"));

const SERIES: [u32; 6] = [2, 3, 4, 5, 6, 7];
const REMAINDER_DIVISOR: u32 = 11;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChileNationalIdValidator;

impl CountryNationalIdValidator for ChileNationalIdValidator {
    fn validate(&self, national_id: &str) -> bool {
        if !CHILE_ID_PATTERN.is_match(national_id) {
            return false;
        }
        let Some((digits, check)) = national_id.split_once('-') else {
            return false;
        };
        match digits.parse::<u32>() {
            Ok(body) => check.starts_with(check_character(body)),
            Err(_) => false,
        }
    }
}

/// Check character for a RUT body.
pub fn check_character(body: u32) -> char {
    let mut sum = 0;
    let mut rest = body;
    let mut i = 0;
    while rest > 0 {
        sum += (rest % 10) * SERIES[i % SERIES.len()];
        rest /= 10;
        i += 1;
    }

    match REMAINDER_DIVISOR - (sum % REMAINDER_DIVISOR) {
        10 => 'K',
        11 => '0',
        n => char::from_digit(n, 10).unwrap_or('0'),
    }
}
