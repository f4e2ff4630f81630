//! National identity document validation.
//!
//! [`NationalIdValidator`] is a registry from lower-cased country name to a
//! [`CountryNationalIdValidator`]. Countries without a registered strategy
//! fall back to a syntax check: letters, digits and hyphens only.
//!
//! ```ignore
//! use campus::validation::NationalIdValidator;
//!
//! let validator = NationalIdValidator::default();
//! assert!(validator.validate("12345678-5", "Chile"));
//! assert!(validator.validate("X1234567-L", "spain"));
//! assert!(validator.validate("AB-1234", "portugal"));
//! ```

pub mod chile;
pub mod spain;

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

pub use chile::ChileNationalIdValidator;
pub use spain::SpainNationalIdValidator;

static GENERIC_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]*$").expect("valid generic ID pattern"));

/// Checksum or syntax rule for one issuing country.
pub trait CountryNationalIdValidator: Send + Sync {
    fn validate(&self, national_id: &str) -> bool;
}

/// Country-keyed registry of national ID validators.
pub struct NationalIdValidator {
    validators: HashMap<String, Box<dyn CountryNationalIdValidator>>,
}

impl Default for NationalIdValidator {
    /// Registry with the Chile and Spain strategies.
    fn default() -> Self {
        Self::empty()
            .with_validator("chile", ChileNationalIdValidator)
            .with_validator("spain", SpainNationalIdValidator)
    }
}

impl std::fmt::Debug for NationalIdValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut countries: Vec<_> = self.validators.keys().collect();
        countries.sort();
        f.debug_struct("NationalIdValidator")
            .field("countries", &countries)
            .finish()
    }
}

impl NationalIdValidator {
    /// Registry with no country strategies; everything uses the fallback.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Registers (or replaces) the strategy for `country`.
    pub fn with_validator<V>(mut self, country: &str, validator: V) -> Self
    where
        V: CountryNationalIdValidator + 'static,
    {
        self.validators
            .insert(country.trim().to_lowercase(), Box::new(validator));
        self
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.validators.contains_key(&country.trim().to_lowercase())
    }

    pub fn validate(&self, national_id: &str, country: &str) -> bool {
        match self.validators.get(&country.trim().to_lowercase()) {
            Some(validator) => validator.validate(national_id),
            None => {
                debug!(country = %country, "No national ID strategy registered, using generic rule");
                GENERIC_ID_PATTERN.is_match(national_id)
            }
        }
    }
}
