//! Username candidate generation.
//!
//! Candidates are built from pre-normalized name parts as
//! `name[..i] + first_surname + second_surname[..j]`, for `i` from 1 to the
//! full name and, inside that, `j` from 0 to the full second surname. Each
//! candidate is truncated to the maximum length. The first candidate missing
//! from the existing set wins; when every candidate is taken the whole
//! sequence is retried with a numeric suffix `1`, `2`, ... appended after
//! truncation.
//!
//! For `josep` / `doe` / `pou` the order is:
//!
//! ```text
//! jdoe, jdoep, jdoepo, jdoepou, jodoe, jodoep, ..., josepdoepou,
//! jdoe1, jdoep1, ..., josepdoepou1, jdoe2, ...
//! ```
//!
//! The search is deterministic and always terminates, since the existing
//! set is finite. Because the suffix is appended after truncation, a
//! suffixed username may be longer than the maximum length.

use std::collections::HashSet;

use campus_config::provisioning::USERNAME_MAX_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("{0} is empty after normalization")]
    EmptyNamePart(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameGenerator {
    max_length: usize,
}

impl Default for UsernameGenerator {
    fn default() -> Self {
        Self::new(USERNAME_MAX_LENGTH)
    }
}

impl UsernameGenerator {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the first free candidate for the given normalized name parts.
    ///
    /// `second_surname` may be empty. `existing` is a snapshot of every
    /// persisted username; the result is never a member of it.
    ///
    /// # Errors
    ///
    /// Returns [`UsernameError::EmptyNamePart`] if `name` or
    /// `first_surname` is empty.
    pub fn generate(
        &self,
        name: &str,
        first_surname: &str,
        second_surname: &str,
        existing: &HashSet<String>,
    ) -> Result<String, UsernameError> {
        if name.is_empty() {
            return Err(UsernameError::EmptyNamePart("name"));
        }
        if first_surname.is_empty() {
            return Err(UsernameError::EmptyNamePart("first_surname"));
        }

        let bases = self.base_candidates(name, first_surname, second_surname);

        let mut num: u64 = 0;
        loop {
            let suffix = if num == 0 {
                String::new()
            } else {
                num.to_string()
            };

            if let Some(username) = bases
                .iter()
                .map(|base| format!("{base}{suffix}"))
                .find(|candidate| !existing.contains(candidate))
            {
                return Ok(username);
            }

            num += 1;
        }
    }

    /// Truncated candidates in search order, without any suffix.
    fn base_candidates(&self, name: &str, first_surname: &str, second_surname: &str) -> Vec<String> {
        let name_len = name.chars().count();
        let second_len = second_surname.chars().count();

        let mut bases = Vec::with_capacity(name_len * (second_len + 1));
        for name_index in 1..=name_len {
            for second_index in 0..=second_len {
                let candidate = format!(
                    "{}{}{}",
                    prefix(name, name_index),
                    first_surname,
                    prefix(second_surname, second_index)
                );
                bases.push(prefix(&candidate, self.max_length).to_string());
            }
        }
        bases
    }
}

/// The first `len` characters of `s` (all of `s` if it is shorter).
fn prefix(s: &str, len: usize) -> &str {
    match s.char_indices().nth(len) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefix_counts_chars() {
        assert_eq!(prefix("josep", 0), "");
        assert_eq!(prefix("josep", 2), "jo");
        assert_eq!(prefix("josep", 10), "josep");
        assert_eq!(prefix("ñandú", 2), "ña");
    }

    #[test]
    fn test_base_candidates_order() {
        let generator = UsernameGenerator::default();
        let bases = generator.base_candidates("jo", "doe", "po");
        assert_eq!(
            bases,
            vec!["jdoe", "jdoep", "jdoepo", "jodoe", "jodoep", "jodoepo"]
        );
    }

    #[test]
    fn test_base_candidates_without_second_surname() {
        let generator = UsernameGenerator::default();
        assert_eq!(
            generator.base_candidates("ann", "lee", ""),
            vec!["alee", "anlee", "annlee"]
        );
    }

    #[test]
    fn test_empty_parts_rejected() {
        let generator = UsernameGenerator::default();
        assert_eq!(
            generator.generate("", "doe", "", &HashSet::new()),
            Err(UsernameError::EmptyNamePart("name"))
        );
        assert_eq!(
            generator.generate("jane", "", "", &HashSet::new()),
            Err(UsernameError::EmptyNamePart("first_surname"))
        );
    }

    #[test]
    fn test_suffix_after_exhaustion() {
        let generator = UsernameGenerator::default();
        let existing = taken(&["alee", "anlee", "annlee", "alee1"]);
        assert_eq!(generator.generate("ann", "lee", "", &existing).unwrap(), "anlee1");
    }

    #[test]
    fn test_truncation_happens_before_suffix() {
        let generator = UsernameGenerator::new(6);
        let existing = taken(&["jwolfe", "jowolf", "jonwol"]);
        // Every base truncates to a taken six-character prefix.
        let username = generator.generate("jon", "wolfeschlegel", "", &existing).unwrap();
        assert_eq!(username, "jwolfe1");
        assert_eq!(username.len(), 7);
    }
}
