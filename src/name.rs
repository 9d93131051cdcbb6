//! Validated names for categories and payment methods.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A trimmed, non-empty name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Name(String);

impl Name {
    /// Create a name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a name without validation.
    ///
    /// The caller should ensure that the string is not empty, e.g. when it
    /// was read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, name::Name};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Name::new(""), Err(Error::EmptyName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(Name::new("\n\t \r"), Err(Error::EmptyName));
    }

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(Name::new("  Food "), Ok(Name::new_unchecked("Food")));
    }
}
