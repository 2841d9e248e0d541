//! Branch names
//!
//! A branch ref is a validated name paired (in the ref store) with the id of
//! the commit it designates. Names are flat: no path separators, no control
//! characters, no leading dot.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty()
            || name.starts_with('.')
            || name
                .chars()
                .any(|c| c.is_control() || c == '/' || c == '\\' || c.is_whitespace())
        {
            return Err(Error::InvalidBranchName(name));
        }

        Ok(BranchName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn alphanumeric_names_are_valid(name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(name).is_ok());
        }

        #[test]
        fn names_with_separators_are_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
        ) {
            let name = format!("{prefix}/{suffix}");
            assert!(BranchName::try_parse(name).is_err());
        }

        #[test]
        fn names_starting_with_dot_are_invalid(suffix in "[a-zA-Z0-9_-]+") {
            let name = format!(".{suffix}");
            assert!(BranchName::try_parse(name).is_err());
        }
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(BranchName::try_parse("").is_err());
    }

    #[test]
    fn whitespace_is_invalid() {
        assert!(BranchName::try_parse("my branch").is_err());
    }
}
