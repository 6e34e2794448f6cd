//! Secret name validation.
//!
//! Secret names end up inside `${{ secrets.NAME }}` expressions and as
//! environment variable names, so they are restricted to `[A-Za-z0-9_]+`.

use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static SECRET_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").ok());

/// Check a single secret name against the GitHub naming grammar
#[must_use]
pub fn is_valid_secret_name(name: &str) -> bool {
    SECRET_NAME.as_ref().is_some_and(|re| re.is_match(name))
}

/// Validate every secret name, failing on the first invalid one.
///
/// # Errors
///
/// Returns [`Error::InvalidSecretName`] naming the first offending entry.
pub fn validate_secret_names<I, S>(names: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for name in names {
        let name = name.as_ref();
        if !is_valid_secret_name(name) {
            tracing::debug!(secret = %name, "Rejected secret name");
            return Err(Error::invalid_secret_name(name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_typical_names() {
        assert!(validate_secret_names(["DAGGER_CLOUD_TOKEN", "gh_token", "A1", "_"]).is_ok());
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert!(validate_secret_names(Vec::<String>::new()).is_ok());
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = validate_secret_names([""]).unwrap_err();
        assert!(matches!(err, Error::InvalidSecretName { name } if name.is_empty()));
    }

    #[test]
    fn test_reports_first_offender() {
        let err = validate_secret_names(["OK", "BAD-ONE", "ALSO BAD"]).unwrap_err();
        match err {
            Error::InvalidSecretName { name } => assert_eq!(name, "BAD-ONE"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_expression_injection() {
        assert!(!is_valid_secret_name("X }}${{ github.token"));
        assert!(!is_valid_secret_name("TOKEN\n"));
        assert!(!is_valid_secret_name("TÖKEN"));
    }

    proptest! {
        #[test]
        fn prop_grammar_names_are_accepted(name in "[A-Za-z0-9_]{1,40}") {
            prop_assert!(validate_secret_names([&name]).is_ok());
        }

        #[test]
        fn prop_foreign_character_is_rejected_verbatim(
            prefix in "[A-Za-z0-9_]{0,10}",
            bad in "[^A-Za-z0-9_]",
            suffix in "[A-Za-z0-9_]{0,10}",
        ) {
            let name = format!("{prefix}{bad}{suffix}");
            match validate_secret_names([&name]) {
                Err(Error::InvalidSecretName { name: reported }) => prop_assert_eq!(reported, name),
                other => prop_assert!(false, "expected rejection, got {:?}", other),
            }
        }
    }
}
