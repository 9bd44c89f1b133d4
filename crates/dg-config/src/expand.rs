//! `${VAR}` and `${VAR:-default}` expansion in configuration values.
//!
//! An unset variable without a default is an error naming the config field.
//! Bare `$VAR` is left alone so paths containing `$` survive.

use std::borrow::Cow;
use std::env::VarError;

use crate::ConfigError;

/// Expand variables in an optional field in place.
pub(crate) fn expand_field(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    let Some(text) = value.as_deref() else {
        return Ok(());
    };
    let expanded = expand_env(text, field)?.into_owned();
    *value = Some(expanded);
    Ok(())
}

fn expand_env<'a>(value: &'a str, field: &str) -> Result<Cow<'a, str>, ConfigError> {
    if !value.contains("${") {
        return Ok(Cow::Borrowed(value));
    }
    shellexpand::env_with_context(value, |name| std::env::var(name).map(Some)).map_err(
        |err: shellexpand::LookupError<VarError>| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        },
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn expand(value: &str) -> Result<Option<String>, ConfigError> {
        let mut field = Some(value.to_owned());
        expand_field(&mut field, "output.dir")?;
        Ok(field)
    }

    #[test]
    fn test_expand_set_variable() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("DG_TEST_EXPAND_SET", "out");
        }
        assert_eq!(
            expand("${DG_TEST_EXPAND_SET}/html").unwrap().as_deref(),
            Some("out/html")
        );
        unsafe {
            std::env::remove_var("DG_TEST_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_for_unset_variable() {
        assert_eq!(
            expand("${DG_TEST_EXPAND_UNSET:-build/docs}").unwrap().as_deref(),
            Some("build/docs")
        );
    }

    #[test]
    fn test_expand_unset_variable_names_field() {
        let mut model = Some("${DG_TEST_EXPAND_MISSING}/model.json".to_owned());
        let err = expand_field(&mut model, "input.model").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("DG_TEST_EXPAND_MISSING"), "{message}");
        assert!(message.contains("input.model"), "{message}");
    }

    #[test]
    fn test_bare_dollar_and_none_untouched() {
        assert_eq!(expand("docs/$VERSION").unwrap().as_deref(), Some("docs/$VERSION"));
        let mut absent = None;
        expand_field(&mut absent, "graphs.kroki_url").unwrap();
        assert_eq!(absent, None);
    }
}
