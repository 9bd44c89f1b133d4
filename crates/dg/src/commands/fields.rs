//! `dg fields` command implementation.

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fields command.
#[derive(Args)]
pub(crate) struct FieldsArgs {
    /// Adapter to list, e.g. `class` or `ClassContext` (default: all).
    kind: Option<String>,
}

impl FieldsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let adapters = select(dg_context::adapter_fields(), self.kind.as_deref())?;
        for (adapter, fields) in adapters {
            output.heading(adapter);
            for field in fields {
                output.item(field);
            }
        }
        Ok(())
    }
}

/// Adapters whose name matches `kind`, case-insensitively and with or without
/// the `Context` suffix.
fn select(
    adapters: Vec<(&'static str, Vec<&'static str>)>,
    kind: Option<&str>,
) -> Result<Vec<(&'static str, Vec<&'static str>)>, CliError> {
    let Some(kind) = kind else {
        return Ok(adapters);
    };
    let selected: Vec<_> = adapters
        .into_iter()
        .filter(|(adapter, _)| {
            let short = adapter.strip_suffix("Context").unwrap_or(adapter);
            adapter.eq_ignore_ascii_case(kind) || short.eq_ignore_ascii_case(kind)
        })
        .collect();
    if selected.is_empty() {
        return Err(CliError::Validation(format!("Unknown adapter: {kind}")));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_select_all() {
        let all = dg_context::adapter_fields();
        let count = all.len();
        assert_eq!(select(all, None).unwrap().len(), count);
    }

    #[test]
    fn test_select_by_short_name() {
        let selected = select(dg_context::adapter_fields(), Some("class")).unwrap();
        let names: Vec<&str> = selected.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["ClassContext"]);
        assert!(selected[0].1.contains(&"title"));
    }

    #[test]
    fn test_select_by_full_name() {
        let selected = select(dg_context::adapter_fields(), Some("membercontext")).unwrap();
        assert_eq!(selected[0].0, "MemberContext");
    }

    #[test]
    fn test_select_unknown() {
        let err = select(dg_context::adapter_fields(), Some("widget")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown adapter: widget");
    }
}
