//! Cross-reference resolution.

/// Where a resolved reference points to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkTarget {
    /// Output file base name (no extension).
    pub file: String,
    /// Anchor within the file; empty for the file itself.
    pub anchor: String,
    /// Base URL of the external project the target belongs to.
    pub external: Option<String>,
}

impl LinkTarget {
    #[must_use]
    pub fn new(file: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            anchor: anchor.into(),
            external: None,
        }
    }

    /// Hyperlink reference for file-based formats.
    ///
    /// Local targets are prefixed with `rel_path`, external ones with their
    /// project URL.
    #[must_use]
    pub fn href(&self, extension: &str, rel_path: &str) -> String {
        let mut href = match &self.external {
            Some(url) => format!("{}/{}{extension}", url.trim_end_matches('/'), self.file),
            None => format!("{rel_path}{}{extension}", self.file),
        };
        if !self.anchor.is_empty() {
            href.push('#');
            href.push_str(&self.anchor);
        }
        href
    }

    /// Single identifier for formats with document-wide labels (`LaTeX`, `DocBook`).
    #[must_use]
    pub fn label(&self) -> String {
        if self.anchor.is_empty() {
            self.file.clone()
        } else {
            format!("{}_{}", self.file, self.anchor)
        }
    }
}

/// Resolves names found in documentation and source code to link targets.
pub trait LinkResolver {
    /// Target for `name`, if it denotes a linkable entity.
    fn resolve(&self, name: &str) -> Option<LinkTarget>;
}

/// Resolver that never resolves anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLinks;

impl LinkResolver for NoLinks {
    fn resolve(&self, _name: &str) -> Option<LinkTarget> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_local_with_anchor() {
        let target = LinkTarget::new("classWidget", "a1f3");
        assert_eq!(target.href(".html", "../"), "../classWidget.html#a1f3");
    }

    #[test]
    fn test_href_external_ignores_rel_path() {
        let target = LinkTarget {
            external: Some("https://docs.example.org/".to_owned()),
            ..LinkTarget::new("classRemote", "")
        };
        assert_eq!(
            target.href(".html", "../"),
            "https://docs.example.org/classRemote.html"
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(LinkTarget::new("classWidget", "").label(), "classWidget");
        assert_eq!(LinkTarget::new("classWidget", "a1f3").label(), "classWidget_a1f3");
    }
}
