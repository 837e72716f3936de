//! The first rule violation found in an instance.

use std::fmt;

/// A failed rule, reported the same way generated validators report it.
///
/// Embedded message failures carry the nested violation as `cause`; the
/// outer reason is then `embedded message failed validation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name, qualified by index or key inside containers (`tags[2]`).
    pub field_path: String,
    pub reason: String,
    pub cause: Option<Box<Violation>>,
    /// The failure is about a map key rather than a value.
    pub is_key: bool,
}

impl Violation {
    pub fn new(field_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            reason: reason.into(),
            cause: None,
            is_key: false,
        }
    }

    pub fn on_key(mut self, is_key: bool) -> Self {
        self.is_key = is_key;
        self
    }

    pub fn caused_by(mut self, cause: Violation) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Path from the validated message to the innermost failing field,
    /// e.g. `items[3].sku`.
    pub fn full_path(&self) -> String {
        match &self.cause {
            Some(cause) => format!("{}.{}", self.field_path, cause.full_path()),
            None => self.field_path.clone(),
        }
    }

    /// The innermost violation.
    pub fn root_cause(&self) -> &Violation {
        match &self.cause {
            Some(cause) => cause.root_cause(),
            None => self,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.is_key { "key for " } else { "" };
        write!(f, "invalid {key}{}: {}", self.field_path, self.reason)?;
        if let Some(cause) = &self.cause {
            write!(f, " | caused by: {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_path_follows_causes() {
        let v = Violation::new("items[3]", "embedded message failed validation")
            .caused_by(Violation::new("sku", "value does not have prefix \"SKU-\""));
        assert_eq!(v.full_path(), "items[3].sku");
        assert_eq!(v.root_cause().field_path, "sku");
        insta::assert_snapshot!(v, @r#"invalid items[3]: embedded message failed validation | caused by: invalid sku: value does not have prefix "SKU-""#);
    }

    #[test]
    fn key_violations() {
        let v = Violation::new("labels[x]", "value length must be at least 2 runes").on_key(true);
        assert_eq!(v.to_string(), "invalid key for labels[x]: value length must be at least 2 runes");
    }
}
