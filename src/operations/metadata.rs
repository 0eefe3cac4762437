//! Per-operation logging metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logging options attached to one operation.
///
/// Every field is optional on the wire; missing flags are `false` and a
/// missing name falls back to the derived `component.handler` name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationMetadata {
    /// Overrides the derived operation name.
    pub operation: Option<String>,
    /// Never record arguments or results, whatever the include flags say.
    pub sensitive: bool,
    pub include_args: bool,
    pub include_result: bool,
}

impl OperationMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn include_args(mut self) -> Self {
        self.include_args = true;
        self
    }

    pub fn include_result(mut self) -> Self {
        self.include_result = true;
        self
    }

    pub fn records_args(&self) -> bool {
        self.include_args && !self.sensitive
    }

    pub fn records_result(&self) -> bool {
        self.include_result && !self.sensitive
    }
}

/// Stable identity of a handler: the component it belongs to and its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId {
    pub component: &'static str,
    pub handler: &'static str,
}

impl OperationId {
    pub const fn new(component: &'static str, handler: &'static str) -> Self {
        Self { component, handler }
    }

    /// Conventional `component.handler` name.
    pub fn derived_name(&self) -> String {
        format!("{}.{}", self.component, self.handler)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_safe_values() {
        let meta: OperationMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, OperationMetadata::default());
        assert!(!meta.records_args());
        assert!(!meta.records_result());

        let meta: OperationMetadata =
            serde_json::from_str(r#"{"operation":"get-hello","includeResult":true}"#).unwrap();
        assert_eq!(meta.operation.as_deref(), Some("get-hello"));
        assert!(meta.records_result());
        assert!(!meta.sensitive);
    }

    #[test]
    fn test_sensitive_suppresses_includes() {
        let meta = OperationMetadata::named("login")
            .include_args()
            .include_result()
            .sensitive();
        assert!(!meta.records_args());
        assert!(!meta.records_result());
    }

    #[test]
    fn test_derived_name() {
        let id = OperationId::new("AppController", "get_hello");
        assert_eq!(id.derived_name(), "AppController.get_hello");
        assert_eq!(id.to_string(), "AppController.get_hello");
    }
}
