//! Operation registry.
//!
//! # Responsibilities
//! - Attach metadata to operation identities at startup
//! - Bind HTTP routes to operation identities
//! - Answer lookups at invocation time
//!
//! # Design Decisions
//! - Built with explicit calls, then frozen behind `Arc` (lock-free reads)
//! - Operation names resolved once at registration
//! - Absent entry means "do not intercept"

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;

use crate::operations::metadata::{OperationId, OperationMetadata};

/// A registered operation with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredOperation {
    pub id: OperationId,
    pub name: String,
    pub metadata: OperationMetadata,
}

impl RegisteredOperation {
    fn new(id: OperationId, metadata: OperationMetadata) -> Self {
        let name = metadata
            .operation
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id.derived_name());
        Self { id, name, metadata }
    }
}

#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: HashMap<OperationId, Arc<RegisteredOperation>>,
    routes: HashMap<(Method, String), OperationId>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `metadata` to `id`. A later registration of the same id replaces it.
    pub fn register(mut self, id: OperationId, metadata: OperationMetadata) -> Self {
        if self.operations.contains_key(&id) {
            tracing::warn!(operation = %id, "Operation registered twice, keeping the last metadata");
        }
        self.operations
            .insert(id, Arc::new(RegisteredOperation::new(id, metadata)));
        self
    }

    /// Bind `method path` (the route pattern, e.g. `/users/{id}`) to `id`.
    pub fn route(mut self, method: Method, path: impl Into<String>, id: OperationId) -> Self {
        self.routes.insert((method, path.into()), id);
        self
    }

    pub fn get(&self, id: &OperationId) -> Option<&Arc<RegisteredOperation>> {
        self.operations.get(id)
    }

    /// Operation bound to a route pattern, if it also has metadata.
    pub fn for_route(&self, method: &Method, path: &str) -> Option<&Arc<RegisteredOperation>> {
        // Tuple keys cannot borrow, so this allocates once per lookup.
        self.routes
            .get(&(method.clone(), path.to_string()))
            .and_then(|id| self.operations.get(id))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET_HELLO: OperationId = OperationId::new("AppController", "get_hello");
    const GET_HEALTH: OperationId = OperationId::new("AppController", "get_health");
    const UNREGISTERED: OperationId = OperationId::new("AppController", "secret");

    #[test]
    fn test_lookup_resolves_names() {
        let registry = OperationRegistry::new()
            .register(GET_HELLO, OperationMetadata::named("get-hello"))
            .register(GET_HEALTH, OperationMetadata::new());

        assert_eq!(registry.get(&GET_HELLO).unwrap().name, "get-hello");
        assert_eq!(
            registry.get(&GET_HEALTH).unwrap().name,
            "AppController.get_health"
        );
        assert!(registry.get(&UNREGISTERED).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_blank_override_uses_derived_name() {
        let registry = OperationRegistry::new().register(GET_HELLO, OperationMetadata::named("  "));
        assert_eq!(registry.get(&GET_HELLO).unwrap().name, "AppController.get_hello");
    }

    #[test]
    fn test_route_lookup() {
        let registry = OperationRegistry::new()
            .register(GET_HELLO, OperationMetadata::named("get-hello"))
            .route(Method::GET, "/", GET_HELLO)
            .route(Method::GET, "/secret", UNREGISTERED);

        assert_eq!(
            registry.for_route(&Method::GET, "/").unwrap().id,
            GET_HELLO
        );
        assert!(registry.for_route(&Method::POST, "/").is_none());
        // Bound but without metadata: not intercepted.
        assert!(registry.for_route(&Method::GET, "/secret").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = OperationRegistry::new()
            .register(GET_HELLO, OperationMetadata::named("first"))
            .register(GET_HELLO, OperationMetadata::named("second").include_result());
        let op = registry.get(&GET_HELLO).unwrap();
        assert_eq!(op.name, "second");
        assert!(op.metadata.include_result);
        assert_eq!(registry.len(), 1);
    }
}
