//! Logging interceptor for arbitrary async operations.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::interceptor::invocation::Invocation;
use crate::observability::{Emitter, ErrorSummary};
use crate::operations::{OperationId, OperationRegistry, RegisteredOperation};

/// Wraps operations that carry metadata with start/terminal records.
///
/// Operations without metadata are awaited directly.
#[derive(Clone, Debug)]
pub struct LoggingInterceptor {
    registry: Arc<OperationRegistry>,
    emitter: Emitter,
}

impl LoggingInterceptor {
    pub fn new(registry: Arc<OperationRegistry>, emitter: Emitter) -> Self {
        Self { registry, emitter }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Emit "starting" for `operation` and hand back its terminal guard.
    pub fn begin(&self, operation: Arc<RegisteredOperation>, args: Option<Value>) -> Invocation {
        Invocation::begin(self.emitter.clone(), operation, args)
    }

    /// Run `operation` under the metadata registered for `id`.
    ///
    /// The output is returned untouched; on failure the caller receives the
    /// very same error value.
    pub async fn intercept<F, T, E>(&self, id: &OperationId, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Error + 'static,
    {
        let Some(registered) = self.registry.get(id).cloned() else {
            return operation.await;
        };
        self.observe(registered, None, operation).await
    }

    /// Like [`intercept`](Self::intercept), also recording `args` when the
    /// metadata asks for it.
    pub async fn intercept_with_args<A, F, T, E>(
        &self,
        id: &OperationId,
        args: &A,
        operation: F,
    ) -> Result<T, E>
    where
        A: Serialize + ?Sized,
        F: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Error + 'static,
    {
        let Some(registered) = self.registry.get(id).cloned() else {
            return operation.await;
        };
        let args = if registered.metadata.records_args() {
            to_loggable(args)
        } else {
            None
        };
        self.observe(registered, args, operation).await
    }

    async fn observe<F, T, E>(
        &self,
        registered: Arc<RegisteredOperation>,
        args: Option<Value>,
        operation: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Error + 'static,
    {
        let records_result = registered.metadata.records_result();
        let invocation = self.begin(registered, args);

        match operation.await {
            Ok(value) => {
                let result = if records_result {
                    to_loggable(&value)
                } else {
                    None
                };
                invocation.complete(result);
                Ok(value)
            }
            Err(err) => {
                invocation.fail(ErrorSummary::from_error(&err));
                Err(err)
            }
        }
    }
}

/// Serialized copy for a record; serialization failures drop the field.
pub(crate) fn to_loggable<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Value not serializable, omitting from record");
            None
        }
    }
}
