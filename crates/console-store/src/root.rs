//! Root store: namespace table, path resolution, and the per-call context.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::{debug, info};

use crate::sink::{ErrorSink, PageErrorSink};
use crate::{Partition, StoreError, INIT_STATE};

/// Split `<Namespace>/<operation>` deterministically.
///
/// Namespaces contain dots (`User.Merchant`), so the operation separator is
/// `/` and resolution never guesses by prefix.
fn split_path(path: &str) -> Result<(&str, &str), StoreError> {
    match path.split_once('/') {
        Some((ns, op)) if !ns.is_empty() && !op.is_empty() => Ok((ns, op)),
        _ => Err(StoreError::InvalidPath(path.to_string())),
    }
}

/// Assembles a [`RootStore`], failing fast on duplicate namespaces.
pub struct RootStoreBuilder {
    partitions: HashMap<String, Arc<dyn Partition>>,
    error_sink: Arc<dyn ErrorSink>,
}

impl RootStoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            partitions: HashMap::new(),
            error_sink: Arc::new(PageErrorSink::new()),
        }
    }

    /// Replace the root error sink (tests substitute a capturing fake).
    #[must_use]
    pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }

    /// Register a partition under its namespace.
    pub fn register(mut self, partition: Arc<dyn Partition>) -> Result<Self, StoreError> {
        let namespace = partition.namespace().to_string();
        if self.partitions.contains_key(&namespace) {
            return Err(StoreError::DuplicateNamespace(namespace));
        }
        info!(%namespace, "registering partition");
        self.partitions.insert(namespace, partition);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> Arc<RootStore> {
        Arc::new_cyclic(|handle| RootStore {
            partitions: self.partitions,
            error_sink: self.error_sink,
            self_handle: handle.clone(),
        })
    }
}

impl Default for RootStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The partition registry and root-scoped call resolver.
///
/// Holds no domain state: only the namespace table and the error sink.
pub struct RootStore {
    partitions: HashMap<String, Arc<dyn Partition>>,
    error_sink: Arc<dyn ErrorSink>,
    /// Weak handle to the owning `Arc`, set at build time, used to hand
    /// partitions a [`Context`] that can issue root-scoped calls.
    self_handle: Weak<RootStore>,
}

impl RootStore {
    #[must_use]
    pub fn builder() -> RootStoreBuilder {
        RootStoreBuilder::new()
    }

    fn partition(&self, namespace: &str) -> Result<&Arc<dyn Partition>, StoreError> {
        self.partitions
            .get(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))
    }

    /// Registered namespaces, for diagnostics.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.partitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The root error sink.
    #[must_use]
    pub fn error_sink(&self) -> &Arc<dyn ErrorSink> {
        &self.error_sink
    }

    fn context_for(&self, namespace: &str) -> Context {
        // The handle is set at build time and every call site reaches this
        // method through the owning Arc, so the upgrade cannot fail.
        let root = self
            .self_handle
            .upgrade()
            .expect("self-handle valid while the store is alive");
        Context {
            root,
            namespace: namespace.to_string(),
        }
    }

    /// Dispatch an async action by full path (`User.Merchant/changeMerchant`).
    pub async fn dispatch(&self, path: &str, payload: Value) -> Result<Value, StoreError> {
        let (namespace, action) = split_path(path)?;
        let partition = Arc::clone(self.partition(namespace)?);
        debug!(%namespace, %action, "dispatch");
        let ctx = self.context_for(namespace);
        partition.handle_action(ctx, action, payload).await
    }

    /// Apply a synchronous mutation by full path.
    pub fn commit(&self, path: &str, payload: Value) -> Result<(), StoreError> {
        let (namespace, mutation) = split_path(path)?;
        debug!(%namespace, %mutation, "commit");
        self.partition(namespace)?.handle_mutation(mutation, payload)
    }

    /// Evaluate a derived getter by full path.
    pub fn getter(&self, path: &str) -> Result<Value, StoreError> {
        let (namespace, getter) = split_path(path)?;
        self.partition(namespace)?.getter(getter)
    }

    /// Uniform bootstrap entrypoint: dispatches `<namespace>/initState`.
    pub async fn bootstrap(&self, namespace: &str, args: Value) -> Result<Value, StoreError> {
        self.dispatch(&format!("{namespace}/{INIT_STATE}"), args).await
    }
}

/// Per-call handle a partition's actions receive.
///
/// Same-namespace calls (`dispatch`, `commit`) resolve within the calling
/// partition; the `_root` variants start resolution from the tree root and
/// are the only sanctioned cross-partition channel.
#[derive(Clone)]
pub struct Context {
    root: Arc<RootStore>,
    namespace: String,
}

impl Context {
    /// Namespace of the partition this context was issued to.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The root store, for handlers that outlive the current call (the
    /// notification delivery task commits through this).
    #[must_use]
    pub fn root(&self) -> Arc<RootStore> {
        Arc::clone(&self.root)
    }

    /// Dispatch an action within the calling partition's own namespace.
    pub async fn dispatch(&self, action: &str, payload: Value) -> Result<Value, StoreError> {
        self.root
            .dispatch(&format!("{}/{action}", self.namespace), payload)
            .await
    }

    /// Commit a mutation within the calling partition's own namespace.
    pub fn commit(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        self.root
            .commit(&format!("{}/{mutation}", self.namespace), payload)
    }

    /// Dispatch an action by full path from the tree root.
    pub async fn dispatch_root(&self, path: &str, payload: Value) -> Result<Value, StoreError> {
        self.root.dispatch(path, payload).await
    }

    /// Commit a mutation by full path from the tree root.
    pub fn commit_root(&self, path: &str, payload: Value) -> Result<(), StoreError> {
        self.root.commit(path, payload)
    }

    /// Evaluate a getter by full path from the tree root.
    pub fn getter_root(&self, path: &str) -> Result<Value, StoreError> {
        self.root.getter(path)
    }

    /// Report an unrecognized failure to the root error sink for display.
    pub fn report_error(&self, error: &StoreError) {
        self.root.error_sink.report(&self.namespace, error);
    }
}
