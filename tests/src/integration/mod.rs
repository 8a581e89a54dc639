//! Cross-partition integration tests.

pub mod flows;
pub mod notifications;

use std::sync::Arc;

use console_channel::InMemoryChannel;
use console_gateway::ScriptedGateway;
use console_partitions::IsoLabels;
use console_runtime::assemble_store;
use console_store::{CapturingErrorSink, MemoryPrefStore, RootStore};

/// Everything a flow test needs to drive and observe the store.
pub struct Harness {
    pub store: Arc<RootStore>,
    pub gateway: Arc<ScriptedGateway>,
    pub channel: Arc<InMemoryChannel>,
    pub prefs: Arc<MemoryPrefStore>,
    pub sink: Arc<CapturingErrorSink>,
}

impl Harness {
    /// Full store over scripted/in-memory seams.
    pub fn new() -> Self {
        Self::with_prefs(Arc::new(MemoryPrefStore::new()))
    }

    /// Same, but with a pre-seeded preference store.
    pub fn with_prefs(prefs: Arc<MemoryPrefStore>) -> Self {
        let gateway = Arc::new(ScriptedGateway::new());
        let channel = Arc::new(InMemoryChannel::new());
        let sink = Arc::new(CapturingErrorSink::new());

        let store = assemble_store(
            gateway.clone(),
            channel.clone(),
            prefs.clone(),
            Arc::new(IsoLabels),
            sink.clone(),
        )
        .expect("assembly must succeed");

        Self {
            store,
            gateway,
            channel,
            prefs,
            sink,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
