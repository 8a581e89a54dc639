//! Root-store assembly.
//!
//! All six partitions registered against their seams. The seams come in as
//! trait objects so hosts and tests pick their own transports.

use std::sync::Arc;

use console_channel::{PushChannel, WebSocketChannel};
use console_gateway::{ApiGateway, HttpGateway};
use console_partitions::{
    AccountInfoPartition, DictionariesPartition, IsoLabels, LabelProvider, MerchantPartition,
    NotificationsPartition, PaymentMethodPartition, ProjectPartition,
};
use console_store::{ErrorSink, FilePrefStore, PageErrorSink, PrefStore, RootStore, StoreError};

use crate::ConsoleConfig;

/// Register every partition with the root store.
pub fn assemble_store(
    gateway: Arc<dyn ApiGateway>,
    channel: Arc<dyn PushChannel>,
    prefs: Arc<dyn PrefStore>,
    labels: Arc<dyn LabelProvider>,
    error_sink: Arc<dyn ErrorSink>,
) -> Result<Arc<RootStore>, StoreError> {
    Ok(RootStore::builder()
        .error_sink(error_sink)
        .register(Arc::new(MerchantPartition::new()))?
        .register(Arc::new(AccountInfoPartition::new(gateway.clone())))?
        .register(Arc::new(NotificationsPartition::new(
            gateway.clone(),
            channel,
        )))?
        .register(Arc::new(DictionariesPartition::new(
            gateway.clone(),
            labels,
        )))?
        .register(Arc::new(ProjectPartition::new(gateway.clone(), prefs)))?
        .register(Arc::new(PaymentMethodPartition::new(gateway)))?
        .build())
}

/// Assemble against the live platform described by `config`.
pub fn live_store(config: &ConsoleConfig) -> Result<Arc<RootStore>, StoreError> {
    let gateway: Arc<dyn ApiGateway> = Arc::new(HttpGateway::new(config.api_url.clone())?);
    let channel: Arc<dyn PushChannel> =
        Arc::new(WebSocketChannel::new(config.websocket_url.clone()));
    let prefs: Arc<dyn PrefStore> = Arc::new(FilePrefStore::new(&config.prefs_path));

    assemble_store(
        gateway,
        channel,
        prefs,
        Arc::new(IsoLabels),
        Arc::new(PageErrorSink::new()),
    )
}
