use async_trait::async_trait;

/// Events mirrored to the external status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    RetrievalOk,
    RetrievalFailed,
    Incoming,
    Outgoing,
    NotificationFired,
    SendFailed,
}

/// Fire-and-forget observer for status events.
///
/// Emissions are spawned as their own tasks and never awaited by the
/// scheduler; a slow or failing implementation cannot stall a tick.
#[async_trait]
pub trait StatusSignal: Send + Sync + 'static {
    async fn emit(&self, event: StatusEvent);
}

/// Default observer used when no indicator hardware is wired up.
pub struct LogStatusSignal;

#[async_trait]
impl StatusSignal for LogStatusSignal {
    async fn emit(&self, event: StatusEvent) {
        log::debug!("Status signal. [event = {:?}]", event);
    }
}
