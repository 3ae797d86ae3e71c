use cisrun_core::executor::traits::{OutputRendererPlugin, RenderEvent};
use tokio::sync::mpsc;

/// Forwards every event to a channel, for front-ends that draw results themselves.
pub struct ChannelRendererPlugin {
    tx: mpsc::UnboundedSender<RenderEvent>,
}

impl ChannelRendererPlugin {
    pub fn new(tx: mpsc::UnboundedSender<RenderEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl OutputRendererPlugin for ChannelRendererPlugin {
    fn name(&self) -> &str {
        "channel-renderer"
    }

    fn format(&self) -> &str {
        "events"
    }

    fn render(&self, event: &RenderEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(event = event.kind(), "render event receiver dropped");
        }
    }
}
