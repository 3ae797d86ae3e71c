pub mod channel;
pub mod jsonl;
pub mod text;

pub use channel::ChannelRendererPlugin;
pub use jsonl::JsonlRendererPlugin;
pub use text::TextRendererPlugin;
