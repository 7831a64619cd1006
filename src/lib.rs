//! `chanlog` - hierarchical channel routing and structured record rendering.
//!
//! Records are logged on dot-separated channels (`app.http.requests`). A
//! [`Router`] resolves each channel to handlers and processors by walking its
//! ancestry: processors accumulate on top of the defaults, while any explicit
//! handler entry replaces the default handlers. Handlers render records with
//! one of four renderers:
//! - [`JsonRenderer`]: one JSON object per record
//! - [`LineRenderer`]: a `%placeholder%` template on a single line
//! - [`CompactRenderer`]: a bracketed header over a small tree
//! - [`BoxedRenderer`]: a bordered block for people
//!
//! # Example
//!
//! ```
//! use chanlog::{CollectorHandler, Fields, Router};
//! use std::sync::Arc;
//!
//! let router = Router::new();
//! let audit = Arc::new(CollectorHandler::new().named("audit"));
//! router.add_channel_handler("app", audit.clone()).unwrap();
//!
//! let http = router.channel("app.http").unwrap();
//! http.set_context("request_id", "r-1");
//! http.warning("slow response", Fields::new().with("ms", 1250));
//!
//! assert_eq!(audit.messages(), vec!["slow response"]);
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `chanlog` binary

pub mod config;
mod error;
pub mod filter;
pub mod handler;
pub mod internal;
pub mod level;
pub mod logger;
pub mod normalize;
pub mod processor;
pub mod record;
pub mod registry;
pub mod render;
pub mod router;
pub mod runtime;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

pub use config::Config;
pub use error::Error;
pub use filter::{ChannelFilter, ChannelSetting, EmitFilter};
pub use handler::{
    CollectorHandler, FileHandler, Handler, JsonlRowSink, LogRow, RowHandler, RowSink,
    StreamHandler, StreamTarget,
};
pub use level::Level;
pub use logger::Logger;
pub use normalize::{FieldFilter, Normalizer};
pub use processor::{
    MemoryUsageProcessor, ProcessIdProcessor, Processor, RequestIdProcessor, TagProcessor,
};
pub use record::{Exception, Fields, Frame, Object, Record, SelfDescribing, Value};
pub use registry::Registry;
pub use render::{
    BatchMode, BoxedRenderer, CompactRenderer, JsonRenderer, LineRenderer, Renderer,
    RendererKind,
};
pub use router::{Resolved, Router};
