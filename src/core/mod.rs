pub mod captions;
pub mod config;
pub mod slides;
pub mod video;

pub use config::{FingerprintKind, GlanceConfig};
