//! Convenience re-exports for common use.

pub use crate::config::BotConfig;
pub use crate::error::{Result, TunesmithError};
pub use crate::song::SongClient;
pub use crate::vision::{Description, DescriptionProvider};
