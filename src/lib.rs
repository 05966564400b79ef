//! Tunesmith — image-to-song bot core
//!
//! Turns an uploaded image into a generated song in two steps: a
//! vision-capable chat model produces a short mood description of the image,
//! and that description is submitted to an asynchronous song-generation
//! backend which is polled until audio is ready. Retry with exponential
//! backoff wraps the whole submit+poll cycle.
//!
//! The chat-platform command layer (interaction wiring, attachment checks,
//! reply formatting) lives in the host bot, not here.
//!
//! # Quick Start
//!
//! ```no_run
//! use tunesmith::prelude::*;
//! use tunesmith::vision::prompts;
//!
//! # async fn example() -> tunesmith::error::Result<()> {
//! let config = BotConfig::from_env()?;
//! let description = config
//!     .description_provider()
//!     .describe("https://cdn.example/image.png", prompts::MOOD_PROMPT)
//!     .await?;
//! let audio_url = config.song_client().generate_song(&description).await?;
//! println!("{audio_url}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod prelude;
pub mod song;
pub mod util;
pub mod vision;
