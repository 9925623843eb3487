//! Everylot - a photo of every lot in a city
//!
//! This library picks one parcel ("lot") that has not been posted yet from a
//! SQLite database, fetches a street-level photo or a roadmap snapshot of it,
//! and prepares the payload for a social-media post about it.
//!
//! # Example
//!
//! ```no_run
//! use everylot::config::EveryLotConfig;
//! use everylot::lot::LotSelector;
//! use everylot::provider::ReqwestClient;
//! use everylot::store::LotStore;
//! use everylot::{EveryLot, ImageSource};
//!
//! let config = EveryLotConfig::new("YOUR_API_KEY");
//! let store = LotStore::open("lots.db")?;
//! let mut bot = EveryLot::new(
//!     store,
//!     LotSelector::NextUnposted,
//!     &config,
//!     ReqwestClient::new()?,
//!     tracing::info_span!("everylot"),
//! )?;
//!
//! let image = bot.fetch_image(ImageSource::StreetView)?;
//! // ... upload `image`, then:
//! let payload = bot.compose(vec!["1234".to_string()])?;
//! // ... post `payload`, then:
//! bot.mark_as_tweeted(987654321)?;
//! # Ok::<(), everylot::Error>(())
//! ```

pub mod bot;
pub mod camera;
pub mod compose;
pub mod config;
mod error;
pub mod format;
pub mod geometry;
pub mod locate;
pub mod logging;
pub mod lot;
pub mod provider;
pub mod store;

pub use bot::{EveryLot, ImageSource};
pub use error::{Error, Result};
