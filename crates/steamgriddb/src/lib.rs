//! SteamGridDB cover art for discovered games.
//!
//! [`Client`] talks to the SteamGridDB v2 API, [`CoverCache`] keeps
//! downloaded covers on disk keyed by game identity, and
//! [`ArtworkResolver`] ties the two together. Artwork is best-effort
//! throughout; a game without a cover is still imported.

pub mod cache;
pub mod client;
pub mod resolver;
pub mod types;

pub use cache::CoverCache;
pub use client::{Client, Error};
pub use resolver::ArtworkResolver;
pub use types::{GridImage, SearchResult};
