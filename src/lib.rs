//! Wrapper crate for the [wallhaven.cc](https://wallhaven.cc) API.
//!
//! ## Usage
//!
//! First, create a [`Client`]. Most endpoints are public, but an API key
//! (from your [account settings](https://wallhaven.cc/settings/account)) is
//! required to access NSFW wallpapers, your browsing settings and your
//! private collections.
//!
//! ```no_run
//! # use wallhaven::client::Client;
//! # fn main() -> Result<(), wallhaven::error::Error> {
//! let client = Client::new()?;
//! // or, with a key:
//! let client = Client::with_api_key("<your API key>")?;
//! # Ok(()) }
//! ```
//!
//! Now it's ready to go! For example you can get wallpaper `94x38z` like
//! this:
//!
//! ```no_run
//! # use wallhaven::client::Client;
//! # #[tokio::main]
//! # async fn main() -> Result<(), wallhaven::error::Error> {
//! # let client = Client::new()?;
//! let wallpaper = client.get_wallpaper("94x38z").await?;
//!
//! assert_eq!(wallpaper.id, "94x38z");
//! # Ok(()) }
//! ```
//!
//! Or you can make a search like on the website, paging through the results
//! lazily:
//!
//! ```no_run
//! # use wallhaven::client::Client;
//! # use wallhaven::query::{Params, Query};
//! use futures::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), wallhaven::error::Error> {
//! # let client = Client::new()?;
//! let q = Query::new().tag("landscape").exclude_tag("city").build()?;
//! let params = Params::new()
//!     .set("q", q)
//!     .set("purity", "100")
//!     .set("sorting", "toplist");
//!
//! let pages = client.search(params)?;
//! futures::pin_mut!(pages);
//!
//! while let Some(page) = pages.next().await {
//!     let (wallpapers, meta) = page?;
//!     println!("page {} of {}", meta.current_page, meta.last_page);
//!     for wallpaper in wallpapers {
//!         println!("  {}", wallpaper.path);
//!     }
//! }
//! # Ok(()) }
//! ```
//!
//! Parameters are validated before anything is sent, so a typo'd parameter
//! or an out-of-grammar value fails fast with a
//! [`wallhaven::error::Error`][error::Error] instead of a wasted round
//! trip.
//!
//! ## Notes from the official API:
//!
//! ### Rate Limiting
//!
//! > API calls are currently limited to 45 per minute. If you do hit this
//! > limit, you will receive a 429 - Too many requests error.
//! >
//! > [[...]](https://wallhaven.cc/help/api#limits)
//!
//! `wallhaven` enforces this limit with a process-wide sliding window
//! shared by every [`Client`]: a call made while the window is full sleeps
//! until a slot frees instead of failing. Should the API still answer 429,
//! the request is retried a few times with exponential backoff before
//! [`error::Error::RateLimit`] is surfaced.
//!
//! [`Client`]: client/struct.Client.html

mod utils;

/// Client related structures.
pub mod client;

/// Error management.
pub mod error;

/// Query parameter validation and construction.
pub mod query;

/// Wallpaper management.
pub mod wallpaper;

/// Tag management.
pub mod tag;

/// Collection management.
pub mod collection;

/// User settings.
pub mod settings;
