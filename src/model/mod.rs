//! Record-store entities
//!
//! The crawler never owns these rows; it reads a [`Podcast`] handed to it by
//! the caller and writes back attribute records through the
//! [`RecordStore`](crate::storage::RecordStore) seam.

mod episode;
mod podcast;

pub use episode::{Episode, EpisodeAttributes};
pub use podcast::{Podcast, PodcastAttributes};
