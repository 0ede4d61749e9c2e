//! Track table edit model.
//!
//! Records are loaded through a [`TagStore`], edited in memory through an
//! [`EditSession`] and written back by a [`SaveCoordinator`]. Loading and
//! saving report failures per file instead of aborting.

pub mod art;
mod collection;
mod edit;
mod error;
mod model;
mod save;
mod scan;
mod tags;
pub mod title_guess;

pub use collection::TrackCollection;
pub use edit::EditSession;
pub use error::{LoadError, LoadFailure, WriteError};
pub use model::{ArtPayload, TagField, TagFields, TrackRecord};
pub use save::SaveCoordinator;
pub use scan::expand_inputs;
pub(crate) use scan::{has_extension, is_hidden};
pub use tags::{LoadedTags, LoftyTagStore, TagStore};

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
