//! Instagram Follower Aggregator.
//!
//! Ingests a personal Instagram data export (followers, comments, direct
//! messages, story interactions, follow-request history) and produces one
//! denormalized record per contact, enriched with an engagement score and
//! a discovery-method inference, exported as JSONL and a spreadsheet.
//!
//! The core is a sequence of order-dependent transformations over a
//! single insertion-ordered map from normalized username to
//! [`ContactRecord`](model::ContactRecord):
//!
//! 1. [`sources::followers`] defines the universe of identities.
//! 2. [`sources::comments`], [`sources::messages`], [`sources::stories`],
//!    and [`sources::requests`] merge interaction summaries into it
//!    (message requests may add non-follower leads).
//! 3. [`score`] computes the derived fields.
//! 4. [`export`] serializes the result.
//!
//! [`pipeline::run`] sequences all of it and relays progress through an
//! injected callback. Everything is synchronous and single-threaded;
//! callers wanting a responsive UI run the whole pipeline on their own
//! worker thread.

pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod score;
pub mod sources;
pub mod text;

pub use error::PipelineError;
pub use layout::ExportLayout;
pub use model::{ContactMap, ContactRecord, ContactStatus, DiscoveryMethod};
pub use pipeline::{run, RunOptions, RunSummary};
