//! # bz-client
//!
//! The authoring side of bazaar: draft state for the blog and item forms,
//! the multipart submission workflow, and the transient result indicator.
//!
//! All state is owned by a [`Composer`] per form instance and changed through
//! plain update functions; the only suspension point is the network call.

pub mod browse;
pub mod composer;
pub mod draft;
pub mod error;
pub mod feedback;
pub mod submit;
pub mod token;

pub use browse::index_view;
pub use composer::{Composer, PendingSubmission, SubmitOutcome};
pub use draft::{Draft, DraftMsg, ImageId, StagedImage};
pub use error::ClientError;
pub use feedback::{Feedback, SubmissionResult, FEEDBACK_DELAY};
pub use submit::{SubmissionClient, SubmissionPayload};
pub use token::{StaticToken, TokenSource};
