//! Double-buffered question loading: while the learner answers one question
//! the next is fetched in the background, with never more than one request
//! outstanding.

pub mod fetch;
pub mod prefetch;
