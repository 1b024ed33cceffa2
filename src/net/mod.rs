//! HTTP client side of the conversational protocol.
//!
//! One fixed server, four endpoints: chunked audio upload, two text poll
//! stages, and the spoken-reply media download. This is not a general HTTP
//! client layer — each piece targets exactly its endpoint's contract.

pub mod fetch;
pub mod poll;
pub mod response;
pub mod upload;

pub use fetch::MediaFetcher;
pub use poll::poll_stage;
pub use response::ResponseBuffer;
pub use upload::{Uploader, chunk_spans};
