// src/fetch/mod.rs
// =============================================================================
// This module handles everything that talks to the network for the page
// itself.
//
// Submodules:
// - transport: the Transport trait and its reqwest implementation
// - page: the GET of the analyzed page, with timeout and cancellation
// =============================================================================

mod page;
mod transport;

pub use page::fetch_page;
pub(crate) use page::remaining;
pub use transport::{HttpTransport, PageResponse, Transport};
