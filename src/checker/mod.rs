// src/checker/mod.rs
// =============================================================================
// This module contains the page analysis logic that runs after the fetch.
//
// Submodules:
// - html: walks the parsed document and fills in the structural report
// - form: decides whether a <form> is a login form
// - http: the pool of workers that HEAD-check external links
// - aggregate: folds link check results into the final counts
//
// This file (mod.rs) is the module root - it re-exports the pieces the
// analyzer wires together.
// =============================================================================

mod aggregate;
mod form;
mod html;
mod http;

pub use aggregate::{drain, merge, LinkTally};
pub use form::analyze_form;
pub use html::{analyze_document, WalkOutput};
pub use http::{check_link, LinkCheckResult, LinkPool};
