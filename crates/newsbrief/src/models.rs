//! These models represent the objects passed around by the summarizer
//!
//! There are two related wire formats we need to interact with:
//! - assistant platform objects (assistants, threads, messages, runs and
//!   their required-action batches), sent to and from the hosted platform
//! - the structured summary contract, produced by the assistant as strict
//!   JSON and returned verbatim to the HTTP caller
//!
//! Platform responses are converted into these structs at the client layer;
//! nothing above it touches raw JSON.
pub mod assistant;
pub mod role;
pub mod run;
pub mod summary;
pub mod tool;
