//! In-memory request state for the dashboard datasets

mod fetch_cache;
mod tab_state;

pub use fetch_cache::{Completion, FetchCache, FetchTicket};
pub use tab_state::{transition, FetchSeq, TabEvent, TabState, TabStatus};
