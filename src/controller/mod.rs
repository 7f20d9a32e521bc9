//! Client-side state controllers.
//!
//! - [`request`] - Query parameters, generation-checked fetch lifecycle, display list
//! - [`selection`] - Selected ids and the bulk-unsubscribe lifecycle
//!
//! Neither controller performs I/O; the app spawns the requests they describe
//! and hands the results back.

mod request;
mod selection;

pub use request::{FetchResolution, FetchState, FetchTicket, RequestController};
pub use selection::{MutationOutcome, SelectionError, SelectionManager};
