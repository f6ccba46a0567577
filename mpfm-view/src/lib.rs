//! Dashboard state that does not depend on any UI toolkit.
//!
//! - `grouping`: device lists bucketed under the wells of the hierarchy
//! - `tree`: visible sidebar rows for an expanded set and a selection
//! - `selection`: the shared selection store and the filter it implies
//! - `refresh`: generation-guarded polling state

pub mod grouping;
pub mod refresh;
pub mod selection;
pub mod tree;

pub use grouping::{DeviceGroups, JoinKey, UNASSIGNED};
pub use refresh::{Outcome, Polled, Ticket, DEFAULT_POLL_INTERVAL};
pub use selection::{ScopeFilter, SelectedNode, Selection, SelectionStore};
pub use tree::{apply_action, ExpandedSet, RowKind, TreeAction, TreeRow, TreeView};
