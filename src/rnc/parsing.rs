//! Tree construction
//!
//!     The token stream is turned into a schema tree by four passes, each taking
//!     ownership of the node sequence produced by the previous one:
//!         1. Pair matching. See [pairs]. Delimiter pairs become composite nodes.
//!         2. Body typification. See [bodies]. Element, attribute, data, mixed and list
//!            shapes become typed nodes.
//!         3. Define nesting. See [defines]. Definitions get their bodies, notes move
//!            onto elements and operator runs are folded.
//!         4. Namespace scanning. See [namespaces]. Global declarations are collected
//!            into the compiler state.
//!
//!     The passes are wired together as transform stages in
//!     [transforms::stages](crate::rnc::transforms::stages).

pub mod bodies;
pub mod defines;
pub mod namespaces;
pub mod pairs;

pub use bodies::type_bodies;
pub use defines::nest_defines;
pub use namespaces::scan_namespaces;
pub use pairs::match_pairs;
