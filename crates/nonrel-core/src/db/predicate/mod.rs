//! Filter predicates: the host constraint tree, its decoder, the normalized
//! tree handed to drivers, and in-memory evaluation.
mod decode;
mod eval;
mod lookup;
mod normalized;
mod tree;


// re-exports
pub use decode::Decoder;
pub use eval::matches;
pub use lookup::{Lookup, Wildcards};
pub use normalized::{FilterChild, FilterLeaf, FilterNode, NormalizedTree};
pub use tree::{Connector, Constraint, WhereChild, WhereNode};
