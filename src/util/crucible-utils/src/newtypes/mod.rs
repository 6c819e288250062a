pub use crucible_utils_proc::{delegate, iterator, transparent};

mod arena;
pub use arena::*;

mod num_enum;
pub use num_enum::*;

mod tuples;
pub use tuples::*;

mod index;
pub use index::*;
