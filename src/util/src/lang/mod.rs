pub mod control;
pub mod delegate;
pub mod iter;
pub mod lifetime;
pub mod marker;
pub mod polyfill;
pub mod self_ref;
pub mod std_traits;
pub mod transparent;
pub mod tuple;
pub mod view;
