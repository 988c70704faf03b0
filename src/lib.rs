//! An ordered, persisted task list: the collection and its mutations, the
//! filtered views derived from it, and the edit and drag-to-reorder
//! controllers that feed it.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod session;
