//! Statement grammar (C6): staged builders for SELECT/INSERT/UPDATE/DELETE,
//! each a single statement value threaded through consuming step methods —
//! once a step runs, the struct it returns is the only handle the caller
//! holds, so the previous stage's methods are no longer reachable.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::Delete;
pub use insert::{Insert, InsertColumns, InsertOnConflictSet};
pub use select::Select;
pub use update::Update;
