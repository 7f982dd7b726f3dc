mod classify;
mod search;

pub use classify::*;
pub use search::*;
