mod distance_list;
mod parser;

pub use parser::{CategorizedDistances, LogParser};
