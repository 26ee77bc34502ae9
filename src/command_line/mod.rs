mod cli;

pub use cli::{run, Cli};
