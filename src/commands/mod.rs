mod install;
mod uninstall;

pub use install::install;
pub use uninstall::{uninstall, Removal};
