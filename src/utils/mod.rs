pub mod display;
pub mod git;
pub mod platform;

#[cfg(test)]
pub mod testing;
