pub mod types;

#[cfg(test)]
mod tests;

pub use types::*;
