mod bigint;
mod multipower;

pub use bigint::*;
pub use multipower::*;

#[cfg(test)]
mod tests;
