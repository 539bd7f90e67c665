mod twofish_cbc;
mod twofish_core;
mod twofish_ecb;
mod twofish_modes;

pub use twofish_cbc::*;
pub use twofish_core::*;
pub use twofish_ecb::*;
pub use twofish_modes::*;

#[cfg(test)]
mod tests;
