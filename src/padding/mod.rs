mod pkcs7;

pub use pkcs7::*;
