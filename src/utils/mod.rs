pub mod filter;
pub mod navigation;
pub mod session;
pub mod validation;
