pub mod consent;
pub mod session;
pub mod store;
pub mod token;
