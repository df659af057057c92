pub mod add;
pub mod codec;
pub mod del;
pub mod edit;
pub mod form;
pub mod log;
pub mod validation;
