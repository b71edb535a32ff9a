pub mod request;
pub(crate) mod signing;
pub mod templates;
pub mod xml;
