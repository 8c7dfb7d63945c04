pub mod documents;
pub mod http;
