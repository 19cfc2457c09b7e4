pub mod converter;
pub mod http;
pub mod locale;
