pub mod markdown;
pub mod narrative;
pub mod request;
