pub mod bulk;
pub mod handlers;
