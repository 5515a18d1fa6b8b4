mod user_service_fake;
mod user_service_impl;

pub use user_service_fake::*;
pub use user_service_impl::*;
