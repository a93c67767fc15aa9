pub mod account_service;
pub use account_service::{AccountError, AccountService, ModerationLists};

pub mod account_service_impl;
pub use account_service_impl::SeaOrmAccountService;
