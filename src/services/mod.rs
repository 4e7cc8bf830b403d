pub mod account;
pub mod quiz;
pub mod quiz_session;
pub mod shop;
