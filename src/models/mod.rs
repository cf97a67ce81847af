pub mod listing;
pub mod message;
pub mod review;
pub mod tender;
pub mod user;
