pub mod auth;
pub mod dashboard;
pub mod diet;
pub mod employee;
pub mod enquiry;
pub mod follow_up;
pub mod gym;
pub mod health;
pub mod member;
pub mod package;
pub mod user;
pub mod workout;
