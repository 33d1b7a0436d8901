pub mod auth;
pub mod employee;
pub mod image;
pub mod pages;
