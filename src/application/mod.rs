pub mod books;
pub mod error;
pub mod fields;
pub mod repos;
pub mod reviews;
pub mod seed;
pub mod views;
