pub mod error;
pub mod evaluate;
pub mod models;
pub mod rank;
