pub mod cart;
pub mod order;
pub mod requests;
pub mod responses;
