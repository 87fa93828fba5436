pub mod acl;
pub mod airline;
pub mod cart;
pub mod order;
pub mod package;
pub mod user;
