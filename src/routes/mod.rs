pub mod anode;
pub mod auth;
pub mod charge;
pub mod customer;
pub mod health;
pub mod pricing;
pub mod service_order;
