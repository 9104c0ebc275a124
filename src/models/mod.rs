pub mod anode;
pub mod boat;
pub mod customer;
pub mod operator;
pub mod quote;
pub mod service_order;
