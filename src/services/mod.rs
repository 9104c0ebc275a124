pub mod charge_service;
pub mod payment;
pub mod stripe;
