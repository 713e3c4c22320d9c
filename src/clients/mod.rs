pub mod email;
pub mod paystack;
