pub mod admin_withdrawals;
pub mod bank_details;
pub mod health;
pub mod payments;
pub mod referral;
pub mod wallet;
pub mod webhook;
pub mod withdraw;
