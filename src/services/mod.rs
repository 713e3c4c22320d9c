pub mod fee_service;
pub mod ledger_service;
pub mod payment_service;
pub mod recipient_service;
pub mod referral_service;
pub mod subscription_service;
pub mod withdrawal_service;
