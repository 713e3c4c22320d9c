use crate::clients::email::EmailClient;
use crate::clients::paystack::PaystackClient;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub jwt_secret: String,
    pub paystack: PaystackClient,
    pub paystack_webhook_secret: String,
    pub email: EmailClient,
    pub app_url: String,
}
