use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Country calling code substituted for a leading trunk `0` when
    /// normalizing phone numbers.
    pub country_code: String,
    pub gateway_url: String,
    pub gateway_api_key: String,
    pub sender_name: String,
    pub booking_base_url: String,
    pub default_photo_url: String,
    pub catalogue_url: String,
    pub default_expertise: String,
    pub otp_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "mindline.db".to_string()),
            country_code: env::var("COUNTRY_CALLING_CODE").unwrap_or_else(|_| "91".to_string()),
            gateway_url: env::var("WA_GATEWAY_URL").unwrap_or_default(),
            gateway_api_key: env::var("WA_GATEWAY_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            sender_name: env::var("WA_SENDER_NAME").unwrap_or_else(|_| "MindLine".to_string()),
            booking_base_url: env::var("BOOKING_BASE_URL")
                .unwrap_or_else(|_| "https://app.mindline.in/book".to_string()),
            default_photo_url: env::var("DEFAULT_PHOTO_URL").unwrap_or_else(|_| {
                "https://assets.mindline.in/profile-placeholder.png".to_string()
            }),
            catalogue_url: env::var("CATALOGUE_MEDIA_URL").unwrap_or_else(|_| {
                "https://assets.mindline.in/services-catalogue.pdf".to_string()
            }),
            default_expertise: env::var("DEFAULT_EXPERTISE")
                .unwrap_or_else(|_| "Wellness Buddy".to_string()),
            otp_ttl_secs: env::var("OTP_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}
