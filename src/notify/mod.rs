//! Booking notification channels.
//!
//! # Responsibilities
//! - Relay a booking notice to the configured webhook catch URL
//! - Relay a plain-text summary by email, through the Resend API when a key
//!   is configured, falling back to direct SMTP otherwise
//!
//! # Design Decisions
//! - Fire-and-forget: callers spawn `send`, failures are logged and never
//!   retried, and a booking succeeds with zero channels configured
//! - The Resend key takes precedence over SMTP; at most one email transport
//!   runs per notice

use chrono::{DateTime, Utc};
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Serialize;

use crate::config::NotifierConfig;
use crate::store::types::{Booking, Car};

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const NOTICE_SOURCE: &str = "firstlane.api";

/// Payload relayed to the notification channels for a new booking.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotice {
    pub booking_id: i64,
    pub car_id: i64,
    /// Human-readable listing summary, e.g. "2021 Toyota Camry (ID 3)".
    pub car: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub message: Option<String>,
    pub source: &'static str,
    pub submitted_at: DateTime<Utc>,
}

impl BookingNotice {
    pub fn new(car: &Car, booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            car_id: car.id,
            car: format!("{} {} {} (ID {})", car.year, car.make, car.model, car.id),
            name: booking.name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            start_date: booking.start_date.to_string(),
            end_date: booking.end_date.to_string(),
            message: booking.message.clone(),
            source: NOTICE_SOURCE,
            submitted_at: Utc::now(),
        }
    }

    fn subject(&self) -> String {
        format!("Booking — Car {}", self.car_id)
    }

    fn text_body(&self) -> String {
        format!(
            "New booking request\n\
             Car: {}\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Dates: {} to {}\n\
             Message: {}\n",
            self.car,
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or("-"),
            self.start_date,
            self.end_date,
            self.message.as_deref().unwrap_or("-"),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("mail build failed: {0}")]
    Mail(#[from] lettre::error::Error),
}

/// Which email transport a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmailChannel {
    Resend,
    Smtp,
    Disabled,
}

/// Dispatches booking notices to the configured channels.
pub struct Notifier {
    client: reqwest::Client,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(config: NotifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Relay `notice` through every configured channel. Each channel fails
    /// independently; nothing propagates to the caller.
    pub async fn send(&self, notice: BookingNotice) {
        if let Some(ref url) = self.config.webhook_url {
            if let Err(e) = self.post_webhook(url, &notice).await {
                tracing::warn!(booking_id = notice.booking_id, error = %e, "Webhook notification failed");
            }
        }
        let result = match self.email_channel() {
            EmailChannel::Resend => {
                let key = self.config.resend_api_key.as_deref().unwrap_or_default();
                self.post_email(key, &notice).await
            }
            EmailChannel::Smtp => self.send_smtp(&notice).await,
            EmailChannel::Disabled => Ok(()),
        };
        if let Err(e) = result {
            tracing::warn!(booking_id = notice.booking_id, error = %e, "Email notification failed");
        }
    }

    /// A Resend key wins over SMTP; SMTP is only used when a host is set.
    fn email_channel(&self) -> EmailChannel {
        if self.config.resend_api_key.is_some() {
            EmailChannel::Resend
        } else if self.config.smtp_host.is_some() {
            EmailChannel::Smtp
        } else {
            EmailChannel::Disabled
        }
    }

    async fn post_webhook(&self, url: &str, notice: &BookingNotice) -> Result<(), NotifyError> {
        self.client
            .post(url)
            .json(notice)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(booking_id = notice.booking_id, "Webhook notification delivered");
        Ok(())
    }

    async fn post_email(&self, api_key: &str, notice: &BookingNotice) -> Result<(), NotifyError> {
        let payload = serde_json::json!({
            "from": self.config.email_from,
            "to": [self.config.bookings_email],
            "subject": notice.subject(),
            "text": notice.text_body(),
        });
        self.client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(booking_id = notice.booking_id, "Email notification delivered");
        Ok(())
    }

    async fn send_smtp(&self, notice: &BookingNotice) -> Result<(), NotifyError> {
        let host = self.config.smtp_host.as_deref().unwrap_or_default();
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(self.config.smtp_port);
        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let mailer = builder.build();

        let email = Message::builder()
            .from(self.config.email_from.parse::<Mailbox>()?)
            .to(self.config.bookings_email.parse::<Mailbox>()?)
            .subject(notice.subject())
            .body(notice.text_body())?;

        mailer.send(email).await?;
        tracing::debug!(booking_id = notice.booking_id, "SMTP notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{Fuel, Transmission};
    use chrono::NaiveDate;

    fn fixtures() -> (Car, Booking) {
        let car = Car {
            id: 3,
            make: "Toyota".into(),
            model: "Camry".into(),
            year: 2021,
            trim: None,
            daily_price: 55,
            city: "Little Rock".into(),
            state: "AR".into(),
            mileage: 42_000,
            transmission: Transmission::Automatic,
            fuel: Fuel::Gas,
            seats: 5,
            doors: 4,
            image_url: "https://img.example/camry.jpg".into(),
            images: vec![],
            description: "Clean commuter sedan".into(),
            features: vec![],
            available: true,
            created_at: Utc::now(),
        };
        let booking = Booking {
            id: 7,
            car_id: 3,
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: None,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
            message: Some("Weekend trip".into()),
            created_at: Utc::now(),
        };
        (car, booking)
    }

    #[test]
    fn notice_summarizes_the_listing() {
        let (car, booking) = fixtures();
        let notice = BookingNotice::new(&car, &booking);
        assert_eq!(notice.car, "2021 Toyota Camry (ID 3)");
        assert_eq!(notice.subject(), "Booking — Car 3");
        let body = notice.text_body();
        assert!(body.contains("Jane Doe"));
        assert!(body.contains("Phone: -"));
        assert!(body.contains("2026-09-01 to 2026-09-05"));
    }

    #[test]
    fn email_transport_selection() {
        let mut config = NotifierConfig::default();
        assert_eq!(Notifier::new(config.clone()).email_channel(), EmailChannel::Disabled);

        config.smtp_host = Some("smtp.example".into());
        assert_eq!(Notifier::new(config.clone()).email_channel(), EmailChannel::Smtp);

        // A Resend key takes precedence even with SMTP configured.
        config.resend_api_key = Some("re_123".into());
        assert_eq!(Notifier::new(config).email_channel(), EmailChannel::Resend);
    }

    #[test]
    fn notice_serializes_with_wire_names() {
        let (car, booking) = fixtures();
        let value = serde_json::to_value(BookingNotice::new(&car, &booking)).unwrap();
        assert_eq!(value["bookingId"], 7);
        assert_eq!(value["carId"], 3);
        assert_eq!(value["source"], "firstlane.api");
        assert!(value["submittedAt"].is_string());
    }
}
