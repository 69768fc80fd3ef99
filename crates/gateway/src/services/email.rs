//! Order confirmation email.
//!
//! Uses SMTP via lettre (STARTTLS relay). Sending is best-effort: callers log
//! a failure and carry on.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use shopgate_core::{Email, OrderId};

use crate::config::EmailConfig;

const ORDER_SUBJECT: &str = "Order Creation";
const ORDER_BODY: &str = "Order Created Successfully";

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Sends a plain-text confirmation to the customer of a newly created order.
#[derive(Clone)]
pub struct OrderNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl OrderNotifier {
    /// Create a notifier from configuration.
    ///
    /// No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured or `from_address` is
    /// not a valid mailbox.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from = config
            .from_address
            .parse()
            .map_err(|_| EmailError::InvalidAddress(config.from_address.clone()))?;

        Ok(Self { mailer, from })
    }

    /// Email the customer that their order was created.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or the relay rejects it.
    #[tracing::instrument(skip(self), fields(to = %to))]
    pub async fn order_created(&self, to: &Email, order_id: OrderId) -> Result<(), EmailError> {
        let message = self.order_created_message(to, order_id)?;
        self.mailer.send(message).await?;

        tracing::info!(%order_id, "Order confirmation sent");
        Ok(())
    }

    fn order_created_message(&self, to: &Email, order_id: OrderId) -> Result<Message, EmailError> {
        let to: Mailbox = to
            .as_str()
            .parse()
            .map_err(|_| EmailError::InvalidAddress(to.to_string()))?;

        Ok(Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(ORDER_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(format!("{ORDER_BODY}\n\nOrder number: {order_id}\n"))?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(from: &str) -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "orders@example.com".to_string(),
            smtp_password: SecretString::from("app-password"),
            from_address: from.to_string(),
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_from_address() {
        assert!(matches!(
            OrderNotifier::new(&config("not an address")),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_order_created_message() {
        let notifier = OrderNotifier::new(&config("Acme <orders@example.com>")).unwrap();
        let to = Email::parse("bob@example.com").unwrap();

        let message = notifier
            .order_created_message(&to, OrderId::new(450_789_469))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Order Creation"));
        assert!(raw.contains("To: bob@example.com"));
        assert!(raw.contains("Order Created Successfully"));
        assert!(raw.contains("450789469"));
    }
}
