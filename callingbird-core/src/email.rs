use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

/// A transactional email ready to send.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Transactional email sender.
///
/// In production this is backed by an email service provider; the default
/// implementation below logs the send, which is also what the tests use.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), anyhow::Error>;
}

/// Tracing-backed mailer used in development and tests.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), anyhow::Error> {
        info!("Sending email to {}", email.to);
        info!("Subject: {}", email.subject);
        info!(
            "Body preview: {}...",
            &email.body[..email.body.len().min(100)]
        );
        Ok(())
    }
}

/// Template: welcome email when a tenant's trial starts.
pub fn trial_started(to: &str, company_name: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Welcome to CallingBird - your trial has started".to_string(),
        body: format!(
            "Hi {company_name},\n\n\
            Your CallingBird trial is now active. Your voice assistant is ready \
            to be configured and can start taking calls right away.\n\n\
            Best regards,\nThe CallingBird Team"
        ),
    }
}

/// Template: a new invoice was issued for the past usage period.
pub fn invoice_issued(
    to: &str,
    company_name: &str,
    invoice_number: &str,
    amount: Decimal,
    currency: &str,
    payment_link: Option<&str>,
) -> Email {
    let payment_line = match payment_link {
        Some(link) => format!("You can pay it here: {link}\n\n"),
        None => String::new(),
    };
    Email {
        to: to.to_string(),
        subject: format!("Your CallingBird invoice {invoice_number}"),
        body: format!(
            "Hi {company_name},\n\n\
            A new invoice {invoice_number} of {amount} {currency} has been issued \
            for your call usage over the past period.\n\n\
            {payment_line}\
            Best regards,\nThe CallingBird Team"
        ),
    }
}

/// Template: an invoice payment was confirmed.
pub fn invoice_paid(to: &str, company_name: &str, invoice_number: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: format!("Payment received for invoice {invoice_number}"),
        body: format!(
            "Hi {company_name},\n\n\
            We have received your payment for invoice {invoice_number}. \
            Thank you!\n\n\
            Best regards,\nThe CallingBird Team"
        ),
    }
}

/// Template: early-access signup confirmation.
pub fn early_access_confirmation(to: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "You're on the CallingBird early-access list".to_string(),
        body: "Hi,\n\n\
            Thanks for signing up for early access to CallingBird. We'll be in \
            touch as soon as a spot opens up.\n\n\
            Best regards,\nThe CallingBird Team"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_invoice_issued_includes_payment_link() {
        let email = invoice_issued(
            "billing@acme.test",
            "Acme",
            "CB-1-20240101-20240201-000123",
            Decimal::from_str("15.00").unwrap(),
            "EUR",
            Some("https://pay.example/abc"),
        );
        assert!(email.subject.contains("CB-1-20240101-20240201-000123"));
        assert!(email.body.contains("15.00 EUR"));
        assert!(email.body.contains("https://pay.example/abc"));
    }

    #[test]
    fn test_invoice_issued_without_link_omits_payment_line() {
        let email = invoice_issued(
            "billing@acme.test",
            "Acme",
            "CB-1-20240101-20240201-000123",
            Decimal::ZERO,
            "EUR",
            None,
        );
        assert!(!email.body.contains("pay it here"));
    }

    #[test]
    fn test_early_access_confirmation_addresses_signup() {
        let email = early_access_confirmation("signup@example.test");
        assert_eq!(email.to, "signup@example.test");
        assert!(email.subject.contains("early-access"));
    }

    #[tokio::test]
    async fn test_log_mailer_send() {
        let result = LogMailer
            .send(trial_started("owner@acme.test", "Acme"))
            .await;
        assert!(result.is_ok());
    }
}
