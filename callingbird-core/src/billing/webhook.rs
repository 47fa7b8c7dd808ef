use sqlx::PgPool;
use tracing::{info, warn};

use crate::email::{self, Mailer};
use crate::models::invoice::InvoiceStatus;
use crate::payments::PaymentProvider;
use crate::store;

/// Maps the payment provider's status vocabulary to the invoice vocabulary.
pub fn map_provider_status(provider_status: &str) -> InvoiceStatus {
    match provider_status {
        "paid" | "authorized" => InvoiceStatus::Paid,
        "pending" => InvoiceStatus::Processing,
        "expired" | "failed" | "canceled" => InvoiceStatus::Failed,
        _ => InvoiceStatus::Pending,
    }
}

/// Status to record when a payment has just been created. A freshly created
/// payment is normally `open` at the provider, which maps to an open
/// invoice awaiting checkout.
pub fn initial_invoice_status(provider_status: &str) -> InvoiceStatus {
    match provider_status {
        "paid" | "authorized" => InvoiceStatus::Paid,
        "pending" => InvoiceStatus::Processing,
        _ => InvoiceStatus::Open,
    }
}

/// Reconciles an invoice with the provider's current payment status.
///
/// Fetches the payment, maps its status, updates the matching invoice, and
/// sends the payment-confirmed email only on the transition to paid. An
/// unknown payment id is a no-op, not an error.
pub async fn handle_mollie_webhook(
    pool: &PgPool,
    payments: &dyn PaymentProvider,
    mailer: &dyn Mailer,
    payment_id: &str,
) -> Result<(), anyhow::Error> {
    let payment = payments.get_payment(payment_id).await?;

    let invoice = match store::invoices::find_by_payment_id(pool, payment_id).await? {
        Some(invoice) => invoice,
        None => {
            info!("Webhook for unknown payment {}, ignoring", payment_id);
            return Ok(());
        }
    };

    let new_status = map_provider_status(&payment.status);
    if invoice.status == new_status {
        return Ok(());
    }

    store::invoices::update_status(pool, invoice.id, new_status).await?;
    info!(
        "Invoice {} moved {} -> {} (payment {})",
        invoice.number, invoice.status, new_status, payment_id
    );

    if new_status == InvoiceStatus::Paid {
        let (to, company_name) = recipient_for(pool, &invoice).await;
        let mail = email::invoice_paid(&to, &company_name, &invoice.number);
        if let Err(e) = mailer.send(mail).await {
            warn!("Payment-confirmed email for {} failed: {}", invoice.number, e);
        }
    }

    Ok(())
}

/// Billing email and company name, from invoice metadata with a company
/// record fallback.
async fn recipient_for(pool: &PgPool, invoice: &crate::models::invoice::Invoice) -> (String, String) {
    let meta_email = invoice
        .metadata
        .as_ref()
        .and_then(|m| m.get("billing_email"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let meta_name = invoice
        .metadata
        .as_ref()
        .and_then(|m| m.get("company_name"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    if let (Some(email), Some(name)) = (&meta_email, &meta_name) {
        return (email.clone(), name.clone());
    }

    match store::companies::get_company(pool, invoice.company_id).await {
        Ok(Some(company)) => (
            meta_email.unwrap_or(company.email),
            meta_name.unwrap_or(company.name),
        ),
        _ => (
            meta_email.unwrap_or_default(),
            meta_name.unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorized_maps_to_paid() {
        assert_eq!(map_provider_status("authorized"), InvoiceStatus::Paid);
        assert_eq!(map_provider_status("paid"), InvoiceStatus::Paid);
    }

    #[test]
    fn test_pending_maps_to_processing() {
        assert_eq!(map_provider_status("pending"), InvoiceStatus::Processing);
    }

    #[test]
    fn test_terminal_failures_map_to_failed() {
        assert_eq!(map_provider_status("expired"), InvoiceStatus::Failed);
        assert_eq!(map_provider_status("failed"), InvoiceStatus::Failed);
        assert_eq!(map_provider_status("canceled"), InvoiceStatus::Failed);
    }

    #[test]
    fn test_unknown_status_maps_to_pending() {
        assert_eq!(map_provider_status("open"), InvoiceStatus::Pending);
        assert_eq!(map_provider_status("whatever"), InvoiceStatus::Pending);
    }

    #[test]
    fn test_initial_status_for_fresh_payment_is_open() {
        assert_eq!(initial_invoice_status("open"), InvoiceStatus::Open);
        assert_eq!(initial_invoice_status("paid"), InvoiceStatus::Paid);
    }
}
