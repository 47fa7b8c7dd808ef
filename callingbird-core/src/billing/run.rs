use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::billing::period::{self, PeriodDecision};
use crate::billing::webhook::initial_invoice_status;
use crate::email::{self, Mailer};
use crate::models::billing::{BillingProfile, BillingStatus};
use crate::models::invoice::{InvoiceStatus, NewInvoice};
use crate::payments::{PaymentProvider, PaymentRequest};
use crate::store;

const INVOICE_CURRENCY: &str = "EUR";
const PAYMENT_TERM_DAYS: i64 = 14;

/// Explicit as-of month for a billing run.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

/// One invoice produced by a run.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSummary {
    pub invoice_id: Uuid,
    pub company_id: i64,
    pub number: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub payment_link: Option<String>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// A tenant whose billing step failed; the run continues past it.
#[derive(Debug, Clone, Serialize)]
pub struct TenantFailure {
    pub company_id: i64,
    pub error: String,
}

/// Structured result of one billing run.
#[derive(Debug, Clone, Serialize)]
pub struct BillingRunSummary {
    pub as_of: DateTime<Utc>,
    pub invoices: Vec<InvoiceSummary>,
    pub total_amount: Decimal,
    pub failures: Vec<TenantFailure>,
}

/// Monthly billing run: walks all billable tenants and invoices every
/// billing period that has closed and has not been billed yet.
pub struct BillingRunner {
    pool: PgPool,
    payments: Arc<dyn PaymentProvider>,
    mailer: Arc<dyn Mailer>,
    default_price_per_minute: Decimal,
}

impl BillingRunner {
    pub fn new(
        pool: PgPool,
        payments: Arc<dyn PaymentProvider>,
        mailer: Arc<dyn Mailer>,
        default_price_per_minute: Decimal,
    ) -> Self {
        Self {
            pool,
            payments,
            mailer,
            default_price_per_minute,
        }
    }

    /// Runs one billing pass.
    ///
    /// Each tenant is processed in isolation: a failure is recorded in the
    /// summary and the run moves on to the next tenant.
    pub async fn run(&self, as_of: Option<MonthYear>) -> Result<BillingRunSummary, anyhow::Error> {
        let as_of = match as_of {
            Some(my) => period::end_of_month(my.year, my.month)
                .ok_or_else(|| anyhow::anyhow!("Invalid billing month: {}/{}", my.month, my.year))?,
            None => Utc::now(),
        };

        let profiles = store::billing::billable_profiles(&self.pool).await?;
        info!(
            "Billing run as of {} over {} billable tenant(s)",
            as_of,
            profiles.len()
        );

        let mut summary = BillingRunSummary {
            as_of,
            invoices: Vec::new(),
            total_amount: Decimal::ZERO,
            failures: Vec::new(),
        };

        for profile in profiles {
            match self.bill_tenant(&profile, as_of).await {
                Ok(Some(invoice)) => {
                    summary.total_amount += invoice.amount;
                    summary.invoices.push(invoice);
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Billing failed for company {}: {}", profile.company_id, e);
                    summary.failures.push(TenantFailure {
                        company_id: profile.company_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        summary.total_amount = summary.total_amount.round_dp(2);
        info!(
            "Billing run finished: {} invoice(s), total {}, {} failure(s)",
            summary.invoices.len(),
            summary.total_amount,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Bills a single tenant. `Ok(None)` means nothing to invoice this run.
    async fn bill_tenant(
        &self,
        profile: &BillingProfile,
        as_of: DateTime<Utc>,
    ) -> Result<Option<InvoiceSummary>, anyhow::Error> {
        let company_id = profile.company_id;

        let company = match store::companies::get_company(&self.pool, company_id).await? {
            Some(company) => company,
            None => {
                warn!("Billing profile {} has no company record, skipping", company_id);
                return Ok(None);
            }
        };

        let previous = store::invoices::latest_invoice(&self.pool, company_id).await?;
        let decision = period::evaluate_period(
            profile,
            Some(company.created_at),
            previous.map(|p| p.period_end),
            as_of,
        );

        let billing_period = match decision {
            PeriodDecision::Bill(period) => period,
            PeriodDecision::Skip(reason) => {
                debug!("Skipping company {}: {:?}", company_id, reason);
                return Ok(None);
            }
        };

        // Trial ended inside or before this period: the tenant becomes
        // active before being invoiced.
        if profile.status == BillingStatus::Trial {
            if let Some(trial_end) = profile.trial_ends_at {
                if trial_end <= billing_period.end {
                    store::billing::set_status(&self.pool, company_id, BillingStatus::Active)
                        .await?;
                    info!("Company {} trial ended, now active", company_id);
                }
            }
        }

        let usage_seconds = store::usage::usage_seconds(
            &self.pool,
            company_id,
            billing_period.start,
            billing_period.end,
        )
        .await?;
        let usage_minutes = period::usage_minutes(usage_seconds);
        let price = profile
            .price_per_minute
            .unwrap_or(self.default_price_per_minute);
        let amount = period::invoice_amount(usage_minutes, price);

        let issued_at = Utc::now();
        let number = period::invoice_number(company_id, &billing_period, issued_at);
        let billing_email = profile
            .billing_email
            .clone()
            .unwrap_or_else(|| company.email.clone());
        let metadata = json!({
            "billing_email": billing_email,
            "company_name": company.name,
            "period_start": billing_period.start,
            "period_end": billing_period.end,
        });

        let (status, payment_id, payment_link) = if amount > Decimal::ZERO {
            match &profile.mollie_customer_id {
                Some(customer_id) => {
                    let payment = self
                        .payments
                        .create_payment(PaymentRequest {
                            customer_id: customer_id.clone(),
                            mandate_id: profile.mollie_mandate_id.clone(),
                            amount,
                            currency: INVOICE_CURRENCY.to_string(),
                            description: format!("CallingBird invoice {number}"),
                            metadata: metadata.clone(),
                        })
                        .await?;
                    (
                        initial_invoice_status(&payment.status),
                        Some(payment.id),
                        payment.checkout_url,
                    )
                }
                None => {
                    warn!(
                        "Company {} has no payment customer, issuing open invoice",
                        company_id
                    );
                    (InvoiceStatus::Open, None, None)
                }
            }
        } else {
            // Nothing to charge: the invoice is settled on creation.
            (InvoiceStatus::Paid, None, None)
        };

        let invoice = store::invoices::insert_invoice(
            &self.pool,
            NewInvoice {
                company_id,
                number: number.clone(),
                amount,
                currency: INVOICE_CURRENCY.to_string(),
                status,
                issued_at,
                due_at: Some(issued_at + Duration::days(PAYMENT_TERM_DAYS)),
                usage_seconds,
                price_per_minute: price,
                payment_id,
                payment_link: payment_link.clone(),
                metadata: Some(metadata),
                period_start: billing_period.start,
                period_end: billing_period.end,
            },
        )
        .await?;

        store::billing::set_last_billed_month(&self.pool, company_id, billing_period.start).await?;

        // Best-effort notification; a mail failure never fails the tenant.
        let mail = email::invoice_issued(
            &billing_email,
            &company.name,
            &invoice.number,
            invoice.amount,
            &invoice.currency,
            payment_link.as_deref(),
        );
        if let Err(e) = self.mailer.send(mail).await {
            warn!("Invoice email for company {} failed: {}", company_id, e);
        }

        info!(
            "Invoiced company {}: {} for {} {} ({} - {})",
            company_id,
            invoice.number,
            invoice.amount,
            invoice.currency,
            billing_period.start,
            billing_period.end
        );

        Ok(Some(InvoiceSummary {
            invoice_id: invoice.id,
            company_id,
            number: invoice.number,
            amount: invoice.amount,
            status: invoice.status,
            payment_link,
            period_start: billing_period.start,
            period_end: billing_period.end,
        }))
    }
}
