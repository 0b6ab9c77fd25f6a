//! Checkout: customer form, validation, overview totals and completion.

use crate::assertion;
use crate::catalog::parse_summary_amount;
use crate::controls;
use crate::driver::StoreDriver;
use crate::flow::{self, LogicalPage};
use crate::locator::Selector;
use crate::page::{Arrival, Page};
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Decimal places the order summary must agree to
pub const SUMMARY_DECIMALS: i32 = 2;

/// Customer details entered at checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Postal code
    pub postal_code: String,
}

impl CheckoutInfo {
    /// Create customer details
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Copy with one field blanked
    #[must_use]
    pub fn without(&self, field: FormField) -> Self {
        let mut info = self.clone();
        match field {
            FormField::FirstName => info.first_name.clear(),
            FormField::LastName => info.last_name.clear(),
            FormField::PostalCode => info.postal_code.clear(),
        }
        info
    }

    /// Value of a field
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::PostalCode => &self.postal_code,
        }
    }

    /// First empty field in validation order
    #[must_use]
    pub fn first_missing(&self) -> Option<FormField> {
        FormField::ALL.into_iter().find(|f| self.value(*f).is_empty())
    }
}

/// Fields of the customer form, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Postal code
    PostalCode,
}

impl FormField {
    /// Validation order
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::PostalCode];

    /// Input control
    #[must_use]
    pub fn selector(self) -> Selector {
        Selector::css(match self {
            Self::FirstName => controls::FIRST_NAME,
            Self::LastName => controls::LAST_NAME,
            Self::PostalCode => controls::POSTAL_CODE,
        })
    }

    /// Label used in error messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::PostalCode => "Postal Code",
        }
    }

    /// Substring the error banner shows when this field is missing
    #[must_use]
    pub fn required_message(self) -> String {
        format!("{} is required", self.label())
    }

    /// Field named by an error banner
    #[must_use]
    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| message.contains(&f.required_message()))
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of submitting the customer form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Overview reached
    Advanced,
    /// Error banner shown
    Rejected {
        /// Field the banner names, if recognised
        field: Option<FormField>,
        /// Banner text
        message: String,
    },
}

impl Submission {
    /// Error for a rejection, `Ok` when advanced
    pub fn into_result(self) -> ProbeResult<()> {
        match self {
            Self::Advanced => Ok(()),
            Self::Rejected { field, message } => Err(ProbeError::ValidationRejected {
                field: field.map_or_else(|| "unknown".to_string(), |f| f.label().to_string()),
                message,
            }),
        }
    }
}

/// Subtotal, tax and total read from the overview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Item total
    pub subtotal: f64,
    /// Tax
    pub tax: f64,
    /// Grand total
    pub total: f64,
}

impl OrderSummary {
    /// Check `total == subtotal + tax` to two decimal places
    pub fn verify(&self) -> ProbeResult<()> {
        assertion::expect_close(
            "total (subtotal + tax)",
            self.subtotal + self.tax,
            self.total,
            SUMMARY_DECIMALS,
        )
    }

    /// Check the item total against the expected lines
    pub fn verify_subtotal(&self, expected: f64) -> ProbeResult<()> {
        assertion::expect_close("item total", expected, self.subtotal, SUMMARY_DECIMALS)
    }
}

fn error_banner() -> Selector {
    Selector::test_id(controls::ERROR_TEST_ID)
}

/// Start checkout from the cart page
pub async fn begin<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    flow::navigate(page, LogicalPage::CheckoutInfo).await
}

/// Type the non-empty fields; empty ones are left untouched
pub async fn fill_info<D: StoreDriver>(page: &mut Page<D>, info: &CheckoutInfo) -> ProbeResult<()> {
    for field in FormField::ALL {
        let value = info.value(field);
        if !value.is_empty() {
            page.fill(&field.selector(), value).await?;
        }
    }
    Ok(())
}

/// Press continue and observe either the overview or the error banner
pub async fn submit<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<Submission> {
    flow::check_transition(page.location(), LogicalPage::CheckoutOverview)?;
    page.click(&Selector::css(controls::CONTINUE)).await?;
    match page
        .wait_for_url_or_visible(&LogicalPage::CheckoutOverview.url(), &error_banner())
        .await?
    {
        Arrival::Url => {
            flow::verify_arrival(page, LogicalPage::CheckoutOverview).await?;
            Ok(Submission::Advanced)
        }
        Arrival::Element => {
            let message = page.text(&error_banner()).await?.unwrap_or_default();
            let field = FormField::from_message(&message);
            warn!(field = ?field, message = %message, "Checkout form rejected");
            Ok(Submission::Rejected { field, message })
        }
    }
}

/// Fill the form and submit it
pub async fn submit_info<D: StoreDriver>(
    page: &mut Page<D>,
    info: &CheckoutInfo,
) -> ProbeResult<Submission> {
    fill_info(page, info).await?;
    submit(page).await
}

/// Fill, submit and require the overview
pub async fn continue_with<D: StoreDriver>(page: &mut Page<D>, info: &CheckoutInfo) -> ProbeResult<()> {
    submit_info(page, info).await?.into_result()
}

/// Submit incomplete details and require the matching field error
///
/// Returns the banner text.
pub async fn expect_rejection<D: StoreDriver>(
    page: &mut Page<D>,
    info: &CheckoutInfo,
) -> ProbeResult<String> {
    let field = info.first_missing().ok_or_else(|| {
        ProbeError::assertion("customer details with a missing field", "all fields present")
    })?;
    match submit_info(page, info).await? {
        Submission::Advanced => Err(ProbeError::assertion(
            format!("error {:?}", field.required_message()),
            "advanced to overview",
        )),
        Submission::Rejected { message, .. } => {
            assertion::expect_contains(&message, &field.required_message())?;
            Ok(message)
        }
    }
}

/// Close the form error and confirm the form is still editable
pub async fn dismiss_error<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    page.click(&Selector::css(controls::ERROR_DISMISS)).await?;
    assertion::expect_hidden(page, &error_banner()).await?;
    for field in FormField::ALL {
        assertion::expect_visible(page, &field.selector()).await?;
    }
    Ok(())
}

/// Read and check the overview summary
pub async fn read_summary<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<OrderSummary> {
    if page.location() != LogicalPage::CheckoutOverview {
        return Err(ProbeError::assertion(
            "to be on CheckoutOverview",
            format!("on {}", page.location()),
        ));
    }
    let subtotal = summary_amount(page, controls::SUBTOTAL_LABEL).await?;
    let tax = summary_amount(page, controls::TAX_LABEL).await?;
    let total = summary_amount(page, controls::TOTAL_LABEL).await?;
    let summary = OrderSummary {
        subtotal,
        tax,
        total,
    };
    summary.verify()?;
    Ok(summary)
}

async fn summary_amount<D: StoreDriver>(page: &mut Page<D>, css: &str) -> ProbeResult<f64> {
    let selector = Selector::css(css);
    page.wait_for_visible(&selector).await?;
    let label = page.text(&selector).await?.unwrap_or_default();
    parse_summary_amount(&label)
}

/// Place the order and confirm the completion page
pub async fn finish<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    flow::navigate(page, LogicalPage::CheckoutComplete).await?;
    assertion::expect_text(
        page,
        &Selector::css(controls::COMPLETE_HEADER),
        controls::ORDER_COMPLETE_TEXT,
    )
    .await?;
    info!("Order placed");
    Ok(())
}

/// Leave checkout: form returns to the cart, overview to the catalog
pub async fn cancel<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    let to = match page.location() {
        LogicalPage::CheckoutInfo => LogicalPage::Cart,
        LogicalPage::CheckoutOverview => LogicalPage::Catalog,
        other => {
            return Err(ProbeError::InvalidTransition {
                from: other.to_string(),
                to: "cancel checkout".to_string(),
            })
        }
    };
    flow::navigate(page, to).await
}

/// Return from the completion page to the catalog
pub async fn back_home<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    flow::navigate(page, LogicalPage::Catalog).await
}
