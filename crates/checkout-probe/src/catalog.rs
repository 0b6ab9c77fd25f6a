//! Catalog reading, sorting and product detail navigation.

use crate::assertion;
use crate::controls;
use crate::driver::StoreDriver;
use crate::flow::{self, LogicalPage};
use crate::locator::Selector;
use crate::page::Page;
use crate::result::{ProbeError, ProbeResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// One entry of the product listing, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// 0-based display position
    pub index: usize,
    /// Product name
    pub name: String,
    /// Unit price
    pub price: f64,
}

/// Sort orders offered by the sort selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    /// Name (A to Z)
    NameAsc,
    /// Name (Z to A)
    NameDesc,
    /// Price (low to high)
    PriceAsc,
    /// Price (high to low)
    PriceDesc,
}

impl SortMode {
    /// All modes
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::PriceAsc, Self::PriceDesc];

    /// Option value of the selector
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::NameAsc => "az",
            Self::NameDesc => "za",
            Self::PriceAsc => "lohi",
            Self::PriceDesc => "hilo",
        }
    }

    /// Visible option label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "Name (A to Z)",
            Self::NameDesc => "Name (Z to A)",
            Self::PriceAsc => "Price (low to high)",
            Self::PriceDesc => "Price (high to low)",
        }
    }

    /// Parse an option value
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.value() == value)
    }

    /// Whether the mode orders by price
    #[must_use]
    pub const fn by_price(self) -> bool {
        matches!(self, Self::PriceAsc | Self::PriceDesc)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Parse a displayed price such as `$29.99`
///
/// Malformed text is a fatal [`ProbeError::Parse`].
pub fn parse_price(text: &str) -> ProbeResult<f64> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    match digits.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ProbeError::Parse {
            what: "price",
            text: text.to_string(),
        }),
    }
}

/// Parse the amount out of a labelled summary line such as `Tax: $2.40`
///
/// The whole trimmed label must match; a truncated, signed or grouped amount
/// is a fatal [`ProbeError::Parse`].
pub fn parse_summary_amount(label: &str) -> ProbeResult<f64> {
    static AMOUNT: OnceLock<Option<Regex>> = OnceLock::new();
    let parse_error = || ProbeError::Parse {
        what: "summary amount",
        text: label.to_string(),
    };
    let re = AMOUNT
        .get_or_init(|| Regex::new(r"^(?:Item total|Tax|Total): \$(\d+(?:\.\d{2})?)$").ok())
        .as_ref()
        .ok_or_else(parse_error)?;
    re.captures(label.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(parse_error)
}

/// Read the listing in display order
pub async fn read_catalog<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<Vec<CatalogItem>> {
    let names = page.texts(&Selector::css(controls::ITEM_NAME)).await?;
    let prices = page.texts(&Selector::css(controls::ITEM_PRICE)).await?;
    assertion::expect_eq("price count", &names.len(), &prices.len())?;
    names
        .into_iter()
        .zip(prices)
        .enumerate()
        .map(|(index, (name, price))| {
            Ok(CatalogItem {
                index,
                name,
                price: parse_price(&price)?,
            })
        })
        .collect()
}

/// Read one entry without reading the whole listing
pub async fn read_item<D: StoreDriver>(page: &mut Page<D>, index: usize) -> ProbeResult<CatalogItem> {
    let name_sel = Selector::css(controls::ITEM_NAME).nth(index);
    let price_sel = Selector::css(controls::ITEM_PRICE).nth(index);
    page.wait_for_visible(&name_sel).await?;
    let name = page.text(&name_sel).await?.ok_or_else(|| ProbeError::ElementNotFound {
        selector: name_sel.to_string(),
    })?;
    let price = page.text(&price_sel).await?.ok_or_else(|| ProbeError::ElementNotFound {
        selector: price_sel.to_string(),
    })?;
    Ok(CatalogItem {
        index,
        name,
        price: parse_price(&price)?,
    })
}

/// Choose a sort order and return the re-read listing
///
/// Waits for the selector to report the chosen value. Callers must
/// re-resolve indices afterwards.
pub async fn sort_by<D: StoreDriver>(
    page: &mut Page<D>,
    mode: SortMode,
) -> ProbeResult<Vec<CatalogItem>> {
    let select = Selector::css(controls::SORT_SELECT);
    page.select_option(&select, mode.value()).await?;
    page.wait_for_value(&select, mode.value()).await?;
    debug!(mode = %mode, "Catalog sorted");
    read_catalog(page).await
}

/// Names or prices of `before` arranged the way `mode` should display them
#[must_use]
pub fn expected_order(before: &[CatalogItem], mode: SortMode) -> Vec<String> {
    if mode.by_price() {
        let mut prices: Vec<f64> = before.iter().map(|i| i.price).collect();
        prices.sort_by(f64::total_cmp);
        if mode == SortMode::PriceDesc {
            prices.reverse();
        }
        prices.into_iter().map(|p| format!("{p:.2}")).collect()
    } else {
        let mut names: Vec<String> = before.iter().map(|i| i.name.clone()).collect();
        names.sort();
        if mode == SortMode::NameDesc {
            names.reverse();
        }
        names
    }
}

/// Check `after` is `before` sorted by `mode`
///
/// Name modes compare the name sequence, price modes the price sequence.
pub fn verify_sorted(before: &[CatalogItem], after: &[CatalogItem], mode: SortMode) -> ProbeResult<()> {
    let observed: Vec<String> = if mode.by_price() {
        after.iter().map(|i| format!("{:.2}", i.price)).collect()
    } else {
        after.iter().map(|i| i.name.clone()).collect()
    };
    assertion::expect_eq(
        &format!("{mode} order"),
        &expected_order(before, mode),
        &observed,
    )
}

/// Open the detail page of the entry at `index`
pub async fn open_product<D: StoreDriver>(
    page: &mut Page<D>,
    index: usize,
) -> ProbeResult<CatalogItem> {
    flow::check_transition(page.location(), LogicalPage::ProductDetail)?;
    let item = read_item(page, index).await?;
    page.click(&Selector::css(controls::ITEM_NAME).nth(index)).await?;
    flow::verify_arrival(page, LogicalPage::ProductDetail).await?;
    assertion::expect_text(page, &Selector::css(controls::DETAILS_NAME), &item.name).await?;
    let shown = page.text(&Selector::css(controls::DETAILS_PRICE)).await?;
    let shown = parse_price(shown.as_deref().unwrap_or_default())?;
    assertion::expect_close("detail price", item.price, shown, 2)?;
    Ok(item)
}

/// Return from a product detail page to the listing
pub async fn back_to_products<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    flow::navigate(page, LogicalPage::Catalog).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: usize, name: &str, price: f64) -> CatalogItem {
        CatalogItem {
            index,
            name: name.to_string(),
            price,
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_price() {
            assert!((parse_price("$29.99").unwrap() - 29.99).abs() < 1e-9);
            assert!((parse_price(" 7.99 ").unwrap() - 7.99).abs() < 1e-9);
        }

        #[test]
        fn test_parse_price_rejects_garbage() {
            for text in ["", "$", "free", "$-1.00", "$NaN", "$inf"] {
                assert!(
                    matches!(parse_price(text), Err(ProbeError::Parse { what: "price", .. })),
                    "{text:?} should not parse"
                );
            }
        }

        #[test]
        fn test_parse_summary_amount() {
            assert!((parse_summary_amount("Item total: $39.98").unwrap() - 39.98).abs() < 1e-9);
            assert!((parse_summary_amount("Tax: $3.20").unwrap() - 3.2).abs() < 1e-9);
            assert!((parse_summary_amount("Total: $43").unwrap() - 43.0).abs() < 1e-9);
            assert!(parse_summary_amount("Total: --").is_err());
        }

        #[test]
        fn test_parse_summary_amount_rejects_partial_numbers() {
            for text in ["Total: $1,234.56", "Tax: $-2.40", "Total: 12abc", "Total: $12.5", "Discount: $1.00"] {
                assert!(
                    matches!(
                        parse_summary_amount(text),
                        Err(ProbeError::Parse { what: "summary amount", .. })
                    ),
                    "{text:?} should not parse"
                );
            }
        }
    }

    mod sort_tests {
        use super::*;

        #[test]
        fn test_mode_values_round_trip() {
            for mode in SortMode::ALL {
                assert_eq!(SortMode::from_value(mode.value()), Some(mode));
            }
            assert_eq!(SortMode::from_value("random"), None);
        }

        #[test]
        fn test_verify_sorted_by_name() {
            let before = vec![item(0, "b", 1.0), item(1, "a", 2.0), item(2, "c", 3.0)];
            let after = vec![item(0, "c", 3.0), item(1, "b", 1.0), item(2, "a", 2.0)];
            assert!(verify_sorted(&before, &after, SortMode::NameDesc).is_ok());
            assert!(verify_sorted(&before, &after, SortMode::NameAsc).is_err());
        }

        #[test]
        fn test_verify_sorted_by_price_ignores_tie_order() {
            let before = vec![item(0, "x", 15.99), item(1, "y", 7.99), item(2, "z", 15.99)];
            let after = vec![item(0, "y", 7.99), item(1, "z", 15.99), item(2, "x", 15.99)];
            assert!(verify_sorted(&before, &after, SortMode::PriceAsc).is_ok());
            assert!(verify_sorted(&before, &after, SortMode::PriceDesc).is_err());
        }

        #[test]
        fn test_unsorted_listing_fails() {
            let before = vec![item(0, "a", 1.0), item(1, "b", 2.0)];
            let err = verify_sorted(&before, &before, SortMode::PriceDesc).unwrap_err();
            assert!(matches!(err, ProbeError::AssertionFailed { .. }));
        }
    }
}
