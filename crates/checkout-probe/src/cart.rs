//! Cart Helper
//!
//! [`Cart`] is the harness's own record of what should be in the cart (the
//! *expected cart*). After every mutation the badge is checked against it:
//! the badge shows the line count, or is absent when the cart is empty.
//!
//! Indices are 0-based positions in the current display order. After a sort
//! they refer to the new order.

use crate::assertion;
use crate::catalog::{self, parse_price, CatalogItem};
use crate::controls;
use crate::driver::StoreDriver;
use crate::flow::{self, LogicalPage};
use crate::locator::Selector;
use crate::page::Page;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One line of the expected cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog position the line was added from, if known
    pub catalog_index: Option<usize>,
    /// Product name
    pub name: String,
    /// Unit price
    pub price: f64,
}

impl From<&CatalogItem> for CartLine {
    fn from(item: &CatalogItem) -> Self {
        Self {
            catalog_index: Some(item.index),
            name: item.name.clone(),
            price: item.price,
        }
    }
}

/// The expected cart, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

fn badge() -> Selector {
    Selector::css(controls::CART_BADGE)
}

/// Badge count; `None` when the badge is absent
pub async fn badge_count<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<Option<usize>> {
    if !page.is_visible(&badge()).await? {
        return Ok(None);
    }
    match page.text(&badge()).await? {
        None => Ok(None),
        Some(text) => text
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ProbeError::Parse {
                what: "cart badge",
                text,
            }),
    }
}

/// Items in the cart according to the badge (0 when absent)
pub async fn item_count<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<usize> {
    Ok(badge_count(page).await?.unwrap_or(0))
}

/// Whether the badge reports an empty cart
pub async fn is_empty<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<bool> {
    Ok(item_count(page).await? == 0)
}

/// Line names on the cart page, in display order
pub async fn product_names<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<Vec<String>> {
    page.texts(&Selector::css(controls::CART_ITEM_NAME)).await
}

/// Line prices on the cart page, in display order
pub async fn product_prices<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<Vec<f64>> {
    page.texts(&Selector::css(controls::CART_ITEM_PRICE))
        .await?
        .iter()
        .map(|p| parse_price(p))
        .collect()
}

/// Open the cart page from wherever the header is shown
pub async fn go_to_cart<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    if page.location() == LogicalPage::Cart {
        return Ok(());
    }
    flow::navigate(page, LogicalPage::Cart).await
}

impl Cart {
    /// Empty expected cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected lines
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Expected line count
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing is expected in the cart
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of expected line prices
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(|l| l.price).sum()
    }

    /// Forget every line without touching the page (order placed)
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Check the badge against the expected line count
    pub async fn verify_badge<D: StoreDriver>(&self, page: &mut Page<D>) -> ProbeResult<()> {
        let expected = self.len();
        let waited = if expected == 0 {
            page.wait_for_hidden(&badge()).await
        } else {
            page.wait_for_text(&badge(), &expected.to_string()).await
        };
        match waited {
            Ok(_) => Ok(()),
            Err(e) if e.is_timeout() => {
                let observed = match badge_count(page).await? {
                    Some(n) => format!("badge {n}"),
                    None => "badge absent".to_string(),
                };
                Err(ProbeError::assertion(
                    if expected == 0 {
                        "badge absent".to_string()
                    } else {
                        format!("badge {expected}")
                    },
                    observed,
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Check the cart page lists exactly the expected lines, in order
    pub async fn verify_listing<D: StoreDriver>(&self, page: &mut Page<D>) -> ProbeResult<()> {
        let names = product_names(page).await?;
        let expected: Vec<String> = self.lines.iter().map(|l| l.name.clone()).collect();
        assertion::expect_eq("cart lines", &expected, &names)?;
        let prices = product_prices(page).await?;
        for (line, shown) in self.lines.iter().zip(prices) {
            assertion::expect_close(&line.name, line.price, shown, 2)?;
        }
        Ok(())
    }

    /// Add the catalog entry at `index`
    ///
    /// Waits for its toggle to read "Remove" and the badge to show the new
    /// count.
    pub async fn add<D: StoreDriver>(&mut self, page: &mut Page<D>, index: usize) -> ProbeResult<()> {
        expect_on(page, LogicalPage::Catalog)?;
        let item = catalog::read_item(page, index).await?;
        let toggle = Selector::css(controls::INVENTORY_BUTTON).nth(index);
        assertion::expect_text(page, &toggle, controls::ADD_TO_CART_TEXT).await?;
        page.click(&toggle).await?;
        assertion::expect_text(page, &toggle, controls::REMOVE_TEXT).await?;
        self.lines.push(CartLine::from(&item));
        debug!(index, name = %item.name, count = self.len(), "Added to cart");
        self.verify_badge(page).await
    }

    /// Add several catalog entries, in the given order
    pub async fn add_many<D: StoreDriver>(
        &mut self,
        page: &mut Page<D>,
        indices: &[usize],
    ) -> ProbeResult<()> {
        for &index in indices {
            self.add(page, index).await?;
        }
        Ok(())
    }

    /// Add the product shown on the detail page
    pub async fn add_from_detail<D: StoreDriver>(
        &mut self,
        page: &mut Page<D>,
        item: &CatalogItem,
    ) -> ProbeResult<()> {
        expect_on(page, LogicalPage::ProductDetail)?;
        let toggle = Selector::css(controls::INVENTORY_BUTTON);
        assertion::expect_text(page, &toggle, controls::ADD_TO_CART_TEXT).await?;
        page.click(&toggle).await?;
        assertion::expect_text(page, &toggle, controls::REMOVE_TEXT).await?;
        self.lines.push(CartLine::from(item));
        self.verify_badge(page).await
    }

    /// Toggle the catalog entry at `index` back out of the cart
    pub async fn remove_from_catalog<D: StoreDriver>(
        &mut self,
        page: &mut Page<D>,
        index: usize,
    ) -> ProbeResult<()> {
        expect_on(page, LogicalPage::Catalog)?;
        let item = catalog::read_item(page, index).await?;
        let position = self
            .lines
            .iter()
            .position(|l| l.name == item.name)
            .ok_or_else(|| {
                ProbeError::assertion(format!("{} in expected cart", item.name), "not added")
            })?;
        let toggle = Selector::css(controls::INVENTORY_BUTTON).nth(index);
        assertion::expect_text(page, &toggle, controls::REMOVE_TEXT).await?;
        page.click(&toggle).await?;
        assertion::expect_text(page, &toggle, controls::ADD_TO_CART_TEXT).await?;
        self.lines.remove(position);
        self.verify_badge(page).await
    }

    /// Remove the line at `position` on the cart page
    pub async fn remove<D: StoreDriver>(
        &mut self,
        page: &mut Page<D>,
        position: usize,
    ) -> ProbeResult<()> {
        expect_on(page, LogicalPage::Cart)?;
        let lines = Selector::css(controls::CART_ITEM);
        let before = page.count(&lines).await?;
        if position >= before {
            return Err(ProbeError::assertion(
                format!("cart line {position}"),
                format!("{before} lines"),
            ));
        }
        let name = page
            .text(&Selector::css(controls::CART_ITEM_NAME).nth(position))
            .await?
            .unwrap_or_default();
        page.click(&Selector::css(controls::CART_REMOVE).nth(position)).await?;
        assertion::expect_count(page, &lines, before - 1).await?;
        match self.lines.iter().position(|l| l.name == name) {
            Some(i) => {
                self.lines.remove(i);
            }
            None => {
                return Err(ProbeError::assertion(
                    format!("{name} in expected cart"),
                    "unexpected line",
                ))
            }
        }
        debug!(position, name = %name, count = self.len(), "Removed from cart");
        self.verify_badge(page).await
    }

    /// Empty the cart from any page showing the header
    ///
    /// Removes the first line until the badge reads 0, re-reading the count
    /// each time. Fails if a removal does not shrink the count.
    pub async fn clear<D: StoreDriver>(&mut self, page: &mut Page<D>) -> ProbeResult<()> {
        go_to_cart(page).await?;
        let lines = Selector::css(controls::CART_ITEM);
        let remove = Selector::css(controls::CART_REMOVE).first();
        loop {
            let count = item_count(page).await?;
            if count == 0 {
                break;
            }
            page.click(&remove).await?;
            let waited = page.wait_for_count(&lines, count - 1).await;
            let now = item_count(page).await?;
            if let Err(e) = waited {
                if now < count {
                    return Err(e);
                }
            }
            if now >= count {
                return Err(ProbeError::assertion(
                    format!("cart to shrink below {count}"),
                    format!("{now}"),
                ));
            }
        }
        self.lines.clear();
        info!("Cart cleared");
        self.verify_badge(page).await
    }
}

fn expect_on<D: StoreDriver>(page: &Page<D>, expected: LogicalPage) -> ProbeResult<()> {
    if page.location() == expected {
        Ok(())
    } else {
        Err(ProbeError::assertion(
            format!("to be on {expected}"),
            format!("on {}", page.location()),
        ))
    }
}
