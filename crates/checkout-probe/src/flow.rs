//! Logical pages of the storefront and the transitions between them.
//!
//! Every move between pages is checked against the declared table before any
//! action is issued, then verified on arrival by URL plus a page-identifying
//! heading or element.

use crate::assertion;
use crate::controls::{self, routes};
use crate::driver::StoreDriver;
use crate::locator::Selector;
use crate::page::Page;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::UrlPattern;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tracing::info;

/// Where the scenario believes the browser is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalPage {
    /// Login page
    Unauthenticated,
    /// Product listing
    Catalog,
    /// Single product
    ProductDetail,
    /// Cart listing
    Cart,
    /// Customer information form
    CheckoutInfo,
    /// Order summary
    CheckoutOverview,
    /// Order placed
    CheckoutComplete,
}

/// What drives a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Click a fixed control
    Control(&'static str),
    /// Click the name of one catalog entry
    ProductLink,
    /// Submit the login form
    Login,
    /// Submit the checkout information form
    SubmitInfo,
    /// Open the menu and log out
    Logout,
}

impl LogicalPage {
    /// All logical pages
    pub const ALL: [Self; 7] = [
        Self::Unauthenticated,
        Self::Catalog,
        Self::ProductDetail,
        Self::Cart,
        Self::CheckoutInfo,
        Self::CheckoutOverview,
        Self::CheckoutComplete,
    ];

    /// Route path of this page
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Unauthenticated => routes::LOGIN,
            Self::Catalog => routes::INVENTORY,
            Self::ProductDetail => routes::INVENTORY_ITEM,
            Self::Cart => routes::CART,
            Self::CheckoutInfo => routes::CHECKOUT_INFO,
            Self::CheckoutOverview => routes::CHECKOUT_OVERVIEW,
            Self::CheckoutComplete => routes::CHECKOUT_COMPLETE,
        }
    }

    /// URL pattern the browser must match on arrival
    #[must_use]
    pub fn url(self) -> UrlPattern {
        UrlPattern::path(self.route())
    }

    /// Text of the `.title` heading, for pages that have one
    #[must_use]
    pub const fn heading(self) -> Option<&'static str> {
        match self {
            Self::Catalog => Some("Products"),
            Self::Cart => Some("Your Cart"),
            Self::CheckoutInfo => Some("Checkout: Your Information"),
            Self::CheckoutOverview => Some("Checkout: Overview"),
            Self::CheckoutComplete => Some("Checkout: Complete!"),
            Self::Unauthenticated | Self::ProductDetail => None,
        }
    }

    /// Element whose presence identifies the page
    #[must_use]
    pub fn marker(self) -> Selector {
        Selector::css(match self {
            Self::Unauthenticated => controls::LOGIN_BUTTON,
            Self::Catalog => controls::INVENTORY_LIST,
            Self::ProductDetail => controls::DETAILS_NAME,
            Self::Cart => controls::CHECKOUT,
            Self::CheckoutInfo => controls::FIRST_NAME,
            Self::CheckoutOverview => controls::FINISH,
            Self::CheckoutComplete => controls::COMPLETE_HEADER,
        })
    }

    /// Whether a session must exist to be here
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    /// Declared outgoing transitions
    #[must_use]
    pub fn transitions(self) -> Vec<(Self, Trigger)> {
        use Trigger::{Control, Login, Logout, ProductLink, SubmitInfo};
        let mut edges = match self {
            Self::Unauthenticated => vec![(Self::Catalog, Login)],
            Self::Catalog => vec![
                (Self::ProductDetail, ProductLink),
                (Self::Cart, Control(controls::CART_LINK)),
            ],
            Self::ProductDetail => vec![
                (Self::Catalog, Control(controls::BACK_TO_PRODUCTS)),
                (Self::Cart, Control(controls::CART_LINK)),
            ],
            Self::Cart => vec![
                (Self::Catalog, Control(controls::CONTINUE_SHOPPING)),
                (Self::CheckoutInfo, Control(controls::CHECKOUT)),
            ],
            Self::CheckoutInfo => vec![
                (Self::CheckoutOverview, SubmitInfo),
                (Self::Cart, Control(controls::CANCEL)),
            ],
            Self::CheckoutOverview => vec![
                (Self::CheckoutComplete, Control(controls::FINISH)),
                (Self::Catalog, Control(controls::CANCEL)),
                (Self::Cart, Control(controls::CART_LINK)),
            ],
            Self::CheckoutComplete => vec![
                (Self::Catalog, Control(controls::BACK_TO_PRODUCTS)),
                (Self::Cart, Control(controls::CART_LINK)),
            ],
        };
        if self.requires_auth() {
            edges.push((Self::Unauthenticated, Logout));
        }
        edges
    }

    /// Trigger for `self -> to`, if declared
    #[must_use]
    pub fn trigger_to(self, to: Self) -> Option<Trigger> {
        self.transitions()
            .into_iter()
            .find(|(target, _)| *target == to)
            .map(|(_, trigger)| trigger)
    }

    /// Pages reachable from `self` (breadth-first)
    #[must_use]
    pub fn reachable(self) -> HashSet<Self> {
        let mut seen = HashSet::from([self]);
        let mut queue = VecDeque::from([self]);
        while let Some(current) = queue.pop_front() {
            for (next, _) in current.transitions() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

impl fmt::Display for LogicalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Reject an undeclared transition before anything is clicked
pub fn check_transition(from: LogicalPage, to: LogicalPage) -> ProbeResult<Trigger> {
    from.trigger_to(to).ok_or_else(|| ProbeError::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Move along a control-driven edge and verify arrival
///
/// Edges that need input (login, form submission, product choice, logout)
/// belong to their helpers and are rejected here.
pub async fn navigate<D: StoreDriver>(page: &mut Page<D>, to: LogicalPage) -> ProbeResult<()> {
    let from = page.location();
    match check_transition(from, to)? {
        Trigger::Control(css) => {
            page.click(&Selector::css(css)).await?;
            verify_arrival(page, to).await
        }
        _ => Err(ProbeError::InvalidTransition {
            from: from.to_string(),
            to: format!("{to} (requires a dedicated helper)"),
        }),
    }
}

/// Confirm the browser shows `to`, then record it as the current page
pub async fn verify_arrival<D: StoreDriver>(page: &mut Page<D>, to: LogicalPage) -> ProbeResult<()> {
    assertion::expect_url(page, &to.url()).await?;
    match to.heading() {
        Some(heading) => {
            assertion::expect_text(page, &Selector::css(controls::TITLE), heading).await?;
        }
        None => assertion::expect_visible(page, &to.marker()).await?,
    }
    info!(from = %page.location(), to = %to, "Transition verified");
    page.set_location(to);
    Ok(())
}
