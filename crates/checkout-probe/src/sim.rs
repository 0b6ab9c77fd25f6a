//! SimulatedStore - in-memory storefront
//!
//! Answers to the same routes and controls as the live application: the
//! six-item catalog, the four personas, sorting, a cart that persists per
//! account for the lifetime of the session, checkout validation with 8% tax,
//! dismissible error banners and the logout menu.
//!
//! Persona behavior mirrors the live store:
//! - `problem_user`: sorting is ignored and typing into the last-name field
//!   overwrites the first name.
//! - `performance_glitch_user`: the post-login navigation lands only after
//!   [`SimulatedStore::with_glitch_latency`] has elapsed.
//! - `locked_out_user`: login is refused.

use crate::catalog::SortMode;
use crate::controls::{self, routes};
use crate::driver::{DriverFactory, StoreDriver};
use crate::locator::Selector;
use crate::persona::{Persona, DEFAULT_PASSWORD};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::path_of;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default post-login delay for the performance-glitch account
pub const DEFAULT_GLITCH_LATENCY_MS: u64 = 1_500;

/// Sales tax, percent
pub const TAX_PERCENT: u32 = 8;

const ERROR_CSS: &str = "[data-test=\"error\"]";

#[derive(Debug, Clone, Copy)]
struct Product {
    id: u32,
    name: &'static str,
    price_cents: u32,
}

const PRODUCTS: [Product; 6] = [
    Product {
        id: 4,
        name: "Sauce Labs Backpack",
        price_cents: 2999,
    },
    Product {
        id: 0,
        name: "Sauce Labs Bike Light",
        price_cents: 999,
    },
    Product {
        id: 1,
        name: "Sauce Labs Bolt T-Shirt",
        price_cents: 1599,
    },
    Product {
        id: 5,
        name: "Sauce Labs Fleece Jacket",
        price_cents: 4999,
    },
    Product {
        id: 2,
        name: "Sauce Labs Onesie",
        price_cents: 799,
    },
    Product {
        id: 3,
        name: "Test.allTheThings() T-Shirt (Red)",
        price_cents: 1599,
    },
];

fn product(id: u32) -> Option<Product> {
    PRODUCTS.iter().copied().find(|p| p.id == id)
}

/// `$29.99` style rendering
#[must_use]
pub fn format_money(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Tax on a subtotal, rounded half-up to the cent
#[must_use]
pub const fn tax_cents(subtotal_cents: u32) -> u32 {
    (subtotal_cents * TAX_PERCENT + 50) / 100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Blank,
    Login,
    Inventory,
    Item(u32),
    Cart,
    CheckoutInfo,
    Overview,
    Complete,
}

impl View {
    const fn route(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::Login => routes::LOGIN,
            Self::Inventory => routes::INVENTORY,
            Self::Item(_) => routes::INVENTORY_ITEM,
            Self::Cart => routes::CART,
            Self::CheckoutInfo => routes::CHECKOUT_INFO,
            Self::Overview => routes::CHECKOUT_OVERVIEW,
            Self::Complete => routes::CHECKOUT_COMPLETE,
        }
    }

    const fn heading(self) -> Option<&'static str> {
        match self {
            Self::Inventory => Some("Products"),
            Self::Cart => Some("Your Cart"),
            Self::CheckoutInfo => Some("Checkout: Your Information"),
            Self::Overview => Some("Checkout: Overview"),
            Self::Complete => Some("Checkout: Complete!"),
            Self::Blank | Self::Login | Self::Item(_) => None,
        }
    }

    const fn requires_auth(self) -> bool {
        !matches!(self, Self::Blank | Self::Login)
    }
}

/// Deliberate misbehavior, for exercising the harness's failure paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The badge shows this text whatever the cart holds
    BadgeText(String),
    /// Remove controls on the cart page do nothing
    InertCartRemove,
}

/// In-memory implementation of [`StoreDriver`]
#[derive(Debug)]
pub struct SimulatedStore {
    base_url: String,
    glitch_latency: Duration,
    view: View,
    user: Option<Persona>,
    carts: HashMap<Persona, Vec<u32>>,
    username: String,
    password: String,
    customer: [String; 3],
    error: Option<String>,
    sort: SortMode,
    menu_open: bool,
    pending: Option<(Instant, View)>,
    faults: Vec<Fault>,
    actions: Vec<String>,
    closed: bool,
}

impl SimulatedStore {
    /// Blank session against `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            glitch_latency: Duration::from_millis(DEFAULT_GLITCH_LATENCY_MS),
            view: View::Blank,
            user: None,
            carts: HashMap::new(),
            username: String::new(),
            password: String::new(),
            customer: Default::default(),
            error: None,
            sort: SortMode::NameAsc,
            menu_open: false,
            pending: None,
            faults: Vec::new(),
            actions: Vec::new(),
            closed: false,
        }
    }

    /// Set the performance-glitch login delay
    #[must_use]
    pub const fn with_glitch_latency(mut self, latency: Duration) -> Self {
        self.glitch_latency = latency;
        self
    }

    /// Inject a fault
    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    /// State-changing driver calls received, in order
    ///
    /// Reads and wait polls are not recorded.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Number of lines in an account's persisted cart
    #[must_use]
    pub fn cart_size(&self, persona: Persona) -> usize {
        self.carts.get(&persona).map_or(0, Vec::len)
    }

    /// Whether the session was closed
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn enter(&mut self) -> ProbeResult<()> {
        if self.closed {
            return Err(ProbeError::Driver {
                message: "session closed".to_string(),
            });
        }
        if let Some((at, view)) = self.pending {
            if Instant::now() >= at {
                self.pending = None;
                self.show(view);
            }
        }
        Ok(())
    }

    fn act(&mut self, action: String) -> ProbeResult<()> {
        self.enter()?;
        self.actions.push(action);
        Ok(())
    }

    fn badge_override(&self) -> Option<&str> {
        self.faults.iter().find_map(|f| match f {
            Fault::BadgeText(text) => Some(text.as_str()),
            Fault::InertCartRemove => None,
        })
    }

    fn show(&mut self, view: View) {
        self.view = view;
        self.error = None;
        self.menu_open = false;
    }

    fn cart(&self) -> &[u32] {
        self.user
            .and_then(|u| self.carts.get(&u))
            .map_or(&[] as &[u32], Vec::as_slice)
    }

    fn cart_products(&self) -> Vec<Product> {
        self.cart().iter().filter_map(|id| product(*id)).collect()
    }

    fn displayed(&self) -> Vec<Product> {
        let mut items = PRODUCTS.to_vec();
        match self.sort {
            SortMode::NameAsc => items.sort_by(|a, b| a.name.cmp(b.name)),
            SortMode::NameDesc => items.sort_by(|a, b| b.name.cmp(a.name)),
            SortMode::PriceAsc => items.sort_by_key(|p| p.price_cents),
            SortMode::PriceDesc => items.sort_by(|a, b| b.price_cents.cmp(&a.price_cents)),
        }
        items
    }

    fn toggle_label(&self, id: u32) -> String {
        if self.cart().contains(&id) {
            controls::REMOVE_TEXT.to_string()
        } else {
            controls::ADD_TO_CART_TEXT.to_string()
        }
    }

    fn toggle(&mut self, id: u32) {
        if let Some(user) = self.user {
            let cart = self.carts.entry(user).or_default();
            match cart.iter().position(|i| *i == id) {
                Some(pos) => {
                    cart.remove(pos);
                }
                None => cart.push(id),
            }
        }
    }

    fn summary(&self) -> (u32, u32) {
        let subtotal = self.cart_products().iter().map(|p| p.price_cents).sum();
        (subtotal, tax_cents(subtotal))
    }

    /// Text of every element matching `css` on the current view
    fn texts(&self, css: &str) -> Vec<String> {
        let one = |t: &str| vec![t.to_string()];
        if css == ERROR_CSS {
            return self.error.iter().cloned().collect();
        }
        if css == controls::ERROR_DISMISS {
            return if self.error.is_some() { one("") } else { vec![] };
        }
        if self.view.requires_auth() {
            match css {
                controls::CART_LINK => return one(""),
                controls::MENU_BUTTON => return one("Open Menu"),
                controls::APP_LOGO => return one("Swag Labs"),
                controls::FOOTER => return one(""),
                controls::MENU if self.menu_open => return one(""),
                controls::ALL_ITEMS_LINK if self.menu_open => return one("All Items"),
                controls::ABOUT_LINK if self.menu_open => return one("About"),
                controls::LOGOUT_LINK if self.menu_open => return one("Logout"),
                controls::RESET_LINK if self.menu_open => return one("Reset App State"),
                controls::CART_BADGE => {
                    if let Some(text) = self.badge_override() {
                        return one(text);
                    }
                    let n = self.cart().len();
                    return if n > 0 { vec![n.to_string()] } else { vec![] };
                }
                controls::TITLE => {
                    if let Some(heading) = self.view.heading() {
                        return one(heading);
                    }
                }
                _ => {}
            }
        }
        let names = |items: &[Product]| -> Vec<String> {
            items.iter().map(|p| p.name.to_string()).collect()
        };
        let prices = |items: &[Product]| -> Vec<String> {
            items
                .iter()
                .map(|p| format_money(p.price_cents))
                .collect()
        };
        match self.view {
            View::Blank => vec![],
            View::Login => match css {
                controls::USERNAME | controls::PASSWORD => one(""),
                controls::LOGIN_BUTTON => one("Login"),
                _ => vec![],
            },
            View::Inventory => {
                let items = self.displayed();
                match css {
                    controls::INVENTORY_LIST => one(""),
                    controls::INVENTORY_ITEM | controls::ITEM_NAME | controls::ITEM_IMAGE => {
                        names(&items)
                    }
                    controls::ITEM_PRICE => prices(&items),
                    controls::INVENTORY_BUTTON => {
                        items.iter().map(|p| self.toggle_label(p.id)).collect()
                    }
                    controls::SORT_SELECT => one(self.sort.label()),
                    _ => vec![],
                }
            }
            View::Item(id) => match (css, product(id)) {
                (controls::DETAILS_NAME, Some(p)) => one(p.name),
                (controls::DETAILS_PRICE, Some(p)) => vec![format_money(p.price_cents)],
                (controls::INVENTORY_BUTTON, Some(p)) => vec![self.toggle_label(p.id)],
                (controls::BACK_TO_PRODUCTS, _) => one("Back to products"),
                _ => vec![],
            },
            View::Cart | View::Overview => {
                let items = self.cart_products();
                match css {
                    controls::CART_ITEM | controls::CART_ITEM_NAME | controls::ITEM_NAME => {
                        names(&items)
                    }
                    controls::CART_ITEM_PRICE | controls::ITEM_PRICE => prices(&items),
                    controls::CART_REMOVE if self.view == View::Cart => {
                        vec![controls::REMOVE_TEXT.to_string(); items.len()]
                    }
                    controls::CONTINUE_SHOPPING if self.view == View::Cart => {
                        one("Continue Shopping")
                    }
                    controls::CHECKOUT if self.view == View::Cart => one("Checkout"),
                    controls::FINISH if self.view == View::Overview => one("Finish"),
                    controls::CANCEL if self.view == View::Overview => one("Cancel"),
                    controls::SUMMARY_INFO if self.view == View::Overview => one(""),
                    controls::SUBTOTAL_LABEL | controls::TAX_LABEL | controls::TOTAL_LABEL
                        if self.view == View::Overview =>
                    {
                        let (subtotal, tax) = self.summary();
                        vec![match css {
                            controls::SUBTOTAL_LABEL => {
                                format!("Item total: {}", format_money(subtotal))
                            }
                            controls::TAX_LABEL => format!("Tax: {}", format_money(tax)),
                            _ => format!("Total: {}", format_money(subtotal + tax)),
                        }]
                    }
                    _ => vec![],
                }
            }
            View::CheckoutInfo => match css {
                controls::FIRST_NAME | controls::LAST_NAME | controls::POSTAL_CODE => one(""),
                controls::CONTINUE => one("Continue"),
                controls::CANCEL => one("Cancel"),
                _ => vec![],
            },
            View::Complete => match css {
                controls::COMPLETE_HEADER => one(controls::ORDER_COMPLETE_TEXT),
                controls::BACK_TO_PRODUCTS => one("Back Home"),
                _ => vec![],
            },
        }
    }

    fn select(&self, selector: &Selector) -> Vec<String> {
        let all = self.texts(&selector.to_css());
        match selector.index() {
            Some(i) => all.into_iter().nth(i).into_iter().collect(),
            None => all,
        }
    }

    fn field_mut(&mut self, css: &str) -> Option<&mut String> {
        match (self.view, css) {
            (View::Login, controls::USERNAME) => Some(&mut self.username),
            (View::Login, controls::PASSWORD) => Some(&mut self.password),
            (View::CheckoutInfo, controls::FIRST_NAME) => Some(&mut self.customer[0]),
            // problem_user: the last-name input writes into the first name
            (View::CheckoutInfo, controls::LAST_NAME) if self.user == Some(Persona::Problem) => {
                Some(&mut self.customer[0])
            }
            (View::CheckoutInfo, controls::LAST_NAME) => Some(&mut self.customer[1]),
            (View::CheckoutInfo, controls::POSTAL_CODE) => Some(&mut self.customer[2]),
            _ => None,
        }
    }

    fn field(&self, css: &str) -> Option<String> {
        match (self.view, css) {
            (View::Login, controls::USERNAME) => Some(self.username.clone()),
            (View::Login, controls::PASSWORD) => Some(self.password.clone()),
            (View::CheckoutInfo, controls::FIRST_NAME) => Some(self.customer[0].clone()),
            (View::CheckoutInfo, controls::LAST_NAME) => Some(self.customer[1].clone()),
            (View::CheckoutInfo, controls::POSTAL_CODE) => Some(self.customer[2].clone()),
            (View::Inventory, controls::SORT_SELECT) => Some(self.sort.value().to_string()),
            _ => None,
        }
    }

    fn submit_login(&mut self) {
        let account = Persona::ALL
            .into_iter()
            .find(|p| p.default_username() == self.username);
        let message = if self.username.is_empty() {
            "Epic sadface: Username is required"
        } else if self.password.is_empty() {
            "Epic sadface: Password is required"
        } else {
            match account {
                Some(_) if self.password != DEFAULT_PASSWORD => {
                    "Epic sadface: Username and password do not match any user in this service"
                }
                None => "Epic sadface: Username and password do not match any user in this service",
                Some(Persona::LockedOut) => "Epic sadface: Sorry, this user has been locked out.",
                Some(persona) => {
                    self.user = Some(persona);
                    self.sort = SortMode::NameAsc;
                    self.username.clear();
                    self.password.clear();
                    if persona == Persona::PerformanceGlitch {
                        self.pending = Some((Instant::now() + self.glitch_latency, View::Inventory));
                    } else {
                        self.show(View::Inventory);
                    }
                    return;
                }
            }
        };
        self.error = Some(message.to_string());
    }

    fn submit_customer(&mut self) {
        let missing = ["First Name", "Last Name", "Postal Code"]
            .iter()
            .zip(&self.customer)
            .find(|(_, value)| value.is_empty())
            .map(|(label, _)| *label);
        match missing {
            Some(label) => self.error = Some(format!("Error: {label} is required")),
            None => self.show(View::Overview),
        }
    }

    fn activate(&mut self, css: &str, index: usize) {
        match (self.view, css) {
            (_, controls::ERROR_DISMISS) => self.error = None,
            (_, controls::MENU_BUTTON) => self.menu_open = true,
            (_, controls::LOGOUT_LINK) => {
                self.user = None;
                self.show(View::Login);
            }
            (_, controls::CART_LINK) => self.show(View::Cart),
            (View::Login, controls::LOGIN_BUTTON) => self.submit_login(),
            (View::Inventory, controls::ITEM_NAME) => {
                if let Some(p) = self.displayed().get(index) {
                    self.show(View::Item(p.id));
                }
            }
            (View::Inventory, controls::INVENTORY_BUTTON) => {
                if let Some(p) = self.displayed().get(index) {
                    self.toggle(p.id);
                }
            }
            (View::Item(id), controls::INVENTORY_BUTTON) => self.toggle(id),
            (View::Item(_) | View::Complete, controls::BACK_TO_PRODUCTS) => {
                self.show(View::Inventory);
            }
            (View::Cart, controls::CART_REMOVE) => {
                if self.faults.contains(&Fault::InertCartRemove) {
                    return;
                }
                if let Some(id) = self.cart().get(index).copied() {
                    self.toggle(id);
                }
            }
            (View::Cart, controls::CONTINUE_SHOPPING) | (View::Overview, controls::CANCEL) => {
                self.show(View::Inventory);
            }
            (View::Cart, controls::CHECKOUT) => {
                self.customer = Default::default();
                self.show(View::CheckoutInfo);
            }
            (View::CheckoutInfo, controls::CONTINUE) => self.submit_customer(),
            (View::CheckoutInfo, controls::CANCEL) => self.show(View::Cart),
            (View::Overview, controls::FINISH) => {
                if let Some(user) = self.user {
                    self.carts.remove(&user);
                }
                self.show(View::Complete);
            }
            _ => {}
        }
    }

    fn route(&mut self, url: &str) -> ProbeResult<View> {
        let path = path_of(url);
        let view = match path {
            routes::LOGIN => View::Login,
            routes::INVENTORY => View::Inventory,
            routes::CART => View::Cart,
            routes::CHECKOUT_INFO => View::CheckoutInfo,
            routes::CHECKOUT_OVERVIEW => View::Overview,
            routes::CHECKOUT_COMPLETE => View::Complete,
            routes::INVENTORY_ITEM => {
                let id = url
                    .split_once("?id=")
                    .and_then(|(_, q)| q.split(['&', '#']).next())
                    .and_then(|id| id.parse::<u32>().ok())
                    .filter(|id| product(*id).is_some());
                match id {
                    Some(id) => View::Item(id),
                    None => {
                        return Err(ProbeError::NavigationError {
                            url: url.to_string(),
                            message: "unknown product".to_string(),
                        })
                    }
                }
            }
            _ => {
                return Err(ProbeError::NavigationError {
                    url: url.to_string(),
                    message: "404 Not Found".to_string(),
                })
            }
        };
        Ok(view)
    }
}

#[async_trait]
impl StoreDriver for SimulatedStore {
    async fn goto(&mut self, url: &str) -> ProbeResult<()> {
        self.act(format!("goto {url}"))?;
        let view = self.route(url)?;
        self.pending = None;
        if view.requires_auth() && self.user.is_none() {
            self.show(View::Login);
            self.error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                view.route()
            ));
        } else {
            self.show(view);
            if view == View::Login {
                self.username.clear();
                self.password.clear();
            }
        }
        Ok(())
    }

    async fn current_url(&mut self) -> ProbeResult<String> {
        self.enter()?;
        Ok(match self.view {
            View::Blank => "about:blank".to_string(),
            View::Item(id) => format!("{}{}?id={id}", self.base_url, routes::INVENTORY_ITEM),
            view => format!("{}{}", self.base_url, view.route()),
        })
    }

    async fn title(&mut self) -> ProbeResult<String> {
        self.enter()?;
        Ok(match self.view {
            View::Blank => String::new(),
            _ => controls::DOCUMENT_TITLE.to_string(),
        })
    }

    async fn fill(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        self.act(format!("fill {selector}"))?;
        let css = selector.to_css();
        if let Some(field) = self.field_mut(&css) {
            *field = value.to_string();
            return Ok(());
        }
        if self.select(selector).is_empty() {
            Err(ProbeError::ElementNotFound {
                selector: selector.to_string(),
            })
        } else {
            Err(ProbeError::Driver {
                message: format!("{selector} is not an editable field"),
            })
        }
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        self.act(format!("click {selector}"))?;
        if self.select(selector).is_empty() {
            return Err(ProbeError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        self.activate(&selector.to_css(), selector.index().unwrap_or(0));
        Ok(())
    }

    async fn select_option(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        self.act(format!("select {selector} {value}"))?;
        let css = selector.to_css();
        if self.view != View::Inventory || css != controls::SORT_SELECT {
            return Err(ProbeError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        let mode = SortMode::from_value(value).ok_or_else(|| ProbeError::Driver {
            message: format!("no option {value:?} in {selector}"),
        })?;
        // problem_user: the selection is ignored
        if self.user != Some(Persona::Problem) {
            self.sort = mode;
        }
        Ok(())
    }

    async fn text_content(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
        self.enter()?;
        Ok(self.select(selector).into_iter().next())
    }

    async fn all_text_contents(&mut self, selector: &Selector) -> ProbeResult<Vec<String>> {
        self.enter()?;
        Ok(self.select(selector))
    }

    async fn input_value(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
        self.enter()?;
        Ok(self.field(&selector.to_css()))
    }

    async fn count(&mut self, selector: &Selector) -> ProbeResult<usize> {
        self.enter()?;
        Ok(self.select(selector).len())
    }

    async fn is_visible(&mut self, selector: &Selector) -> ProbeResult<bool> {
        self.enter()?;
        Ok(!self.select(selector).is_empty())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.act("close".to_string())?;
        self.closed = true;
        Ok(())
    }
}

/// Opens a fresh [`SimulatedStore`] per scenario
#[derive(Debug, Clone)]
pub struct SimulatedStoreFactory {
    base_url: String,
    glitch_latency: Duration,
    faults: Vec<Fault>,
}

impl SimulatedStoreFactory {
    /// Factory for `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            glitch_latency: Duration::from_millis(DEFAULT_GLITCH_LATENCY_MS),
            faults: Vec::new(),
        }
    }

    /// Set the performance-glitch login delay
    #[must_use]
    pub const fn with_glitch_latency(mut self, latency: Duration) -> Self {
        self.glitch_latency = latency;
        self
    }

    /// Inject a fault into every opened session
    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }
}

#[async_trait]
impl DriverFactory for SimulatedStoreFactory {
    type Driver = SimulatedStore;

    async fn open(&self) -> ProbeResult<SimulatedStore> {
        let store =
            SimulatedStore::new(self.base_url.clone()).with_glitch_latency(self.glitch_latency);
        Ok(self
            .faults
            .iter()
            .cloned()
            .fold(store, SimulatedStore::with_fault))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://shop.test";

    fn css(s: &str) -> Selector {
        Selector::css(s)
    }

    async fn logged_in(username: &str) -> SimulatedStore {
        let mut store = SimulatedStore::new(BASE).with_glitch_latency(Duration::from_millis(300));
        store.goto(&format!("{BASE}/")).await.unwrap();
        store.fill(&css(controls::USERNAME), username).await.unwrap();
        store.fill(&css(controls::PASSWORD), DEFAULT_PASSWORD).await.unwrap();
        store.click(&css(controls::LOGIN_BUTTON)).await.unwrap();
        store
    }

    mod money_tests {
        use super::*;

        #[test]
        fn test_format_money() {
            assert_eq!(format_money(2999), "$29.99");
            assert_eq!(format_money(799), "$7.99");
            assert_eq!(format_money(5), "$0.05");
        }

        #[test]
        fn test_tax_rounds_half_up() {
            assert_eq!(tax_cents(2999), 240);
            assert_eq!(tax_cents(3998), 320);
            assert_eq!(tax_cents(0), 0);
        }
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_standard_login_lands_on_inventory() {
            let mut store = logged_in("standard_user").await;
            assert_eq!(
                store.current_url().await.unwrap(),
                "http://shop.test/inventory.html"
            );
            assert_eq!(store.count(&css(controls::INVENTORY_ITEM)).await.unwrap(), 6);
        }

        #[tokio::test]
        async fn test_login_errors() {
            for (user, expected) in [
                ("locked_out_user", "Sorry, this user has been locked out."),
                ("nobody", "Username and password do not match"),
                ("", "Username is required"),
            ] {
                let mut store = logged_in(user).await;
                let text = store
                    .text_content(&Selector::test_id(controls::ERROR_TEST_ID))
                    .await
                    .unwrap()
                    .unwrap();
                assert!(text.contains(expected), "{user}: {text}");
            }
        }

        #[tokio::test]
        async fn test_empty_password() {
            let mut store = SimulatedStore::new(BASE);
            store.goto(&format!("{BASE}/")).await.unwrap();
            store.fill(&css(controls::USERNAME), "standard_user").await.unwrap();
            store.click(&css(controls::LOGIN_BUTTON)).await.unwrap();
            let text = store
                .text_content(&Selector::test_id(controls::ERROR_TEST_ID))
                .await
                .unwrap();
            assert_eq!(text.as_deref(), Some("Epic sadface: Password is required"));
            store.click(&css(controls::ERROR_DISMISS)).await.unwrap();
            assert!(!store
                .is_visible(&Selector::test_id(controls::ERROR_TEST_ID))
                .await
                .unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_glitch_login_is_delayed() {
            let mut store = logged_in("performance_glitch_user").await;
            assert_eq!(store.current_url().await.unwrap(), "http://shop.test/");
            tokio::time::sleep(Duration::from_millis(299)).await;
            assert!(!store.is_visible(&css(controls::INVENTORY_LIST)).await.unwrap());
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert!(store.is_visible(&css(controls::INVENTORY_LIST)).await.unwrap());
        }

        #[tokio::test]
        async fn test_deep_link_requires_login() {
            let mut store = SimulatedStore::new(BASE);
            store.goto(&format!("{BASE}/cart.html")).await.unwrap();
            assert_eq!(store.current_url().await.unwrap(), "http://shop.test/");
            let text = store
                .text_content(&Selector::test_id(controls::ERROR_TEST_ID))
                .await
                .unwrap()
                .unwrap();
            assert!(text.contains("/cart.html"));
        }

        #[tokio::test]
        async fn test_unknown_route() {
            let mut store = SimulatedStore::new(BASE);
            let err = store.goto(&format!("{BASE}/nope.html")).await.unwrap_err();
            assert!(matches!(err, ProbeError::NavigationError { .. }));
        }
    }

    mod catalog_tests {
        use super::*;

        #[tokio::test]
        async fn test_sort_price_high_to_low() {
            let mut store = logged_in("standard_user").await;
            store
                .select_option(&css(controls::SORT_SELECT), "hilo")
                .await
                .unwrap();
            let prices = store.all_text_contents(&css(controls::ITEM_PRICE)).await.unwrap();
            assert_eq!(prices.first().map(String::as_str), Some("$49.99"));
            assert_eq!(prices.last().map(String::as_str), Some("$7.99"));
        }

        #[tokio::test]
        async fn test_problem_user_sort_ignored() {
            let mut store = logged_in("problem_user").await;
            store
                .select_option(&css(controls::SORT_SELECT), "za")
                .await
                .unwrap();
            let names = store.all_text_contents(&css(controls::ITEM_NAME)).await.unwrap();
            assert_eq!(names[0], "Sauce Labs Backpack");
            assert_eq!(
                store.input_value(&css(controls::SORT_SELECT)).await.unwrap().as_deref(),
                Some("az")
            );
        }

        #[tokio::test]
        async fn test_unknown_sort_option() {
            let mut store = logged_in("standard_user").await;
            assert!(store
                .select_option(&css(controls::SORT_SELECT), "random")
                .await
                .is_err());
        }

        #[tokio::test]
        async fn test_detail_page() {
            let mut store = logged_in("standard_user").await;
            store.click(&css(controls::ITEM_NAME).nth(1)).await.unwrap();
            assert_eq!(
                store.current_url().await.unwrap(),
                "http://shop.test/inventory-item.html?id=0"
            );
            assert_eq!(
                store.text_content(&css(controls::DETAILS_NAME)).await.unwrap().as_deref(),
                Some("Sauce Labs Bike Light")
            );
        }
    }

    mod cart_tests {
        use super::*;

        #[tokio::test]
        async fn test_badge_tracks_toggles() {
            let mut store = logged_in("standard_user").await;
            let badge = css(controls::CART_BADGE);
            assert_eq!(store.count(&badge).await.unwrap(), 0);
            store.click(&css(controls::INVENTORY_BUTTON).nth(0)).await.unwrap();
            store.click(&css(controls::INVENTORY_BUTTON).nth(3)).await.unwrap();
            assert_eq!(store.text_content(&badge).await.unwrap().as_deref(), Some("2"));
            store.click(&css(controls::INVENTORY_BUTTON).nth(0)).await.unwrap();
            assert_eq!(store.text_content(&badge).await.unwrap().as_deref(), Some("1"));
        }

        #[tokio::test]
        async fn test_cart_persists_across_logout() {
            let mut store = logged_in("standard_user").await;
            store.click(&css(controls::INVENTORY_BUTTON).nth(0)).await.unwrap();
            assert!(store.click(&css(controls::LOGOUT_LINK)).await.is_err());
            store.click(&css(controls::MENU_BUTTON)).await.unwrap();
            store.click(&css(controls::LOGOUT_LINK)).await.unwrap();
            assert_eq!(store.current_url().await.unwrap(), "http://shop.test/");
            assert_eq!(store.cart_size(Persona::Standard), 1);
            store.fill(&css(controls::USERNAME), "standard_user").await.unwrap();
            store.fill(&css(controls::PASSWORD), DEFAULT_PASSWORD).await.unwrap();
            store.click(&css(controls::LOGIN_BUTTON)).await.unwrap();
            assert_eq!(
                store.text_content(&css(controls::CART_BADGE)).await.unwrap().as_deref(),
                Some("1")
            );
        }
    }

    mod checkout_tests {
        use super::*;

        async fn at_checkout(user: &str) -> SimulatedStore {
            let mut store = logged_in(user).await;
            store.click(&css(controls::INVENTORY_BUTTON).nth(0)).await.unwrap();
            store.click(&css(controls::INVENTORY_BUTTON).nth(1)).await.unwrap();
            store.click(&css(controls::CART_LINK)).await.unwrap();
            store.click(&css(controls::CHECKOUT)).await.unwrap();
            store
        }

        #[tokio::test]
        async fn test_overview_summary() {
            let mut store = at_checkout("standard_user").await;
            store.fill(&css(controls::FIRST_NAME), "John").await.unwrap();
            store.fill(&css(controls::LAST_NAME), "Doe").await.unwrap();
            store.fill(&css(controls::POSTAL_CODE), "10001").await.unwrap();
            store.click(&css(controls::CONTINUE)).await.unwrap();
            let read = |s: &'static str| css(s);
            assert_eq!(
                store.text_content(&read(controls::SUBTOTAL_LABEL)).await.unwrap().as_deref(),
                Some("Item total: $39.98")
            );
            assert_eq!(
                store.text_content(&read(controls::TAX_LABEL)).await.unwrap().as_deref(),
                Some("Tax: $3.20")
            );
            assert_eq!(
                store.text_content(&read(controls::TOTAL_LABEL)).await.unwrap().as_deref(),
                Some("Total: $43.18")
            );
            store.click(&css(controls::FINISH)).await.unwrap();
            assert_eq!(store.cart_size(Persona::Standard), 0);
            assert_eq!(store.count(&css(controls::CART_BADGE)).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_first_missing_field_reported() {
            let mut store = at_checkout("standard_user").await;
            store.fill(&css(controls::FIRST_NAME), "John").await.unwrap();
            store.click(&css(controls::CONTINUE)).await.unwrap();
            assert_eq!(
                store
                    .text_content(&Selector::test_id(controls::ERROR_TEST_ID))
                    .await
                    .unwrap()
                    .as_deref(),
                Some("Error: Last Name is required")
            );
        }

        #[tokio::test]
        async fn test_problem_user_last_name_overwrites_first() {
            let mut store = at_checkout("problem_user").await;
            store.fill(&css(controls::FIRST_NAME), "John").await.unwrap();
            store.fill(&css(controls::LAST_NAME), "Doe").await.unwrap();
            assert_eq!(
                store.input_value(&css(controls::FIRST_NAME)).await.unwrap().as_deref(),
                Some("Doe")
            );
            assert_eq!(
                store.input_value(&css(controls::LAST_NAME)).await.unwrap().as_deref(),
                Some("")
            );
        }
    }

    #[tokio::test]
    async fn test_closed_session_rejects_calls() {
        let mut store = SimulatedStore::new(BASE);
        store.close().await.unwrap();
        assert!(store.is_closed());
        assert!(store.goto(&format!("{BASE}/")).await.is_err());
    }

    #[tokio::test]
    async fn test_factory_sessions_are_isolated() {
        let factory = SimulatedStoreFactory::new(BASE);
        let mut a = factory.open().await.unwrap();
        let b = factory.open().await.unwrap();
        a.goto(&format!("{BASE}/")).await.unwrap();
        assert_eq!(a.actions().len(), 1);
        assert!(b.actions().is_empty());
    }

    #[tokio::test]
    async fn test_reads_are_not_recorded() {
        let mut store = logged_in("standard_user").await;
        let recorded = store.actions().len();
        for _ in 0..50 {
            store.count(&css(controls::INVENTORY_ITEM)).await.unwrap();
            store.current_url().await.unwrap();
        }
        assert_eq!(store.actions().len(), recorded);
        store.click(&css(controls::INVENTORY_BUTTON).nth(0)).await.unwrap();
        assert_eq!(store.actions().len(), recorded + 1);
    }

    #[tokio::test]
    async fn test_menu_entries_only_when_open() {
        let mut store = logged_in("standard_user").await;
        assert!(!store.is_visible(&css(controls::MENU)).await.unwrap());
        assert!(store.is_visible(&css(controls::APP_LOGO)).await.unwrap());
        store.click(&css(controls::MENU_BUTTON)).await.unwrap();
        for entry in [
            controls::MENU,
            controls::ALL_ITEMS_LINK,
            controls::ABOUT_LINK,
            controls::RESET_LINK,
        ] {
            assert!(store.is_visible(&css(entry)).await.unwrap(), "{entry}");
        }
    }

    mod fault_tests {
        use super::*;

        #[tokio::test]
        async fn test_badge_text_override() {
            let mut store = logged_in("standard_user").await.with_fault(Fault::BadgeText("x".into()));
            assert_eq!(
                store.text_content(&css(controls::CART_BADGE)).await.unwrap().as_deref(),
                Some("x")
            );
        }

        #[tokio::test]
        async fn test_inert_cart_remove() {
            let mut store = logged_in("standard_user").await.with_fault(Fault::InertCartRemove);
            store.click(&css(controls::INVENTORY_BUTTON).nth(0)).await.unwrap();
            store.click(&css(controls::CART_LINK)).await.unwrap();
            store.click(&css(controls::CART_REMOVE).nth(0)).await.unwrap();
            assert_eq!(store.cart_size(Persona::Standard), 1);
        }

        #[tokio::test]
        async fn test_factory_applies_faults() {
            let factory = SimulatedStoreFactory::new(BASE).with_fault(Fault::InertCartRemove);
            let store = factory.open().await.unwrap();
            assert_eq!(store.faults, vec![Fault::InertCartRemove]);
        }
    }
}
