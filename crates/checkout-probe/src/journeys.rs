//! Named end-to-end journeys.
//!
//! Each journey is a sequential body over one [`ScenarioContext`]. The
//! expected cart in the context is kept in step with every mutation so the
//! badge can be checked after each one.

use crate::assertion;
use crate::cart;
use crate::catalog::{self, SortMode};
use crate::checkout::{self, FormField};
use crate::controls::{self, routes};
use crate::driver::StoreDriver;
use crate::flow::{self, LogicalPage};
use crate::locator::Selector;
use crate::persona::{Credentials, Persona};
use crate::result::{ProbeError, ProbeResult};
use crate::runner::{Scenario, ScenarioContext};
use crate::session::{self, LoginAttempt};
use crate::tolerance::Outcome;
use futures::FutureExt;
use tracing::info;

// =============================================================================
// LOGIN
// =============================================================================

/// The login form and document title are shown
pub async fn login_page_renders<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.page.goto(routes::LOGIN).await?;
    for css in [controls::USERNAME, controls::PASSWORD, controls::LOGIN_BUTTON] {
        assertion::expect_visible(&mut ctx.page, &Selector::css(css)).await?;
    }
    let title = ctx.page.title().await?;
    assertion::expect_eq("document title", &controls::DOCUMENT_TITLE.to_string(), &title)
}

/// Valid credentials reach the catalog
pub async fn standard_login<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    flow::verify_arrival(&mut ctx.page, LogicalPage::Catalog).await?;
    assertion::expect_true(
        session::is_authenticated(&mut ctx.page).await,
        "catalog list shown after login",
    )
}

async fn expect_login_rejected<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
    credentials: &Credentials,
    needle: &str,
) -> ProbeResult<()> {
    match session::submit_credentials(&mut ctx.page, credentials).await? {
        LoginAttempt::Authenticated => Err(ProbeError::assertion(
            format!("login error containing {needle:?}"),
            "authenticated",
        )),
        LoginAttempt::Rejected(message) => {
            assertion::expect_contains(&message, needle)?;
            assertion::expect_eq("page", &LogicalPage::Unauthenticated, &ctx.page.location())
        }
    }
}

/// The locked-out account is refused
pub async fn locked_out_user<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let credentials = ctx.config().personas.get(Persona::LockedOut).clone();
    expect_login_rejected(ctx, &credentials, "locked out").await?;
    assertion::expect_true(
        !session::is_authenticated(&mut ctx.page).await,
        "no catalog for a locked-out account",
    )
}

/// A wrong password is refused
pub async fn invalid_credentials<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let credentials = Credentials::new(ctx.credentials().username.clone(), "wrong_password");
    expect_login_rejected(ctx, &credentials, "do not match any user").await
}

/// An empty username is refused
pub async fn empty_username<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let credentials = Credentials::new("", ctx.credentials().password.clone());
    expect_login_rejected(ctx, &credentials, "Username is required").await
}

/// An empty password is refused
pub async fn empty_password<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let credentials = Credentials::new(ctx.credentials().username.clone(), "");
    expect_login_rejected(ctx, &credentials, "Password is required").await
}

/// The login error closes and a retry succeeds
pub async fn dismiss_login_error<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let credentials = Credentials::new(ctx.credentials().username.clone(), "wrong_password");
    expect_login_rejected(ctx, &credentials, "do not match any user").await?;
    session::dismiss_login_error(&mut ctx.page).await?;
    ctx.login().await
}

// =============================================================================
// CATALOG
// =============================================================================

/// The catalog lists every product with a price and an add control
pub async fn catalog_lists_items<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    let items = catalog::read_catalog(&mut ctx.page).await?;
    match ctx.config().catalog_size {
        Some(size) => assertion::expect_eq("catalog size", &size, &items.len())?,
        None => assertion::expect_true(!items.is_empty(), "a non-empty catalog")?,
    }
    for item in &items {
        assertion::expect_true(!item.name.is_empty(), "every product named")?;
        assertion::expect_true(item.price > 0.0, "every price positive")?;
    }
    let toggles = ctx
        .page
        .texts(&Selector::css(controls::INVENTORY_BUTTON))
        .await?;
    assertion::expect_eq(
        "add controls",
        &vec![controls::ADD_TO_CART_TEXT.to_string(); items.len()],
        &toggles,
    )
}

async fn sorts_by<D: StoreDriver>(ctx: &mut ScenarioContext<D>, mode: SortMode) -> ProbeResult<()> {
    ctx.login().await?;
    let before = catalog::read_catalog(&mut ctx.page).await?;
    let after = catalog::sort_by(&mut ctx.page, mode).await?;
    catalog::verify_sorted(&before, &after, mode)?;
    // indices follow the new order
    let first = after
        .first()
        .ok_or_else(|| ProbeError::assertion("a non-empty catalog", "no products"))?;
    ctx.cart.add(&mut ctx.page, 0).await?;
    let added = ctx.cart.lines().first().map(|l| l.name.as_str());
    assertion::expect_eq("added product", &Some(first.name.as_str()), &added)
}

/// Name A to Z
pub async fn sort_name_asc<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    sorts_by(ctx, SortMode::NameAsc).await
}

/// Name Z to A
pub async fn sort_name_desc<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    sorts_by(ctx, SortMode::NameDesc).await
}

/// Price low to high
pub async fn sort_price_asc<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    sorts_by(ctx, SortMode::PriceAsc).await
}

/// Price high to low
pub async fn sort_price_desc<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    sorts_by(ctx, SortMode::PriceDesc).await
}

/// A product's detail page matches its listing, and back returns
pub async fn product_detail_and_back<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    let item = catalog::open_product(&mut ctx.page, 1).await?;
    info!(name = %item.name, "Detail page verified");
    catalog::back_to_products(&mut ctx.page).await?;
    let again = catalog::read_item(&mut ctx.page, 1).await?;
    assertion::expect_eq("listing after back", &item, &again)
}

/// The side menu opens with all of its entries
pub async fn menu_opens<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.page.click(&Selector::css(controls::MENU_BUTTON)).await?;
    for css in [
        controls::MENU,
        controls::ALL_ITEMS_LINK,
        controls::ABOUT_LINK,
        controls::LOGOUT_LINK,
        controls::RESET_LINK,
    ] {
        assertion::expect_visible(&mut ctx.page, &Selector::css(css)).await?;
    }
    Ok(())
}

/// Header, product images and footer are shown
pub async fn catalog_chrome_visible<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    for css in [controls::APP_LOGO, controls::CART_LINK, controls::MENU_BUTTON] {
        assertion::expect_visible(&mut ctx.page, &Selector::css(css)).await?;
    }
    let images = ctx.page.count(&Selector::css(controls::ITEM_IMAGE)).await?;
    assertion::expect_true(images > 0, "product images shown")?;
    assertion::expect_visible(&mut ctx.page, &Selector::css(controls::FOOTER)).await
}

// =============================================================================
// CART
// =============================================================================

/// A fresh session shows no badge
pub async fn badge_absent_when_empty<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    assertion::expect_eq("badge", &None, &cart::badge_count(&mut ctx.page).await?)?;
    assertion::expect_eq("item count", &0, &cart::item_count(&mut ctx.page).await?)?;
    ctx.cart.verify_badge(&mut ctx.page).await
}

/// Toggles on the catalog add and remove, moving the badge each time
pub async fn add_remove_on_catalog<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, &[0, 1]).await?;
    ctx.cart.remove_from_catalog(&mut ctx.page, 0).await?;
    assertion::expect_eq("item count", &1, &cart::item_count(&mut ctx.page).await?)?;
    ctx.cart.remove_from_catalog(&mut ctx.page, 1).await?;
    assertion::expect_true(cart::is_empty(&mut ctx.page).await?, "an empty cart")
}

/// A product added from its detail page shows as in the cart on the catalog
pub async fn add_from_detail<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    let item = catalog::open_product(&mut ctx.page, 2).await?;
    ctx.cart.add_from_detail(&mut ctx.page, &item).await?;
    catalog::back_to_products(&mut ctx.page).await?;
    ctx.cart.verify_badge(&mut ctx.page).await?;
    assertion::expect_text(
        &mut ctx.page,
        &Selector::css(controls::INVENTORY_BUTTON).nth(2),
        controls::REMOVE_TEXT,
    )
    .await
}

/// The cart page lists exactly what was added, with catalog prices
pub async fn cart_listing_matches_catalog<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, &[0, 2, 4]).await?;
    cart::go_to_cart(&mut ctx.page).await?;
    ctx.cart.verify_listing(&mut ctx.page).await
}

/// Removing a line on the cart page drops it from the listing
pub async fn remove_from_cart_page<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, &[0, 1]).await?;
    cart::go_to_cart(&mut ctx.page).await?;
    ctx.cart.remove(&mut ctx.page, 0).await?;
    ctx.cart.verify_listing(&mut ctx.page).await
}

/// Continue shopping returns to the catalog with the cart intact
pub async fn continue_shopping<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add(&mut ctx.page, 3).await?;
    cart::go_to_cart(&mut ctx.page).await?;
    flow::navigate(&mut ctx.page, LogicalPage::Catalog).await?;
    ctx.cart.verify_badge(&mut ctx.page).await
}

/// The cart survives logging out and back in
pub async fn cart_persists_across_relogin<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add(&mut ctx.page, 0).await?;
    ctx.logout().await?;
    ctx.login().await?;
    assertion::expect_eq("item count", &1, &cart::item_count(&mut ctx.page).await?)?;
    ctx.cart.verify_badge(&mut ctx.page).await
}

/// The badge keeps its count on every page of the header
pub async fn badge_persists_across_navigation<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, &[1, 5]).await?;
    catalog::open_product(&mut ctx.page, 0).await?;
    ctx.cart.verify_badge(&mut ctx.page).await?;
    catalog::back_to_products(&mut ctx.page).await?;
    cart::go_to_cart(&mut ctx.page).await?;
    ctx.cart.verify_badge(&mut ctx.page).await?;
    checkout::begin(&mut ctx.page).await?;
    ctx.cart.verify_badge(&mut ctx.page).await?;
    checkout::cancel(&mut ctx.page).await?;
    flow::navigate(&mut ctx.page, LogicalPage::Catalog).await?;
    ctx.cart.verify_badge(&mut ctx.page).await
}

/// Clearing from the cart page empties it
pub async fn clear_cart<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, &[0, 1, 2]).await?;
    ctx.cart.clear(&mut ctx.page).await?;
    assertion::expect_count(&mut ctx.page, &Selector::css(controls::CART_ITEM), 0).await?;
    assertion::expect_eq("badge", &None, &cart::badge_count(&mut ctx.page).await?)
}

// =============================================================================
// CHECKOUT
// =============================================================================

async fn at_checkout_form<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
    indices: &[usize],
) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, indices).await?;
    cart::go_to_cart(&mut ctx.page).await?;
    checkout::begin(&mut ctx.page).await
}

async fn rejects_missing<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
    field: FormField,
) -> ProbeResult<()> {
    at_checkout_form(ctx, &[0]).await?;
    let info = ctx.config().checkout.without(field);
    let message = checkout::expect_rejection(&mut ctx.page, &info).await?;
    assertion::expect_contains(&message, &field.required_message())?;
    for other in FormField::ALL.into_iter().filter(|f| *f != field) {
        assertion::expect_true(
            !message.contains(&other.required_message()),
            &format!("no error for {other:?}"),
        )?;
    }
    assertion::expect_count(&mut ctx.page, &Selector::test_id(controls::ERROR_TEST_ID), 1).await?;
    assertion::expect_eq("page", &LogicalPage::CheckoutInfo, &ctx.page.location())
}

/// The information form shows every field and both controls
pub async fn checkout_form_renders<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    at_checkout_form(ctx, &[0]).await?;
    for css in [
        controls::FIRST_NAME,
        controls::LAST_NAME,
        controls::POSTAL_CODE,
        controls::CONTINUE,
        controls::CANCEL,
    ] {
        assertion::expect_visible(&mut ctx.page, &Selector::css(css)).await?;
    }
    Ok(())
}

/// A missing first name is refused
pub async fn checkout_requires_first_name<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    rejects_missing(ctx, FormField::FirstName).await
}

/// A missing last name is refused
pub async fn checkout_requires_last_name<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    rejects_missing(ctx, FormField::LastName).await
}

/// A missing postal code is refused
pub async fn checkout_requires_postal_code<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    rejects_missing(ctx, FormField::PostalCode).await
}

/// The form error closes and the completed form then advances
pub async fn checkout_error_dismissible<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    rejects_missing(ctx, FormField::FirstName).await?;
    checkout::dismiss_error(&mut ctx.page).await?;
    let info = ctx.config().checkout.clone();
    checkout::continue_with(&mut ctx.page, &info).await
}

/// Cancel from the form returns to the cart, from the overview to the catalog
pub async fn checkout_cancel_paths<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    at_checkout_form(ctx, &[0]).await?;
    checkout::cancel(&mut ctx.page).await?;
    assertion::expect_eq("page", &LogicalPage::Cart, &ctx.page.location())?;
    checkout::begin(&mut ctx.page).await?;
    let info = ctx.config().checkout.clone();
    checkout::continue_with(&mut ctx.page, &info).await?;
    checkout::cancel(&mut ctx.page).await?;
    assertion::expect_eq("page", &LogicalPage::Catalog, &ctx.page.location())?;
    ctx.cart.verify_badge(&mut ctx.page).await
}

async fn at_overview<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
    indices: &[usize],
) -> ProbeResult<checkout::OrderSummary> {
    at_checkout_form(ctx, indices).await?;
    let info = ctx.config().checkout.clone();
    checkout::continue_with(&mut ctx.page, &info).await?;
    ctx.cart.verify_listing(&mut ctx.page).await?;
    let summary = checkout::read_summary(&mut ctx.page).await?;
    summary.verify_subtotal(ctx.cart.subtotal())?;
    Ok(summary)
}

/// The overview lists the line and shows the summary block
pub async fn overview_renders<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    at_overview(ctx, &[0]).await?;
    assertion::expect_count(&mut ctx.page, &Selector::css(controls::CART_ITEM), 1).await?;
    for css in [
        controls::SUMMARY_INFO,
        controls::SUBTOTAL_LABEL,
        controls::TAX_LABEL,
        controls::TOTAL_LABEL,
    ] {
        assertion::expect_visible(&mut ctx.page, &Selector::css(css)).await?;
    }
    Ok(())
}

async fn place_order<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    checkout::finish(&mut ctx.page).await?;
    ctx.cart.reset();
    ctx.cart.verify_badge(&mut ctx.page).await
}

/// Overview totals add up to the cart contents plus tax
pub async fn overview_totals<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let summary = at_overview(ctx, &[0, 1]).await?;
    assertion::expect_true(summary.tax > 0.0, "tax charged")
}

/// Placing an order empties the cart
pub async fn complete_checkout_clears_cart<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    at_overview(ctx, &[0]).await?;
    place_order(ctx).await?;
    checkout::back_home(&mut ctx.page).await?;
    ctx.cart.verify_badge(&mut ctx.page).await
}

/// Every product in one order
pub async fn multi_item_checkout<D: StoreDriver>(
    ctx: &mut ScenarioContext<D>,
) -> ProbeResult<()> {
    let size = ctx.config().catalog_size.unwrap_or(2);
    let indices: Vec<usize> = (0..size).collect();
    let summary = at_overview(ctx, &indices).await?;
    assertion::expect_count(&mut ctx.page, &Selector::css(controls::CART_ITEM), size).await?;
    info!(items = size, total = summary.total, "Multi-item order summarised");
    place_order(ctx).await
}

/// Add three, remove one, check out the rest and confirm the cart empties
pub async fn full_journey<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    ctx.login().await?;
    ctx.cart.add_many(&mut ctx.page, &[0, 1, 2]).await?;
    assertion::expect_eq("item count", &3, &cart::item_count(&mut ctx.page).await?)?;
    cart::go_to_cart(&mut ctx.page).await?;
    let last = ctx.cart.len() - 1;
    ctx.cart.remove(&mut ctx.page, last).await?;
    assertion::expect_eq("item count", &2, &cart::item_count(&mut ctx.page).await?)?;
    checkout::begin(&mut ctx.page).await?;
    let info = ctx.config().checkout.clone();
    checkout::continue_with(&mut ctx.page, &info).await?;
    assertion::expect_count(&mut ctx.page, &Selector::css(controls::CART_ITEM), 2).await?;
    let summary = checkout::read_summary(&mut ctx.page).await?;
    summary.verify_subtotal(ctx.cart.subtotal())?;
    place_order(ctx).await?;
    assertion::expect_eq("badge", &None, &cart::badge_count(&mut ctx.page).await?)
}

/// Checkout for a persona whose form may be rejected
///
/// Form submission is judged by the persona's tolerance policy; a completed
/// submission must then finish the order. Login can only complete or time
/// out, and no policy tolerates a timeout.
pub async fn tolerant_checkout<D: StoreDriver>(ctx: &mut ScenarioContext<D>) -> ProbeResult<()> {
    let policy = ctx.policy();
    ctx.login().await?;
    ctx.cart.add(&mut ctx.page, 0).await?;
    cart::go_to_cart(&mut ctx.page).await?;
    checkout::begin(&mut ctx.page).await?;
    let info = ctx.config().checkout.clone();
    let result = checkout::continue_with(&mut ctx.page, &info).await;
    let outcome = policy.judge_result(ctx.persona(), result)?;
    match outcome {
        Outcome::Completed => {
            let summary = checkout::read_summary(&mut ctx.page).await?;
            summary.verify_subtotal(ctx.cart.subtotal())?;
            place_order(ctx).await
        }
        _ => {
            assertion::expect_eq("page", &LogicalPage::CheckoutInfo, &ctx.page.location())
        }
    }
}

// =============================================================================
// SUITE
// =============================================================================

/// Every named journey, bound to its persona
#[must_use]
pub fn standard_suite<D: StoreDriver + 'static>() -> Vec<Scenario<D>> {
    use Persona::{LockedOut, PerformanceGlitch, Problem, Standard};
    vec![
        Scenario::new("login page renders", Standard, |ctx| login_page_renders(ctx).boxed()),
        Scenario::new("standard login", Standard, |ctx| standard_login(ctx).boxed()),
        Scenario::new("locked-out user", LockedOut, |ctx| locked_out_user(ctx).boxed()),
        Scenario::new("invalid credentials", Standard, |ctx| invalid_credentials(ctx).boxed()),
        Scenario::new("empty username", Standard, |ctx| empty_username(ctx).boxed()),
        Scenario::new("empty password", Standard, |ctx| empty_password(ctx).boxed()),
        Scenario::new("dismiss login error", Standard, |ctx| dismiss_login_error(ctx).boxed()),
        Scenario::new("catalog lists items", Standard, |ctx| catalog_lists_items(ctx).boxed()),
        Scenario::new("sort by name a-z", Standard, |ctx| sort_name_asc(ctx).boxed()),
        Scenario::new("sort by name z-a", Standard, |ctx| sort_name_desc(ctx).boxed()),
        Scenario::new("sort by price low-high", Standard, |ctx| sort_price_asc(ctx).boxed()),
        Scenario::new("sort by price high-low", Standard, |ctx| sort_price_desc(ctx).boxed()),
        Scenario::new("product detail and back", Standard, |ctx| {
            product_detail_and_back(ctx).boxed()
        }),
        Scenario::new("menu opens", Standard, |ctx| menu_opens(ctx).boxed()),
        Scenario::new("catalog chrome visible", Standard, |ctx| {
            catalog_chrome_visible(ctx).boxed()
        }),
        Scenario::new("badge absent when empty", Standard, |ctx| {
            badge_absent_when_empty(ctx).boxed()
        }),
        Scenario::new("add/remove on catalog", Standard, |ctx| {
            add_remove_on_catalog(ctx).boxed()
        }),
        Scenario::new("add from detail", Standard, |ctx| add_from_detail(ctx).boxed()),
        Scenario::new("cart listing matches catalog", Standard, |ctx| {
            cart_listing_matches_catalog(ctx).boxed()
        }),
        Scenario::new("remove from cart page", Standard, |ctx| {
            remove_from_cart_page(ctx).boxed()
        }),
        Scenario::new("continue shopping", Standard, |ctx| continue_shopping(ctx).boxed()),
        Scenario::new("cart persists across re-login", Standard, |ctx| {
            cart_persists_across_relogin(ctx).boxed()
        }),
        Scenario::new("checkout form renders", Standard, |ctx| {
            checkout_form_renders(ctx).boxed()
        }),
        Scenario::new("checkout requires first name", Standard, |ctx| {
            checkout_requires_first_name(ctx).boxed()
        }),
        Scenario::new("checkout requires last name", Standard, |ctx| {
            checkout_requires_last_name(ctx).boxed()
        }),
        Scenario::new("checkout requires postal code", Standard, |ctx| {
            checkout_requires_postal_code(ctx).boxed()
        }),
        Scenario::new("checkout error dismissible", Standard, |ctx| {
            checkout_error_dismissible(ctx).boxed()
        }),
        Scenario::new("checkout cancel paths", Standard, |ctx| {
            checkout_cancel_paths(ctx).boxed()
        }),
        Scenario::new("overview renders", Standard, |ctx| overview_renders(ctx).boxed()),
        Scenario::new("overview totals", Standard, |ctx| overview_totals(ctx).boxed()),
        Scenario::new("complete checkout clears cart", Standard, |ctx| {
            complete_checkout_clears_cart(ctx).boxed()
        }),
        Scenario::new("multi-item checkout", Standard, |ctx| multi_item_checkout(ctx).boxed()),
        Scenario::new("full journey", Standard, |ctx| full_journey(ctx).boxed()),
        Scenario::new("problem-user checkout", Problem, |ctx| tolerant_checkout(ctx).boxed()),
        Scenario::new("performance-glitch checkout", PerformanceGlitch, |ctx| {
            tolerant_checkout(ctx).boxed()
        }),
        Scenario::new("badge persists across navigation", Standard, |ctx| {
            badge_persists_across_navigation(ctx).boxed()
        }),
        Scenario::new("clear cart", Standard, |ctx| clear_cart(ctx).boxed()),
    ]
}
