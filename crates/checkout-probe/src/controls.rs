//! Routes and identified controls of the storefront contract.
//!
//! These are the only names the harness assumes about the target
//! application's DOM. The in-memory store answers to exactly this set.

/// Route paths
pub mod routes {
    /// Unauthenticated entry page
    pub const LOGIN: &str = "/";
    /// Catalog
    pub const INVENTORY: &str = "/inventory.html";
    /// Product detail, query-identified (`?id=N`)
    pub const INVENTORY_ITEM: &str = "/inventory-item.html";
    /// Cart
    pub const CART: &str = "/cart.html";
    /// Checkout: information form
    pub const CHECKOUT_INFO: &str = "/checkout-step-one.html";
    /// Checkout: overview
    pub const CHECKOUT_OVERVIEW: &str = "/checkout-step-two.html";
    /// Checkout: complete
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
}

/// Login form
pub const USERNAME: &str = "#user-name";
/// Login form
pub const PASSWORD: &str = "#password";
/// Login form submit
pub const LOGIN_BUTTON: &str = "#login-button";

/// Page heading text container
pub const TITLE: &str = ".title";
/// Header logo
pub const APP_LOGO: &str = ".app_logo";
/// Page footer
pub const FOOTER: &str = ".footer";
/// Catalog list container
pub const INVENTORY_LIST: &str = ".inventory_list";
/// One catalog entry
pub const INVENTORY_ITEM: &str = ".inventory_item";
/// Product image on catalog entries
pub const ITEM_IMAGE: &str = ".inventory_item_img";
/// Product name (catalog, cart and overview)
pub const ITEM_NAME: &str = ".inventory_item_name";
/// Product price (catalog, cart and overview)
pub const ITEM_PRICE: &str = ".inventory_item_price";
/// Add/remove toggle on catalog entries and the detail page
pub const INVENTORY_BUTTON: &str = ".btn_inventory";
/// Sort selector
pub const SORT_SELECT: &str = ".product_sort_container";
/// Detail page product name
pub const DETAILS_NAME: &str = ".inventory_details_name";
/// Detail page product price
pub const DETAILS_PRICE: &str = ".inventory_details_price";
/// Back control on detail and completion pages
pub const BACK_TO_PRODUCTS: &str = "#back-to-products";

/// Cart badge (absent when the cart is empty)
pub const CART_BADGE: &str = ".shopping_cart_badge";
/// Cart link in the header
pub const CART_LINK: &str = ".shopping_cart_link";
/// One cart line (cart and overview pages)
pub const CART_ITEM: &str = ".cart_item";
/// Line name inside the cart list
pub const CART_ITEM_NAME: &str = ".cart_item .inventory_item_name";
/// Line price inside the cart list
pub const CART_ITEM_PRICE: &str = ".cart_item .inventory_item_price";
/// Remove control on cart lines
pub const CART_REMOVE: &str = ".cart_button";
/// Cart page: back to catalog
pub const CONTINUE_SHOPPING: &str = "#continue-shopping";
/// Cart page: start checkout
pub const CHECKOUT: &str = "#checkout";

/// Checkout form field
pub const FIRST_NAME: &str = "#first-name";
/// Checkout form field
pub const LAST_NAME: &str = "#last-name";
/// Checkout form field
pub const POSTAL_CODE: &str = "#postal-code";
/// Checkout form submit
pub const CONTINUE: &str = "#continue";
/// Checkout cancel (information and overview pages)
pub const CANCEL: &str = "#cancel";
/// Overview: place order
pub const FINISH: &str = "#finish";
/// Overview payment, shipping and totals block
pub const SUMMARY_INFO: &str = ".summary_info";
/// Overview summary labels
pub const SUBTOTAL_LABEL: &str = ".summary_subtotal_label";
/// Overview summary labels
pub const TAX_LABEL: &str = ".summary_tax_label";
/// Overview summary labels
pub const TOTAL_LABEL: &str = ".summary_total_label";
/// Completion heading
pub const COMPLETE_HEADER: &str = ".complete-header";

/// `data-test` id of the error banner
pub const ERROR_TEST_ID: &str = "error";
/// Error banner dismiss control
pub const ERROR_DISMISS: &str = ".error-button";

/// Burger menu toggle
pub const MENU_BUTTON: &str = "#react-burger-menu-btn";
/// Open side menu
pub const MENU: &str = ".bm-menu";
/// Menu entry: all items
pub const ALL_ITEMS_LINK: &str = "#inventory_sidebar_link";
/// Menu entry: about
pub const ABOUT_LINK: &str = "#about_sidebar_link";
/// Logout entry in the menu
pub const LOGOUT_LINK: &str = "#logout_sidebar_link";
/// Menu entry: reset app state
pub const RESET_LINK: &str = "#reset_sidebar_link";

/// Toggle text while an item is not in the cart
pub const ADD_TO_CART_TEXT: &str = "Add to cart";
/// Toggle text while an item is in the cart
pub const REMOVE_TEXT: &str = "Remove";
/// Completion heading text
pub const ORDER_COMPLETE_TEXT: &str = "Thank you for your order!";
/// Document title of every page
pub const DOCUMENT_TITLE: &str = "Swag Labs";
