//! Property-based tests for the cart and catalog helpers.
//!
//! Each case drives a fresh in-memory storefront on a paused-clock runtime.

use checkout_probe::{
    cart, catalog, HarnessConfig, Persona, ScenarioContext, SimulatedStore, SortMode,
};
use proptest::prelude::*;
use std::sync::Arc;

const BASE: &str = "http://shop.test";
const CATALOG_SIZE: usize = 6;

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(future)
}

async fn logged_in() -> ScenarioContext<SimulatedStore> {
    let config = Arc::new(HarnessConfig::default().with_base_url(BASE));
    let mut ctx = ScenarioContext::new(SimulatedStore::new(BASE), Persona::Standard, config);
    ctx.login().await.unwrap();
    ctx
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// The badge always equals adds minus removes and never goes negative.
    #[test]
    fn prop_count_tracks_adds_minus_removes(
        ops in prop::collection::vec((any::<bool>(), 0..CATALOG_SIZE), 0..12)
    ) {
        run(async {
            let mut ctx = logged_in().await;
            let mut in_cart = [false; CATALOG_SIZE];
            let (mut adds, mut removes) = (0usize, 0usize);
            for (add, index) in ops {
                if add && !in_cart[index] {
                    ctx.cart.add(&mut ctx.page, index).await.unwrap();
                    in_cart[index] = true;
                    adds += 1;
                } else if !add && in_cart[index] {
                    ctx.cart.remove_from_catalog(&mut ctx.page, index).await.unwrap();
                    in_cart[index] = false;
                    removes += 1;
                }
                let count = cart::item_count(&mut ctx.page).await.unwrap();
                assert_eq!(count, adds - removes);
                assert_eq!(count, ctx.cart.len());
            }
        });
    }

    /// Clearing ends at zero from any starting count.
    #[test]
    fn prop_clear_terminates_at_zero(start in 0..=CATALOG_SIZE) {
        run(async {
            let mut ctx = logged_in().await;
            let indices: Vec<usize> = (0..start).collect();
            ctx.cart.add_many(&mut ctx.page, &indices).await.unwrap();
            assert_eq!(cart::item_count(&mut ctx.page).await.unwrap(), start);
            ctx.cart.clear(&mut ctx.page).await.unwrap();
            assert_eq!(cart::item_count(&mut ctx.page).await.unwrap(), 0);
            assert!(ctx.cart.is_empty());
        });
    }

    /// Any sequence of sorts leaves the listing ordered by the last mode.
    #[test]
    fn prop_sorts_order_listing(
        modes in prop::collection::vec(prop::sample::select(SortMode::ALL.to_vec()), 1..5)
    ) {
        run(async {
            let mut ctx = logged_in().await;
            let original = catalog::read_catalog(&mut ctx.page).await.unwrap();
            for mode in modes {
                let after = catalog::sort_by(&mut ctx.page, mode).await.unwrap();
                catalog::verify_sorted(&original, &after, mode).unwrap();
            }
        });
    }
}
