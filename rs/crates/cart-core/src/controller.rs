//! Controller: turns UI actions into backend calls and state updates.
//!
//! Quantity changes are local. Every cart mutation is a chain of
//! "call backend, refetch cart, publish", and chains run one at a time so a
//! slow refetch can never overwrite the result of a later mutation.

use std::sync::Mutex;

use cart_api::{ApiError, CartBackend, CartItem, InventoryItem, ItemId, NewCartItem};

use crate::action::UiAction;
use crate::state::{State, SubscriptionId};
use crate::view::SharedScreen;

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Zero an item's pending amount once it has been added to the cart.
    /// Off by default: the pending batch stays so it can be added again.
    pub reset_pending_after_add: bool,
}

pub struct Controller<B> {
    backend: B,
    state: Mutex<State>,
    mutations: tokio::sync::Mutex<()>,
    options: ControllerOptions,
}

impl<B: CartBackend> Controller<B> {
    pub fn new(backend: B, options: ControllerOptions) -> Self {
        Self {
            backend,
            state: Mutex::new(State::new()),
            mutations: tokio::sync::Mutex::new(()),
            options,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn subscribe(&self, cb: impl Fn(&State) + Send + 'static) -> SubscriptionId {
        self.state.lock().unwrap().subscribe(cb)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.lock().unwrap().unsubscribe(id)
    }

    /// Repaint `screen` on every state change, starting now.
    pub fn attach_screen(&self, screen: SharedScreen) -> SubscriptionId {
        let mut state = self.state.lock().unwrap();
        screen.lock().unwrap().paint(&state);
        state.subscribe(move |s| screen.lock().unwrap().paint(s))
    }

    /// Run `f` against the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&*self.state.lock().unwrap())
    }

    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.with_state(|s| s.inventory().to_vec())
    }

    pub fn cart(&self) -> Vec<CartItem> {
        self.with_state(|s| s.cart().to_vec())
    }

    pub fn notice(&self) -> Option<String> {
        self.with_state(|s| s.notice().map(str::to_string))
    }

    /// Load both lists, as a page load does. Pending amounts start at 0.
    pub async fn bootstrap(&self) -> Result<(), ApiError> {
        let _chain = self.mutations.lock().await;
        let (inventory, cart) = tokio::join!(self.backend.get_inventory(), self.backend.get_cart());

        let mut first_err = None;
        match inventory {
            Ok(items) => {
                let items: Vec<InventoryItem> = items
                    .into_iter()
                    .map(|item| InventoryItem { amount: 0, ..item })
                    .collect();
                log::info!("[controller] loaded {} inventory item(s)", items.len());
                self.state.lock().unwrap().set_inventory(items);
            }
            Err(e) => first_err = Some(e),
        }
        match cart {
            Ok(cart) => {
                log::info!("[controller] loaded {} cart item(s)", cart.len());
                self.state.lock().unwrap().set_cart(cart);
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(self.fail("load", e)),
            None => {
                let mut state = self.state.lock().unwrap();
                if state.notice().is_some() {
                    state.set_notice(None);
                }
                Ok(())
            }
        }
    }

    pub async fn dispatch(&self, action: UiAction) -> Result<(), ApiError> {
        log::debug!("[controller] action {:?}", action);
        match action {
            UiAction::Decrease(id) => {
                self.update_amount(&id, -1);
                Ok(())
            }
            UiAction::Increase(id) => {
                self.update_amount(&id, 1);
                Ok(())
            }
            UiAction::AddToCart(id) => self.add_to_cart(&id).await,
            UiAction::Delete(id) => self.delete(&id).await,
            UiAction::Checkout => self.checkout().await,
        }
    }

    /// Adjust an inventory item's pending amount, clamped at 0.
    /// Returns false when no item has that id.
    pub fn update_amount(&self, id: &ItemId, delta: i64) -> bool {
        let mut state = self.state.lock().unwrap();
        let mut inventory = state.inventory().to_vec();
        let Some(item) = inventory.iter_mut().find(|i| &i.id == id) else {
            return false;
        };
        let next = (i64::from(item.amount) + delta).max(0);
        item.amount = u32::try_from(next).unwrap_or(u32::MAX);
        state.set_inventory(inventory);
        true
    }

    /// Commit an item's pending amount to the cart.
    ///
    /// Merges into an existing cart row with the same content, otherwise
    /// creates one. Nothing happens when the pending amount is 0.
    pub async fn add_to_cart(&self, id: &ItemId) -> Result<(), ApiError> {
        let _chain = self.mutations.lock().await;

        let (item, existing) = {
            let state = self.state.lock().unwrap();
            let Some(item) = state.inventory().iter().find(|i| &i.id == id).cloned() else {
                return Ok(());
            };
            if item.amount == 0 {
                return Ok(());
            }
            let existing = state.cart().iter().find(|c| c.content == item.content).cloned();
            (item, existing)
        };

        let result = match existing {
            Some(entry) => {
                let total = entry.amount.saturating_add(item.amount);
                log::info!("[controller] {} already in cart, amount {} -> {}", item.content, entry.amount, total);
                self.backend.update_cart(&entry.id, total).await
            }
            None => {
                log::info!("[controller] adding {} x {} to cart", item.content, item.amount);
                self.backend
                    .add_to_cart(NewCartItem {
                        content: item.content.clone(),
                        amount: item.amount,
                    })
                    .await
            }
        };
        if let Err(e) = result {
            return Err(self.fail("add to cart", e));
        }

        if self.options.reset_pending_after_add {
            self.update_amount(id, -i64::from(item.amount));
        }
        self.refresh_cart("add to cart").await
    }

    /// Remove a cart row by id.
    pub async fn delete(&self, id: &ItemId) -> Result<(), ApiError> {
        let _chain = self.mutations.lock().await;

        let known = self.state.lock().unwrap().cart().iter().any(|c| &c.id == id);
        if !known {
            return Ok(());
        }

        log::info!("[controller] deleting cart item {}", id);
        if let Err(e) = self.backend.delete_from_cart(id).await {
            return Err(self.fail("delete", e));
        }
        self.refresh_cart("delete").await
    }

    /// Empty the cart on the server, then locally without refetching.
    ///
    /// When the bulk delete fails partway the cart is refetched instead, so
    /// the page shows whatever rows survived.
    pub async fn checkout(&self) -> Result<(), ApiError> {
        let _chain = self.mutations.lock().await;

        match self.backend.checkout().await {
            Ok(deleted) => {
                log::info!("[controller] checkout removed {} item(s)", deleted.len());
                let mut state = self.state.lock().unwrap();
                state.set_cart(Vec::new());
                if state.notice().is_some() {
                    state.set_notice(None);
                }
                Ok(())
            }
            Err(e) => {
                let err = self.fail("checkout", e);
                match self.backend.get_cart().await {
                    Ok(cart) => self.state.lock().unwrap().set_cart(cart),
                    Err(e) => log::warn!("[controller] refetch after failed checkout: {}", e),
                }
                Err(err)
            }
        }
    }

    async fn refresh_cart(&self, what: &str) -> Result<(), ApiError> {
        match self.backend.get_cart().await {
            Ok(cart) => {
                let mut state = self.state.lock().unwrap();
                state.set_cart(cart);
                if state.notice().is_some() {
                    state.set_notice(None);
                }
                Ok(())
            }
            Err(e) => Err(self.fail(what, e)),
        }
    }

    /// Surface a failure on the page and hand it back to the caller.
    fn fail(&self, what: &str, err: ApiError) -> ApiError {
        log::warn!("[controller] {} failed: {}", what, err);
        self.state
            .lock()
            .unwrap()
            .set_notice(Some(format!("Could not {}: {}", what, err)));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeBackend};
    use crate::view::Screen;

    fn controller(backend: FakeBackend) -> Controller<FakeBackend> {
        Controller::new(backend, ControllerOptions::default())
    }

    fn id(n: u64) -> ItemId {
        ItemId::from(n)
    }

    #[tokio::test]
    async fn bootstrap_zeroes_pending_amounts() {
        let backend = FakeBackend::with_inventory(&["Apple", "Pear"]);
        backend.set_inventory_amount(1, 7);
        let ctl = controller(backend);

        ctl.bootstrap().await.unwrap();
        assert!(ctl.inventory().iter().all(|i| i.amount == 0));
        assert_eq!(ctl.inventory().len(), 2);
    }

    #[tokio::test]
    async fn increase_then_decrease_restores_and_clamps() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));
        ctl.bootstrap().await.unwrap();

        for _ in 0..3 {
            ctl.dispatch(UiAction::Increase(id(1))).await.unwrap();
        }
        for _ in 0..3 {
            ctl.dispatch(UiAction::Decrease(id(1))).await.unwrap();
        }
        assert_eq!(ctl.inventory()[0].amount, 0);

        ctl.dispatch(UiAction::Decrease(id(1))).await.unwrap();
        assert_eq!(ctl.inventory()[0].amount, 0);
        assert!(!ctl.update_amount(&id(99), 1));
    }

    #[tokio::test]
    async fn add_with_zero_pending_does_nothing() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));
        ctl.bootstrap().await.unwrap();
        ctl.backend().clear_calls();

        let renders = std::sync::Arc::new(std::sync::Mutex::new(0));
        let r = renders.clone();
        ctl.subscribe(move |_| *r.lock().unwrap() += 1);

        ctl.add_to_cart(&id(1)).await.unwrap();
        assert!(ctl.backend().calls().is_empty());
        assert_eq!(*renders.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn add_new_item_posts_then_refetches() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));
        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 2);
        ctl.backend().clear_calls();

        ctl.add_to_cart(&id(1)).await.unwrap();
        assert_eq!(
            ctl.backend().calls(),
            vec![
                Call::AddToCart(NewCartItem { content: "Apple".into(), amount: 2 }),
                Call::GetCart,
            ]
        );
        assert_eq!(ctl.cart().len(), 1);
        assert_eq!(ctl.cart()[0].amount, 2);
        // pending batch is kept
        assert_eq!(ctl.inventory()[0].amount, 2);
    }

    #[tokio::test]
    async fn add_existing_content_patches_summed_amount() {
        let backend = FakeBackend::with_inventory(&["Apple"]);
        backend.seed_cart("Apple", 3);
        let ctl = controller(backend);
        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 2);
        ctl.backend().clear_calls();

        ctl.add_to_cart(&id(1)).await.unwrap();
        let cart_id = ctl.cart()[0].id.clone();
        assert_eq!(ctl.backend().calls(), vec![Call::UpdateCart(cart_id, 5), Call::GetCart]);
        assert_eq!(ctl.cart().len(), 1);
        assert_eq!(ctl.cart()[0].amount, 5);
    }

    #[tokio::test]
    async fn reset_option_zeroes_pending_after_add() {
        let ctl = Controller::new(
            FakeBackend::with_inventory(&["Apple"]),
            ControllerOptions { reset_pending_after_add: true },
        );
        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 4);

        ctl.add_to_cart(&id(1)).await.unwrap();
        assert_eq!(ctl.inventory()[0].amount, 0);
        assert_eq!(ctl.cart()[0].amount, 4);
    }

    #[tokio::test]
    async fn delete_removes_matching_row_only() {
        let backend = FakeBackend::with_inventory(&[]);
        let apple = backend.seed_cart("Apple", 1);
        backend.seed_cart("Pear", 2);
        let ctl = controller(backend);
        ctl.bootstrap().await.unwrap();
        ctl.backend().clear_calls();

        ctl.dispatch(UiAction::Delete(apple.clone())).await.unwrap();
        assert_eq!(ctl.backend().calls(), vec![Call::DeleteFromCart(apple), Call::GetCart]);
        let cart = ctl.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].content, "Pear");
    }

    #[tokio::test]
    async fn delete_unknown_id_is_a_no_op() {
        let ctl = controller(FakeBackend::with_inventory(&[]));
        ctl.bootstrap().await.unwrap();
        ctl.backend().clear_calls();

        ctl.delete(&id(42)).await.unwrap();
        assert!(ctl.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn checkout_deletes_each_row_and_empties_local_cart() {
        let backend = FakeBackend::with_inventory(&[]);
        let a = backend.seed_cart("Apple", 1);
        let b = backend.seed_cart("Pear", 2);
        let ctl = controller(backend);
        ctl.bootstrap().await.unwrap();
        ctl.backend().clear_calls();

        ctl.dispatch(UiAction::Checkout).await.unwrap();
        assert_eq!(
            ctl.backend().calls(),
            vec![Call::GetCart, Call::DeleteFromCart(a), Call::DeleteFromCart(b)]
        );
        assert!(ctl.cart().is_empty());
    }

    #[tokio::test]
    async fn failure_sets_notice_and_success_clears_it() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));
        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 1);

        ctl.backend().fail_next(ApiError::Server { status: 500, message: String::new() });
        let err = ctl.add_to_cart(&id(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
        assert_eq!(ctl.notice().as_deref(), Some("Could not add to cart: server returned 500"));
        assert!(ctl.cart().is_empty());

        ctl.add_to_cart(&id(1)).await.unwrap();
        assert_eq!(ctl.notice(), None);
        assert_eq!(ctl.cart().len(), 1);
    }

    #[tokio::test]
    async fn successful_reload_clears_load_notice() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));

        ctl.backend().fail_next(ApiError::Network("down".into()));
        assert!(ctl.bootstrap().await.is_err());
        assert_eq!(ctl.notice().as_deref(), Some("Could not load: network: down"));

        ctl.bootstrap().await.unwrap();
        assert_eq!(ctl.notice(), None);
        assert_eq!(ctl.inventory().len(), 1);
    }

    #[tokio::test]
    async fn local_amount_change_keeps_notice() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));
        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 1);

        ctl.backend().fail_next(ApiError::Network("down".into()));
        assert!(ctl.add_to_cart(&id(1)).await.is_err());

        ctl.dispatch(UiAction::Increase(id(1))).await.unwrap();
        assert!(ctl.notice().is_some());
        assert_eq!(ctl.inventory()[0].amount, 2);
    }

    #[tokio::test]
    async fn failed_checkout_refetches_surviving_rows() {
        let backend = FakeBackend::with_inventory(&[]);
        backend.seed_cart("Apple", 1);
        let ctl = controller(backend);
        ctl.bootstrap().await.unwrap();

        ctl.backend().fail_next(ApiError::Network("connection reset".into()));
        assert!(ctl.checkout().await.is_err());
        assert_eq!(ctl.cart().len(), 1);
        assert!(ctl.notice().unwrap().starts_with("Could not checkout"));
    }

    #[tokio::test]
    async fn screen_tracks_every_change() {
        let ctl = controller(FakeBackend::with_inventory(&["Apple"]));
        let screen = Screen::shared();
        ctl.attach_screen(screen.clone());
        assert_eq!(screen.lock().unwrap().version, 1);

        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 2);
        ctl.add_to_cart(&id(1)).await.unwrap();

        let screen = screen.lock().unwrap();
        assert!(screen.inventory.contains("<span class=\"amount\">2</span>"));
        assert!(screen.cart.contains("Apple x 2"));
    }

    #[tokio::test]
    async fn concurrent_adds_are_serialized() {
        let ctl = std::sync::Arc::new(controller(FakeBackend::with_inventory(&["Apple"])));
        ctl.bootstrap().await.unwrap();
        ctl.update_amount(&id(1), 1);

        let a = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.add_to_cart(&id(1)).await }
        });
        let b = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.add_to_cart(&id(1)).await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // second chain saw the first one's refetch and merged into it
        let cart = ctl.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].amount, 2);
    }
}
