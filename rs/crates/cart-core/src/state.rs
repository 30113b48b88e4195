use cart_api::{CartItem, InventoryItem};

/// Handle returned by [`State::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&State) + Send>;

/// Observable store for the two lists and the user-visible notice.
///
/// Every setter replaces the whole value and then calls each subscriber in
/// registration order. Fields are private so nothing can change a list
/// without the subscribers hearing about it.
pub struct State {
    inventory: Vec<InventoryItem>,
    cart: Vec<CartItem>,
    notice: Option<String>,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_subscription: u64,
}

impl State {
    pub fn new() -> Self {
        Self {
            inventory: Vec::new(),
            cart: Vec::new(),
            notice: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_inventory(&mut self, inventory: Vec<InventoryItem>) {
        self.inventory = inventory;
        self.notify();
    }

    pub fn set_cart(&mut self, cart: Vec<CartItem>) {
        self.cart = cart;
        self.notify();
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.notify();
    }

    pub fn subscribe(&mut self, cb: impl Fn(&State) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(cb)));
        id
    }

    /// Remove one subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&self) {
        for (_, cb) in &self.subscribers {
            cb(self);
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("inventory", &self.inventory)
            .field("cart", &self.cart)
            .field("notice", &self.notice)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
