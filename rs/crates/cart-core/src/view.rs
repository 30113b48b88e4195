//! List views.
//!
//! Pure functions from the current lists to DomNode trees. Rows carry the
//! item id in `data-id` and their buttons carry `data-a_click` action names,
//! so the page script resolves clicks without reading row text.

use std::sync::{Arc, Mutex};

use cart_api::{CartItem, InventoryItem};
use cart_dom::DomNode;
use cart_render_html::render_inner_html;
use serde::Serialize;

use crate::state::State;

pub const INVENTORY_SELECTOR: &str = ".inventory-container ul";
pub const CART_SELECTOR: &str = ".cart-container ul";
pub const NOTICE_SELECTOR: &str = ".notice";

pub fn render_inventory(items: &[InventoryItem]) -> DomNode {
    let rows = items
        .iter()
        .map(|item| {
            DomNode::element("li")
                .with_attr("data-id", item.id.as_str())
                .with_children(vec![
                    DomNode::text("span", &item.content).with_class("name"),
                    button("decrease", "-"),
                    DomNode::text("span", &item.amount.to_string()).with_class("amount"),
                    button("increase", "+"),
                    button("add-to-cart", "add to cart"),
                ])
        })
        .collect();
    DomNode::element("ul").with_key("inventory").with_children(rows)
}

pub fn render_cart(items: &[CartItem]) -> DomNode {
    let rows = items
        .iter()
        .map(|item| {
            DomNode::element("li")
                .with_attr("data-id", item.id.as_str())
                .with_children(vec![
                    DomNode::text("span", &format!("{} x {}", item.content, item.amount))
                        .with_class("name"),
                    button("delete", "delete"),
                ])
        })
        .collect();
    DomNode::element("ul").with_key("cart").with_children(rows)
}

pub fn render_notice(notice: Option<&str>) -> DomNode {
    let mut node = DomNode::element("div").with_key("notice").with_attr("role", "alert");
    match notice {
        Some(msg) => {
            node = node.with_class("notice visible");
            node.push_child(DomNode::text("p", msg));
        }
        None => node = node.with_class("notice"),
    }
    node
}

/// Whole page body: notice banner, inventory list, cart list, checkout button.
pub fn render_body(state: &State) -> DomNode {
    DomNode::element("div").with_class("app").with_children(vec![
        render_notice(state.notice()),
        DomNode::element("div")
            .with_class("inventory-container")
            .with_children(vec![
                DomNode::text("h2", "Inventory"),
                render_inventory(state.inventory()),
            ]),
        DomNode::element("div")
            .with_class("cart-container")
            .with_children(vec![
                DomNode::text("h2", "Shopping Cart"),
                render_cart(state.cart()),
                button("checkout-btn", "checkout"),
            ]),
    ])
}

/// Button whose class doubles as the click action name.
fn button(action: &str, label: &str) -> DomNode {
    DomNode::text("button", label)
        .with_class(action)
        .on("click", action.trim_end_matches("-btn"))
}

/// Last painted markup for each page region.
///
/// Every paint replaces all three regions and bumps `version`, so the page
/// script can drop responses older than what it already shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Screen {
    pub version: u64,
    pub inventory: String,
    pub cart: String,
    pub notice: String,
}

pub type SharedScreen = Arc<Mutex<Screen>>;

impl Screen {
    pub fn shared() -> SharedScreen {
        Arc::new(Mutex::new(Screen::default()))
    }

    pub fn paint(&mut self, state: &State) {
        self.version += 1;
        self.inventory = render_inner_html(&render_inventory(state.inventory()));
        self.cart = render_inner_html(&render_cart(state.cart()));
        self.notice = render_inner_html(&render_notice(state.notice()));
    }
}
