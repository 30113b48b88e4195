//! Page shell served at `/`.
//!
//! The body is rendered server-side from current state. The inline script
//! delegates every `data-a_click` to `POST /actions/:name` and swaps the
//! returned region markup into place.

use cart_core::view::{CART_SELECTOR, INVENTORY_SELECTOR, NOTICE_SELECTOR};
use cart_core::State;
use cart_render_html::{render_page, PageOptions};

const CLIENT_SCRIPT: &str = r#"(function () {
  var regions = { inventory: "__INVENTORY__", cart: "__CART__", notice: "__NOTICE__" };
  var shown = 0;

  function apply(screen) {
    if (!screen || typeof screen.version !== "number" || screen.version < shown) return;
    shown = screen.version;
    Object.keys(regions).forEach(function (k) {
      document.querySelector(regions[k]).innerHTML = screen[k];
    });
    document.querySelector(regions.notice).classList.toggle("visible", screen.notice !== "");
  }

  document.addEventListener("click", function (e) {
    var el = e.target.closest("[data-a_click]");
    if (!el) return;
    var row = el.closest("li[data-id]");
    var body = row ? { id: row.getAttribute("data-id") } : {};
    fetch("/actions/" + el.getAttribute("data-a_click"), {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(body)
    })
      .then(function (r) { return r.json(); })
      .then(function (data) {
        if (data && data.error) console.error("[cart]", data.error);
        apply(data && data.screen ? data.screen : data);
      })
      .catch(function (err) { console.error("[cart]", err); });
  });
})();"#;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
.app{display:flex;flex-wrap:wrap;gap:2rem}\
.notice{display:none;flex-basis:100%;color:#8a1c1c;background:#fde8e8;padding:.5rem 1rem}\
.notice.visible{display:block}\
ul{list-style:none;padding:0}\
li{display:flex;gap:.5rem;align-items:center;margin:.25rem 0}\
.name{min-width:8rem}";

fn client_script() -> String {
    CLIENT_SCRIPT
        .replace("__INVENTORY__", INVENTORY_SELECTOR)
        .replace("__CART__", CART_SELECTOR)
        .replace("__NOTICE__", NOTICE_SELECTOR)
}

pub fn render(state: &State) -> String {
    render_page(&PageOptions {
        body: cart_core::render_body(state),
        title: Some("Shopping Cart".into()),
        inline_css: Some(STYLE.into()),
        inline_scripts: vec![client_script()],
    })
}
