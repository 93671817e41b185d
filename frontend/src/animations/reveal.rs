use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::animations::observe_once;
use crate::error::Result;
use crate::utils::dom::{query_all_html, set_styles};

const SELECTOR: &str = ".service-card, .portfolio-item, .stat";

const HIDDEN: &[(&str, &str)] = &[
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "opacity 0.6s ease, transform 0.6s ease"),
];

const SHOWN: &[(&str, &str)] = &[("opacity", "1"), ("transform", "translateY(0)")];

fn reveal(element: &HtmlElement) {
    if let Err(e) = set_styles(element, SHOWN) {
        log::warn!("Failed to reveal element: {}", e);
    }
}

pub fn attach() -> Result<()> {
    let elements = query_all_html(SELECTOR)?;
    if elements.is_empty() {
        return Ok(());
    }

    let observer = match observe_once(0.1, Some("0px 0px -50px 0px"), |target| {
        if let Ok(el) = target.dyn_into::<HtmlElement>() {
            reveal(&el);
        }
    }) {
        Ok(observer) => observer,
        Err(e) => {
            // Never leave content hidden when the browser can't observe it.
            log::warn!("IntersectionObserver unavailable ({}), showing content", e);
            return Ok(());
        }
    };

    for el in &elements {
        set_styles(el, HIDDEN)?;
        observer.observe(el);
    }
    log::debug!("Watching {} elements for entrance", elements.len());
    Ok(())
}
