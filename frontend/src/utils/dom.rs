use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::error::{Result, SiteError};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| SiteError::Dom("no global window".to_string()))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| SiteError::Dom("window has no document".to_string()))
}

/// First element matching `selector`, `None` when the page doesn't have one.
pub fn query(selector: &str) -> Result<Option<Element>> {
    Ok(document()?.query_selector(selector)?)
}

pub fn query_html(selector: &str) -> Result<Option<HtmlElement>> {
    Ok(query(selector)?.and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

pub fn query_all(selector: &str) -> Result<Vec<Element>> {
    let list = document()?.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

pub fn query_all_html(selector: &str) -> Result<Vec<HtmlElement>> {
    Ok(query_all(selector)?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect())
}

/// Attaches `handler` for the lifetime of the page. The closure is leaked on
/// purpose: handlers are wired once at load and never removed.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<()> {
    let style = element.style();
    for (name, value) in styles {
        style.set_property(name, value)?;
    }
    Ok(())
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}
