use web_sys::HtmlElement;

use crate::error::Result;
use crate::utils::dom::{listen, query_all, query_html};

pub fn attach() -> Result<()> {
    let (hamburger, nav_menu) = match (query_html(".hamburger")?, query_html(".nav-menu")?) {
        (Some(h), Some(m)) => (h, m),
        _ => {
            log::debug!("No hamburger/nav-menu on this page, skipping mobile nav");
            return Ok(());
        }
    };

    {
        let (h, m) = (hamburger.clone(), nav_menu.clone());
        listen(&hamburger, "click", move |_| {
            for el in [&h, &m] {
                if let Err(e) = el.class_list().toggle("active") {
                    log::warn!("Failed to toggle nav menu: {:?}", e);
                }
            }
        })?;
    }

    for link in query_all(".nav-link")? {
        let (h, m) = (hamburger.clone(), nav_menu.clone());
        listen(&link, "click", move |_| close(&h, &m))?;
    }
    Ok(())
}

fn close(hamburger: &HtmlElement, nav_menu: &HtmlElement) {
    for el in [hamburger, nav_menu] {
        if let Err(e) = el.class_list().remove_1("active") {
            log::warn!("Failed to close nav menu: {:?}", e);
        }
    }
}
