use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::error::Result;
use crate::utils::dom::{document, listen, query_all};

pub fn attach() -> Result<()> {
    let anchors = query_all(r##"a[href^="#"]"##)?;
    log::debug!("Smooth scrolling {} anchors", anchors.len());
    for anchor in anchors {
        let href = anchor.get_attribute("href").unwrap_or_default();
        listen(&anchor, "click", move |event| {
            event.prevent_default();
            let Some(id) = target_id(&href) else {
                return;
            };
            let target = document().ok().and_then(|doc| doc.get_element_by_id(id));
            if let Some(target) = target {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                opts.set_block(ScrollLogicalPosition::Start);
                target.scroll_into_view_with_scroll_into_view_options(&opts);
            }
        })?;
    }
    Ok(())
}

/// `"#contact"` -> `Some("contact")`; a bare `"#"` has no target.
pub fn target_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hash() {
        assert_eq!(target_id("#services"), Some("services"));
    }

    #[test]
    fn bare_hash_and_external_links_have_no_target() {
        assert_eq!(target_id("#"), None);
        assert_eq!(target_id("https://example.com/#x"), None);
    }
}
