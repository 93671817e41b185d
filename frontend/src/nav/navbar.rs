use crate::config::NAVBAR_SCROLL_THRESHOLD;
use crate::error::Result;
use crate::utils::dom::{listen, query_html, scroll_y, set_styles, window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarStyle {
    pub background: &'static str,
    pub box_shadow: &'static str,
}

pub const RESTING: NavbarStyle = NavbarStyle {
    background: "rgba(255, 255, 255, 0.95)",
    box_shadow: "none",
};

pub const SCROLLED: NavbarStyle = NavbarStyle {
    background: "rgba(255, 255, 255, 0.98)",
    box_shadow: "0 2px 20px rgba(0, 0, 0, 0.1)",
};

pub fn style_for(scroll_y: f64) -> NavbarStyle {
    if scroll_y > NAVBAR_SCROLL_THRESHOLD {
        SCROLLED
    } else {
        RESTING
    }
}

fn paint() {
    let navbar = match query_html(".navbar") {
        Ok(Some(navbar)) => navbar,
        _ => return,
    };
    let style = style_for(scroll_y());
    if let Err(e) = set_styles(
        &navbar,
        &[("background", style.background), ("box-shadow", style.box_shadow)],
    ) {
        log::warn!("Failed to restyle navbar: {}", e);
    }
}

pub fn attach() -> Result<()> {
    // Page may be restored mid-scroll.
    paint();
    listen(&window()?.into(), "scroll", |_| paint())
}
