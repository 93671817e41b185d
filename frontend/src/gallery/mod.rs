pub mod modal;
pub mod probe;
pub mod properties;
pub mod view;

use crate::error::Result;
use crate::utils::dom::document;
use view::{PropertyGallery, PropertyGalleryProps};

/// Renders the listings into `#property-gallery` when the page has one.
pub fn mount() -> Result<()> {
    let Some(root) = document()?.get_element_by_id("property-gallery") else {
        log::debug!("No #property-gallery container, gallery not mounted");
        return Ok(());
    };
    let properties = properties::PROPERTIES.clone();
    log::info!("Rendering {} properties", properties.len());
    yew::Renderer::<PropertyGallery>::with_root_and_props(root, PropertyGalleryProps { properties })
        .render();
    Ok(())
}
