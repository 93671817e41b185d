pub mod active_section;
pub mod navbar;
pub mod smooth_scroll;
pub mod toggle;
