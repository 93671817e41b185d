//! Build-time settings for the site script.
//!
//! Nothing here is read at runtime from the environment; `option_env!` values
//! are baked in when the wasm bundle is built.

/// Address shown to visitors when the form service can't be reached.
pub const FALLBACK_EMAIL: &str = "ritterstandalpha@gmail.com";

/// Scroll offset (px) past which the navbar switches to its solid style.
pub const NAVBAR_SCROLL_THRESHOLD: f64 = 100.0;

/// Allowance for the fixed navbar when deciding which section is active.
///
/// The anchor point tested against section bounds is `scrollY` plus this
/// value, not the raw scroll offset, so a section becomes active once its top
/// clears the navbar rather than the top of the viewport.
pub const ACTIVE_SECTION_OFFSET: f64 = 120.0;

pub const ACTIVE_SECTION_DEBOUNCE_MS: u32 = 50;

pub const COUNTER_DURATION_MS: f64 = 2000.0;

pub const NOTIFICATION_LIFETIME_MS: u32 = 5000;

pub const MEDIA_ROOT: &str = "media/properties";

/// Endpoint used when the contact form carries no usable `action`.
pub fn get_form_endpoint() -> Option<String> {
    option_env!("CONTACT_FORM_ENDPOINT")
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
