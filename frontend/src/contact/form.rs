use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{FormData, HtmlButtonElement, HtmlElement, HtmlFormElement};

use crate::config::{self, FALLBACK_EMAIL, NOTIFICATION_LIFETIME_MS};
use crate::contact::validation::ContactSubmission;
use crate::error::{Result, SiteError};
use crate::utils::api::Api;
use crate::utils::dom::{listen, query};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";
pub const MAILTO_MESSAGE: &str =
    "Your email client will open with the message pre-filled. Please send the email to complete your inquiry.";

pub fn failure_message() -> String {
    format!(
        "Sorry, your message could not be sent. Please email us directly at {}.",
        FALLBACK_EMAIL
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        }
    }
}

/// Where a validated inquiry goes.
#[allow(async_fn_in_trait)]
pub trait ContactTransport {
    async fn submit(&self, submission: &ContactSubmission) -> Result<()>;
}

/// What the submission flow needs from the page.
pub trait FormView {
    fn read(&self) -> ContactSubmission;
    fn set_submitting(&self, submitting: bool);
    fn notify(&self, kind: NoticeKind, message: &str);
    fn reset(&self);
    fn open_mailto(&self, href: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid,
    Sent,
    Failed,
    MailtoOpened,
    /// A submission was already in flight.
    Ignored,
}

pub struct ContactFormController<T, V> {
    transport: Option<T>,
    view: V,
    in_flight: Cell<bool>,
}

impl<T: ContactTransport, V: FormView> ContactFormController<T, V> {
    /// `transport` is `None` when no endpoint is configured; the form then
    /// falls back to a `mailto:` link.
    pub fn new(transport: Option<T>, view: V) -> Self {
        Self {
            transport,
            view,
            in_flight: Cell::new(false),
        }
    }

    pub async fn handle_submit(&self) -> SubmitOutcome {
        if self.in_flight.get() {
            return SubmitOutcome::Ignored;
        }

        let submission = self.view.read();
        if let Err(e) = submission.validate() {
            log::info!("Contact form rejected: {:?}", e);
            self.view.notify(NoticeKind::Error, &e.to_string());
            return SubmitOutcome::Invalid;
        }

        let Some(transport) = &self.transport else {
            self.view.open_mailto(&submission.mailto(FALLBACK_EMAIL));
            self.view.notify(NoticeKind::Info, MAILTO_MESSAGE);
            self.view.reset();
            return SubmitOutcome::MailtoOpened;
        };

        self.in_flight.set(true);
        self.view.set_submitting(true);
        let result = transport.submit(&submission).await;
        self.view.set_submitting(false);
        self.in_flight.set(false);

        match result {
            Ok(()) => {
                log::info!("Contact form sent");
                self.view.notify(NoticeKind::Success, SUCCESS_MESSAGE);
                self.view.reset();
                SubmitOutcome::Sent
            }
            Err(e) => {
                log::error!("Contact form submission failed: {}", e);
                self.view.notify(NoticeKind::Error, &failure_message());
                SubmitOutcome::Failed
            }
        }
    }
}

/// Posts to a hosted form service (Formspree style).
pub struct FormEndpoint {
    url: String,
}

impl FormEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ContactTransport for FormEndpoint {
    async fn submit(&self, submission: &ContactSubmission) -> Result<()> {
        Api::post(&self.url)
            .form(&submission.fields())
            .send()
            .await
            .map(|_| ())
    }
}

/// The `.contact-form` on the live page.
pub struct DomFormView {
    form: HtmlFormElement,
    button: Option<HtmlButtonElement>,
    button_label: String,
    banner: Option<HtmlElement>,
    hide_timer: RefCell<Option<Timeout>>,
}

impl DomFormView {
    pub fn new(form: HtmlFormElement) -> Self {
        let button = form
            .query_selector("button[type=submit], button:not([type])")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        let button_label = button
            .as_ref()
            .and_then(|b| b.text_content())
            .unwrap_or_default();
        let banner = query(".form-notification")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        Self {
            form,
            button,
            button_label,
            banner,
            hide_timer: RefCell::new(None),
        }
    }

    fn field(data: &FormData, name: &str) -> String {
        data.get(name).as_string().unwrap_or_default()
    }
}

impl FormView for DomFormView {
    fn read(&self) -> ContactSubmission {
        match FormData::new_with_form(&self.form) {
            Ok(data) => ContactSubmission::new(
                &Self::field(&data, "name"),
                &Self::field(&data, "email"),
                &Self::field(&data, "subject"),
                &Self::field(&data, "message"),
            ),
            Err(e) => {
                log::warn!("Could not read contact form: {:?}", e);
                ContactSubmission::default()
            }
        }
    }

    fn set_submitting(&self, submitting: bool) {
        if let Some(button) = &self.button {
            button.set_disabled(submitting);
            let label = if submitting { "Sending..." } else { self.button_label.as_str() };
            button.set_text_content(Some(label));
        }
    }

    fn notify(&self, kind: NoticeKind, message: &str) {
        let Some(banner) = &self.banner else {
            if let Some(win) = web_sys::window() {
                let _ = win.alert_with_message(message);
            }
            return;
        };
        banner.set_text_content(Some(message));
        banner.set_class_name(&format!("form-notification {} show", kind.class()));

        let banner = banner.clone();
        let timeout = Timeout::new(NOTIFICATION_LIFETIME_MS, move || {
            let _ = banner.class_list().remove_1("show");
        });
        // A newer message restarts the countdown.
        self.hide_timer.borrow_mut().replace(timeout);
    }

    fn reset(&self) {
        self.form.reset();
    }

    fn open_mailto(&self, href: &str) {
        if let Some(win) = web_sys::window() {
            if let Err(e) = win.location().set_href(href) {
                log::error!("Failed to open mail client: {:?}", e);
            }
        }
    }
}

/// Endpoint from the form's own `action` when it is absolute, otherwise the
/// build-time default.
pub fn resolve_endpoint(action: Option<&str>) -> Option<String> {
    action
        .map(str::trim)
        .filter(|a| a.starts_with("https://") || a.starts_with("http://"))
        .map(str::to_string)
        .or_else(config::get_form_endpoint)
}

pub fn attach() -> Result<()> {
    let Some(form) = query(".contact-form")? else {
        log::debug!("No contact form on this page");
        return Ok(());
    };
    let form: HtmlFormElement = form
        .dyn_into()
        .map_err(|_| SiteError::Dom(".contact-form is not a <form>".to_string()))?;

    let endpoint = resolve_endpoint(form.get_attribute("action").as_deref());
    match &endpoint {
        Some(url) => log::info!("Contact form posts to {}", url),
        None => log::warn!("No form endpoint configured, using mailto fallback"),
    }

    let controller = Rc::new(ContactFormController::new(
        endpoint.map(FormEndpoint::new),
        DomFormView::new(form.clone()),
    ));
    listen(&form, "submit", move |event| {
        event.prevent_default();
        let controller = controller.clone();
        spawn_local(async move {
            controller.handle_submit().await;
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[derive(Clone, Copy)]
    enum Reply {
        Ok,
        Status(u16),
        Network,
    }

    struct MockTransport {
        reply: Reply,
        calls: Cell<usize>,
    }

    impl MockTransport {
        fn new(reply: Reply) -> Self {
            Self { reply, calls: Cell::new(0) }
        }
    }

    impl ContactTransport for MockTransport {
        async fn submit(&self, _submission: &ContactSubmission) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            match self.reply {
                Reply::Ok => Ok(()),
                Reply::Status(code) => Err(SiteError::Status(code)),
                Reply::Network => Err(SiteError::Network("connection refused".into())),
            }
        }
    }

    #[derive(Default)]
    struct MockView {
        input: ContactSubmission,
        notices: RefCell<Vec<(NoticeKind, String)>>,
        submitting: RefCell<Vec<bool>>,
        resets: Cell<usize>,
        mailto: RefCell<Option<String>>,
    }

    impl MockView {
        fn with(input: ContactSubmission) -> Self {
            Self { input, ..Default::default() }
        }
    }

    impl FormView for MockView {
        fn read(&self) -> ContactSubmission {
            self.input.clone()
        }
        fn set_submitting(&self, submitting: bool) {
            self.submitting.borrow_mut().push(submitting);
        }
        fn notify(&self, kind: NoticeKind, message: &str) {
            self.notices.borrow_mut().push((kind, message.to_string()));
        }
        fn reset(&self) {
            self.resets.set(self.resets.get() + 1);
        }
        fn open_mailto(&self, href: &str) {
            *self.mailto.borrow_mut() = Some(href.to_string());
        }
    }

    fn valid() -> ContactSubmission {
        ContactSubmission::new("Ann", "ann@example.com", "Viewing", "Saturday?")
    }

    #[test]
    fn success_notifies_and_resets() {
        let controller =
            ContactFormController::new(Some(MockTransport::new(Reply::Ok)), MockView::with(valid()));
        assert_eq!(block_on(controller.handle_submit()), SubmitOutcome::Sent);

        let view = &controller.view;
        assert_eq!(
            *view.notices.borrow(),
            vec![(NoticeKind::Success, SUCCESS_MESSAGE.to_string())]
        );
        assert_eq!(view.resets.get(), 1);
        assert_eq!(*view.submitting.borrow(), vec![true, false]);
    }

    #[test]
    fn failures_notify_without_reset() {
        for reply in [Reply::Status(500), Reply::Status(422), Reply::Network] {
            let controller =
                ContactFormController::new(Some(MockTransport::new(reply)), MockView::with(valid()));
            assert_eq!(block_on(controller.handle_submit()), SubmitOutcome::Failed);

            let view = &controller.view;
            let notices = view.notices.borrow();
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].0, NoticeKind::Error);
            assert!(notices[0].1.contains(FALLBACK_EMAIL));
            assert_eq!(view.resets.get(), 0);
            assert_eq!(*view.submitting.borrow(), vec![true, false]);
        }
    }

    #[test]
    fn invalid_input_never_reaches_transport() {
        let mut bad_email = valid();
        bad_email.email = "ann.example.com".into();
        let mut missing = valid();
        missing.subject.clear();

        for (input, message) in [
            (bad_email, "Please enter a valid email address."),
            (missing, "Please fill in all fields."),
        ] {
            let controller =
                ContactFormController::new(Some(MockTransport::new(Reply::Ok)), MockView::with(input));
            assert_eq!(block_on(controller.handle_submit()), SubmitOutcome::Invalid);
            assert_eq!(controller.transport.as_ref().map(|t| t.calls.get()), Some(0));

            let view = &controller.view;
            assert_eq!(*view.notices.borrow(), vec![(NoticeKind::Error, message.to_string())]);
            assert!(view.submitting.borrow().is_empty());
            assert_eq!(view.resets.get(), 0);
        }
    }

    #[test]
    fn submit_while_in_flight_is_ignored() {
        let controller =
            ContactFormController::new(Some(MockTransport::new(Reply::Ok)), MockView::with(valid()));
        controller.in_flight.set(true);

        assert_eq!(block_on(controller.handle_submit()), SubmitOutcome::Ignored);
        assert_eq!(controller.transport.as_ref().map(|t| t.calls.get()), Some(0));

        let view = &controller.view;
        assert!(view.notices.borrow().is_empty());
        assert!(view.submitting.borrow().is_empty());
        assert_eq!(view.resets.get(), 0);
        assert!(controller.in_flight.get());
    }

    #[test]
    fn no_endpoint_falls_back_to_mailto() {
        let controller = ContactFormController::<MockTransport, _>::new(None, MockView::with(valid()));
        assert_eq!(block_on(controller.handle_submit()), SubmitOutcome::MailtoOpened);

        let view = &controller.view;
        let href = view.mailto.borrow().clone().unwrap_or_default();
        assert!(href.starts_with(&format!("mailto:{}?subject=Viewing", FALLBACK_EMAIL)));
        assert_eq!(view.notices.borrow()[0].0, NoticeKind::Info);
        assert_eq!(view.resets.get(), 1);
    }

    #[test]
    fn action_attribute_wins_when_absolute() {
        assert_eq!(
            resolve_endpoint(Some(" https://formspree.io/f/abc ")),
            Some("https://formspree.io/f/abc".to_string())
        );
        assert_eq!(resolve_endpoint(Some("/contact")), config::get_form_endpoint());
        assert_eq!(resolve_endpoint(None), config::get_form_endpoint());
    }
}
