use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::animations::observe_once;
use crate::config::COUNTER_DURATION_MS;
use crate::error::Result;
use crate::utils::dom::{query_all, window};

/// A statistic label such as `"$50M+"`, split around its first number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterLabel {
    pub prefix: String,
    pub target: u64,
    pub suffix: String,
    original: String,
}

impl CounterLabel {
    /// `None` when the text has no digits (or a number too large to count).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let len = text[start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len() - start);
        let end = start + len;
        let target = text[start..end].parse().ok()?;
        Some(Self {
            prefix: text[..start].to_string(),
            target,
            suffix: text[end..].to_string(),
            original: text.to_string(),
        })
    }

    pub fn text_at(&self, value: u64) -> String {
        format!("{}{}{}", self.prefix, value, self.suffix)
    }

    pub fn initial_text(&self) -> String {
        self.text_at(0)
    }

    pub fn final_text(&self) -> &str {
        &self.original
    }

    /// Value shown `elapsed` ms into an animation of `duration` ms.
    pub fn value_at(&self, elapsed: f64, duration: f64) -> u64 {
        if duration <= 0.0 || elapsed >= duration {
            return self.target;
        }
        let t = (elapsed / duration).max(0.0);
        (self.target as f64 * t).floor() as u64
    }
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) {
    if let Ok(win) = window() {
        if let Err(e) = win.request_animation_frame(callback.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
    }
}

/// Repaints `element` every frame from zero up to the label's value.
pub fn animate(element: Element, label: CounterLabel, duration: f64) {
    element.set_text_content(Some(&label.initial_text()));

    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let handle = frame.clone();
    let mut started: Option<f64> = None;

    *handle.borrow_mut() = Some(Closure::new(move |now: f64| {
        let begin = *started.get_or_insert(now);
        let elapsed = now - begin;
        if elapsed >= duration {
            element.set_text_content(Some(label.final_text()));
            // Drops this closure; nothing else holds it.
            let _ = frame.borrow_mut().take();
            return;
        }
        element.set_text_content(Some(&label.text_at(label.value_at(elapsed, duration))));
        if let Some(next) = frame.borrow().as_ref() {
            request_frame(next);
        }
    }));

    if let Some(first) = handle.borrow().as_ref() {
        request_frame(first);
    };
}

pub fn attach() -> Result<()> {
    let stats = query_all(".stat")?;
    if stats.is_empty() {
        return Ok(());
    }

    let observer = observe_once(0.5, None, |stat| {
        let Some(heading) = stat.query_selector("h4").ok().flatten() else {
            return;
        };
        let text = heading.text_content().unwrap_or_default();
        match CounterLabel::parse(&text) {
            Some(label) => animate(heading, label, COUNTER_DURATION_MS),
            None => log::debug!("Stat {:?} has no number to count", text),
        }
    })?;

    for stat in &stats {
        observer.observe(stat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_number_and_suffix() {
        let label = CounterLabel::parse("50M+").unwrap();
        assert_eq!((label.prefix.as_str(), label.target, label.suffix.as_str()), ("", 50, "M+"));
        assert_eq!(label.initial_text(), "0M+");
        assert_eq!(label.final_text(), "50M+");

        let pct = CounterLabel::parse("11%+").unwrap();
        assert_eq!(pct.target, 11);
        assert_eq!(pct.initial_text(), "0%+");
        assert_eq!(pct.final_text(), "11%+");
    }

    #[test]
    fn plain_suffix() {
        let label = CounterLabel::parse("15+").unwrap();
        assert_eq!(label.initial_text(), "0+");
        assert_eq!(label.text_at(label.value_at(2000.0, 2000.0)), "15+");
    }

    #[test]
    fn keeps_currency_prefix() {
        let label = CounterLabel::parse("  $50M+\n").unwrap();
        assert_eq!(label.prefix, "$");
        assert_eq!(label.initial_text(), "$0M+");
        assert_eq!(label.final_text(), "$50M+");
    }

    #[test]
    fn text_without_digits_is_not_a_counter() {
        assert_eq!(CounterLabel::parse("Many"), None);
        assert_eq!(CounterLabel::parse(""), None);
        assert_eq!(CounterLabel::parse("99999999999999999999999+"), None);
    }

    #[test]
    fn values_climb_monotonically_to_target() {
        let label = CounterLabel::parse("50M+").unwrap();
        assert_eq!(label.value_at(0.0, 2000.0), 0);
        assert_eq!(label.value_at(1000.0, 2000.0), 25);
        assert_eq!(label.value_at(5000.0, 2000.0), 50);

        let mut last = 0;
        for ms in (0..=2100).step_by(16) {
            let v = label.value_at(ms as f64, 2000.0);
            assert!(v >= last && v <= 50);
            last = v;
        }
        assert_eq!(last, 50);
    }
}
