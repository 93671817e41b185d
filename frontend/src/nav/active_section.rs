use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use crate::config::{ACTIVE_SECTION_DEBOUNCE_MS, ACTIVE_SECTION_OFFSET};
use crate::error::Result;
use crate::utils::dom::{listen, query_all, query_all_html, query_html, scroll_y, set_styles, window};

/// Vertical extent of a page section in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Index of the section aligned with `position`.
///
/// The first section containing the position wins. In a gap between sections,
/// or past the end of the last one, the closest section above is used; above
/// the first section nothing is active.
pub fn active_index(sections: &[SectionBounds], position: f64) -> Option<usize> {
    if let Some(i) = sections.iter().position(|s| s.contains(position)) {
        return Some(i);
    }
    sections.iter().rposition(|s| s.top <= position)
}

/// Left offset and width (px) for the sliding highlight under a nav link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub left: i32,
    pub width: i32,
}

impl Indicator {
    pub const HIDDEN: Indicator = Indicator { left: 0, width: 0 };
}

fn read_sections() -> Result<Vec<SectionBounds>> {
    let offset = scroll_y();
    Ok(query_all("section[id]")?
        .into_iter()
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            SectionBounds {
                id: el.id(),
                top: rect.top() + offset,
                height: rect.height(),
            }
        })
        .collect())
}

fn paint() -> Result<()> {
    let sections = read_sections()?;
    let active_id = active_index(&sections, scroll_y() + ACTIVE_SECTION_OFFSET)
        .map(|i| format!("#{}", sections[i].id));

    let mut indicator = Indicator::HIDDEN;
    for link in query_all_html(".nav-link")? {
        let is_active = active_id.is_some() && link.get_attribute("href") == active_id;
        if is_active {
            link.class_list().add_1("active")?;
            indicator = Indicator {
                left: link.offset_left(),
                width: link.offset_width(),
            };
        } else {
            link.class_list().remove_1("active")?;
        }
    }

    if let Some(bar) = query_html(".nav-indicator")? {
        let left = format!("{}px", indicator.left);
        let width = format!("{}px", indicator.width);
        set_styles(&bar, &[("left", left.as_str()), ("width", width.as_str())])?;
    }
    Ok(())
}

pub fn attach() -> Result<()> {
    if query_all("section[id]")?.is_empty() {
        log::debug!("No sections with ids, active-section tracking disabled");
        return Ok(());
    }

    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let win = window()?;
    for event in ["scroll", "resize"] {
        let pending = pending.clone();
        listen(&win, event, move |_| {
            // Replacing the handle drops, and so cancels, the previous timeout.
            let timeout = Timeout::new(ACTIVE_SECTION_DEBOUNCE_MS, || {
                if let Err(e) = paint() {
                    log::warn!("Active section update failed: {}", e);
                }
            });
            pending.borrow_mut().replace(timeout);
        })?;
    }

    paint()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<SectionBounds> {
        vec![
            SectionBounds { id: "home".into(), top: 80.0, height: 600.0 },
            SectionBounds { id: "services".into(), top: 680.0, height: 500.0 },
            SectionBounds { id: "portfolio".into(), top: 1300.0, height: 400.0 },
        ]
    }

    #[test]
    fn picks_containing_section() {
        assert_eq!(active_index(&page(), 100.0), Some(0));
        assert_eq!(active_index(&page(), 680.0), Some(1));
        assert_eq!(active_index(&page(), 1500.0), Some(2));
    }

    #[test]
    fn nothing_active_above_first_section() {
        assert_eq!(active_index(&page(), 10.0), None);
        assert_eq!(active_index(&[], 500.0), None);
    }

    #[test]
    fn gap_and_overscroll_fall_back_to_section_above() {
        assert_eq!(active_index(&page(), 1250.0), Some(1));
        assert_eq!(active_index(&page(), 9000.0), Some(2));
    }

    #[test]
    fn overlapping_sections_prefer_document_order() {
        let sections = vec![
            SectionBounds { id: "a".into(), top: 0.0, height: 500.0 },
            SectionBounds { id: "b".into(), top: 300.0, height: 500.0 },
        ];
        assert_eq!(active_index(&sections, 350.0), Some(0));
    }
}
