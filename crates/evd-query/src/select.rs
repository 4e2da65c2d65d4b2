//! # Infinite-Scroll Select
//!
//! State and geometry for a dropdown whose options are supplied in pages by
//! the caller. The model never fetches: it reports when more options should
//! be requested and leaves the request to its owner.
//!
//! ## Positioning
//!
//! The dropdown opens below the trigger. It flips above when the space
//! below cannot fit it and there is more room above than below. Its height
//! is capped to the room on the chosen side.
//!
//! ## Events
//!
//! An outside click closes the dropdown. Scroll and resize re-measure the
//! position and keep it open.

use serde::{Deserialize, Serialize};

/// Gap in pixels between trigger and dropdown.
pub const DROPDOWN_GAP: f64 = 4.0;

/// Default distance from the bottom, in pixels, that triggers a load.
pub const LOAD_MORE_THRESHOLD: f64 = 50.0;

/// A bounding rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Below,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropdownPosition {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub max_height: f64,
    pub placement: Placement,
}

/// Place a dropdown of `dropdown_height` relative to `trigger`.
pub fn compute_position(trigger: Rect, viewport: Viewport, dropdown_height: f64) -> DropdownPosition {
    let space_below = (viewport.height - trigger.bottom() - DROPDOWN_GAP).max(0.0);
    let space_above = (trigger.top - DROPDOWN_GAP).max(0.0);
    let flip = space_below < dropdown_height && space_above > space_below;
    let width = trigger.width.min(viewport.width);
    let left = trigger.left.clamp(0.0, (viewport.width - width).max(0.0));

    if flip {
        let max_height = dropdown_height.min(space_above);
        DropdownPosition {
            top: trigger.top - DROPDOWN_GAP - max_height,
            left,
            width,
            max_height,
            placement: Placement::Above,
        }
    } else {
        DropdownPosition {
            top: trigger.bottom() + DROPDOWN_GAP,
            left,
            width,
            max_height: dropdown_height.min(space_below),
            placement: Placement::Below,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Options whose label contains `search`, case-insensitively. A blank
/// search keeps everything.
pub fn filter_options<'a>(options: &'a [SelectOption], search: &str) -> Vec<&'a SelectOption> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return options.iter().collect();
    }
    options
        .iter()
        .filter(|o| o.label.to_lowercase().contains(&needle))
        .collect()
}

/// A window of options served to a paging select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPage {
    pub items: Vec<SelectOption>,
    pub offset: usize,
    pub total: usize,
    pub has_more: bool,
}

/// Search, then take `limit` options starting at `offset`.
pub fn page_options(options: &[SelectOption], search: &str, offset: usize, limit: usize) -> OptionPage {
    let matched = filter_options(options, search);
    let total = matched.len();
    let items: Vec<SelectOption> = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    let has_more = offset.saturating_add(items.len()) < total;
    OptionPage {
        items,
        offset,
        total,
        has_more,
    }
}

/// Scroll geometry of the option list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadMoreGate {
    pub threshold: f64,
}

impl Default for LoadMoreGate {
    fn default() -> Self {
        Self {
            threshold: LOAD_MORE_THRESHOLD,
        }
    }
}

impl LoadMoreGate {
    /// True only near the bottom, with more to fetch and no fetch in flight.
    pub fn should_load_more(&self, scroll: ScrollMetrics, has_more: bool, loading: bool) -> bool {
        has_more && !loading && scroll.distance_to_bottom() <= self.threshold
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    /// Trigger clicked.
    Toggle,
    OutsideClick,
    Scroll,
    Resize,
    Search(String),
    Choose(String),
}

/// Open/closed state, search text, selection and position.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectModel {
    pub open: bool,
    pub search: String,
    pub selected: Option<String>,
    pub position: Option<DropdownPosition>,
    pub dropdown_height: f64,
}

impl SelectModel {
    pub fn new(dropdown_height: f64) -> Self {
        Self {
            open: false,
            search: String::new(),
            selected: None,
            position: None,
            dropdown_height,
        }
    }

    /// Apply an event, measuring against the current trigger and viewport.
    pub fn on_event(&mut self, event: SelectEvent, trigger: Rect, viewport: Viewport) {
        match event {
            SelectEvent::Toggle => {
                if self.open {
                    self.close();
                } else {
                    self.open = true;
                    self.position = Some(compute_position(trigger, viewport, self.dropdown_height));
                }
            }
            SelectEvent::OutsideClick => self.close(),
            SelectEvent::Scroll | SelectEvent::Resize => {
                if self.open {
                    self.position = Some(compute_position(trigger, viewport, self.dropdown_height));
                }
            }
            SelectEvent::Search(text) => self.search = text,
            SelectEvent::Choose(value) => {
                self.selected = Some(value);
                self.close();
            }
        }
    }

    pub fn visible_options<'a>(&self, options: &'a [SelectOption]) -> Vec<&'a SelectOption> {
        filter_options(options, &self.search)
    }

    fn close(&mut self) {
        self.open = false;
        self.position = None;
        self.search.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    fn trigger_at(top: f64) -> Rect {
        Rect {
            top,
            left: 100.0,
            width: 240.0,
            height: 36.0,
        }
    }

    #[test]
    fn opens_below_when_room() {
        let pos = compute_position(trigger_at(100.0), VIEWPORT, 300.0);
        assert_eq!(pos.placement, Placement::Below);
        assert_eq!(pos.top, 140.0);
        assert_eq!(pos.max_height, 300.0);
    }

    #[test]
    fn flips_above_near_bottom() {
        let pos = compute_position(trigger_at(650.0), VIEWPORT, 300.0);
        assert_eq!(pos.placement, Placement::Above);
        assert_eq!(pos.top, 650.0 - 4.0 - 300.0);
    }

    #[test]
    fn stays_below_when_above_is_smaller() {
        let small = Viewport {
            width: 800.0,
            height: 200.0,
        };
        let pos = compute_position(trigger_at(40.0), small, 300.0);
        assert_eq!(pos.placement, Placement::Below);
        assert_eq!(pos.max_height, 200.0 - 76.0 - 4.0);
    }

    #[test]
    fn search_is_case_insensitive_on_label() {
        let options = vec![
            SelectOption::new("1", "Nguyễn Văn An"),
            SelectOption::new("2", "Trần Thị Bình"),
        ];
        assert_eq!(filter_options(&options, "NGUYỄN").len(), 1);
        assert_eq!(filter_options(&options, "  ").len(), 2);
        assert!(filter_options(&options, "1").is_empty());
    }

    #[test]
    fn option_pages_report_has_more() {
        let options: Vec<_> = (0..25)
            .map(|i| SelectOption::new(i.to_string(), format!("Option {i}")))
            .collect();
        let first = page_options(&options, "", 0, 10);
        assert_eq!(first.items.len(), 10);
        assert!(first.has_more);
        let last = page_options(&options, "", 20, 10);
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_more);
        assert_eq!(last.total, 25);
        let searched = page_options(&options, "option 1", 0, 10);
        assert_eq!(searched.total, 11);
        assert!(searched.has_more);
    }

    #[test]
    fn load_more_gate() {
        let gate = LoadMoreGate::default();
        let near = ScrollMetrics {
            scroll_top: 560.0,
            scroll_height: 800.0,
            client_height: 200.0,
        };
        let far = ScrollMetrics {
            scroll_top: 0.0,
            ..near
        };
        assert!(gate.should_load_more(near, true, false));
        assert!(!gate.should_load_more(near, false, false));
        assert!(!gate.should_load_more(near, true, true));
        assert!(!gate.should_load_more(far, true, false));
    }

    #[test]
    fn events_drive_open_state() {
        let mut model = SelectModel::new(300.0);
        model.on_event(SelectEvent::Toggle, trigger_at(100.0), VIEWPORT);
        assert!(model.open);

        model.on_event(SelectEvent::Scroll, trigger_at(650.0), VIEWPORT);
        assert!(model.open);
        assert_eq!(model.position.map(|p| p.placement), Some(Placement::Above));

        model.on_event(SelectEvent::Resize, trigger_at(100.0), VIEWPORT);
        assert_eq!(model.position.map(|p| p.placement), Some(Placement::Below));

        model.on_event(SelectEvent::Search("x".into()), trigger_at(100.0), VIEWPORT);
        model.on_event(SelectEvent::OutsideClick, trigger_at(100.0), VIEWPORT);
        assert!(!model.open);
        assert!(model.position.is_none());
        assert!(model.search.is_empty());
    }

    #[test]
    fn scroll_while_closed_does_not_open() {
        let mut model = SelectModel::new(300.0);
        model.on_event(SelectEvent::Scroll, trigger_at(100.0), VIEWPORT);
        assert!(!model.open);
        assert!(model.position.is_none());
    }

    #[test]
    fn choosing_closes_and_records() {
        let mut model = SelectModel::new(200.0);
        model.on_event(SelectEvent::Toggle, trigger_at(100.0), VIEWPORT);
        model.on_event(SelectEvent::Choose("42".into()), trigger_at(100.0), VIEWPORT);
        assert_eq!(model.selected.as_deref(), Some("42"));
        assert!(!model.open);
    }
}
