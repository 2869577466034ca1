//! Product popups: at most one open at a time, mirrored into the URL fragment.

use tracing::debug;

/// The page surface popups act on. The browser shell implements this over the
/// real document; tests use a recording fake.
pub trait Viewport {
    fn scroll_y(&self) -> f64;
    fn scroll_to(&mut self, y: f64);
    /// Write the fragment without adding a history entry; `None` clears it.
    fn set_fragment(&mut self, fragment: Option<&str>);
    /// Make the popup with this element id visible. `false` if no such element.
    fn show_popup(&mut self, id: &str) -> bool;
    fn hide_all_popups(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    Open(String),
}

#[derive(Debug, Clone, Default)]
pub struct PopupController {
    state: PopupState,
    saved_scroll: f64,
}

impl PopupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn current(&self) -> Option<&str> {
        match &self.state {
            PopupState::Open(id) => Some(id),
            PopupState::Closed => None,
        }
    }

    /// Remember the scroll offset, close whatever is open, then show `id`.
    /// An unknown id leaves everything closed.
    pub fn open(&mut self, view: &mut impl Viewport, id: &str) {
        self.saved_scroll = view.scroll_y();
        self.close_all(view);

        if view.show_popup(id) {
            debug!(popup = id, "opened popup");
            self.state = PopupState::Open(id.to_string());
            view.set_fragment(Some(id));
        } else {
            debug!(popup = id, "no such popup");
        }
    }

    /// Hide every popup, clear the fragment and put the page back where it was
    /// scrolled when the last popup opened.
    pub fn close_all(&mut self, view: &mut impl Viewport) {
        view.hide_all_popups();
        self.state = PopupState::Closed;
        view.set_fragment(None);
        view.scroll_to(self.saved_scroll);
    }
}

/// Popup id carried by a link target or location hash (`"#popup-tea"`), if it
/// names a popup.
pub fn popup_id_from_fragment<'a>(fragment: &'a str, prefix: &str) -> Option<&'a str> {
    let id = fragment.strip_prefix('#').unwrap_or(fragment);
    (id.starts_with(prefix) && id.len() > prefix.len()).then_some(id)
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingViewport;
    use super::*;

    #[test]
    fn opening_a_second_popup_closes_the_first() {
        let mut view = RecordingViewport::with_popups(&["popup-a", "popup-b"]);
        let mut popups = PopupController::new();

        popups.open(&mut view, "popup-a");
        popups.open(&mut view, "popup-b");

        assert_eq!(view.visible.len(), 1);
        assert!(view.visible.contains("popup-b"));
        assert_eq!(view.fragment.as_deref(), Some("popup-b"));
        assert_eq!(popups.current(), Some("popup-b"));
    }

    #[test]
    fn close_clears_fragment_and_restores_scroll() {
        let mut view = RecordingViewport::with_popups(&["popup-a"]);
        let mut popups = PopupController::new();

        view.scroll = 640.0;
        popups.open(&mut view, "popup-a");
        // Showing the overlay shifts the layout underneath.
        view.scroll = 0.0;
        popups.close_all(&mut view);

        assert!(view.visible.is_empty());
        assert_eq!(view.fragment, None);
        assert_eq!(view.scroll, 640.0);
        assert_eq!(popups.state(), &PopupState::Closed);
    }

    #[test]
    fn unknown_popup_stays_closed() {
        let mut view = RecordingViewport::with_popups(&["popup-a"]);
        let mut popups = PopupController::new();
        popups.open(&mut view, "popup-a");
        popups.open(&mut view, "popup-zzz");

        assert!(view.visible.is_empty());
        assert_eq!(view.fragment, None);
        assert_eq!(popups.current(), None);
    }

    #[test]
    fn fragment_parsing() {
        assert_eq!(popup_id_from_fragment("#popup-tea", "popup-"), Some("popup-tea"));
        assert_eq!(popup_id_from_fragment("popup-tea", "popup-"), Some("popup-tea"));
        assert_eq!(popup_id_from_fragment("#popup-", "popup-"), None);
        assert_eq!(popup_id_from_fragment("#reviews", "popup-"), None);
        assert_eq!(popup_id_from_fragment("", "popup-"), None);
    }
}
