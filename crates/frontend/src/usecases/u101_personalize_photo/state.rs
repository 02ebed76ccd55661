//! View state of the personalization page.
//!
//! All mutation goes through the named transition methods below; the view
//! itself only reads fields. This keeps the selection → preview → request →
//! result lifecycle testable without a browser.
//!
//! Asynchronous completions (the preview decode and the personalize request)
//! carry the generation token they were started with. The token is bumped on
//! every accepted selection, so a slow completion that belongs to a superseded
//! selection is discarded instead of overwriting newer state.

use serde::{Deserialize, Serialize};

/// Error shown when the chosen file is missing or not an image
pub const INVALID_IMAGE_MESSAGE: &str = "Please select a valid image file";

/// Metadata of the user-chosen source image awaiting processing.
///
/// The `web_sys::File` handle itself is kept by the view outside of this
/// struct; the state only tracks what is needed for rendering and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAsset {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// Binary image returned by the remote service, plus the ephemeral object URL
/// created from it for display. The URL must be revoked once superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultAsset {
    pub bytes: Vec<u8>,
    pub object_url: String,
}

/// Single-flight status of the remote personalization call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

/// Outcome of an accepted selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Generation token the caller must attach to the preview decode
    pub token: u64,
    /// Object URL of the superseded result, to be revoked by the caller
    pub stale_url: Option<String>,
}

/// Outcome of a granted request start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flight {
    /// Generation token the caller must attach to the request completion
    pub token: u64,
    /// Object URL of the superseded result, to be revoked by the caller
    pub stale_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersonalizeState {
    pub selected: Option<SelectedAsset>,
    /// Locally decoded `data:` URI of the selected image
    pub preview: Option<String>,
    pub result: Option<ResultAsset>,
    pub request: RequestState,
    /// True while a drag hovers over the drop zone
    pub drag_active: bool,
    /// Acquisition error, tracked separately from request failures
    pub input_error: Option<String>,
    generation: u64,
}

impl PersonalizeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts or rejects a candidate file.
    ///
    /// A non-image MIME type records [`INVALID_IMAGE_MESSAGE`] and leaves all
    /// previous state untouched. An image replaces the selection wholesale:
    /// the preview and any prior result are cleared and the generation token
    /// is bumped so stale async completions get discarded.
    pub fn select(&mut self, name: &str, mime: &str, size: u64) -> Option<Accepted> {
        if !mime.starts_with("image/") {
            self.input_error = Some(INVALID_IMAGE_MESSAGE.to_string());
            return None;
        }

        self.generation += 1;
        self.selected = Some(SelectedAsset {
            name: name.to_string(),
            mime: mime.to_string(),
            size,
        });
        self.preview = None;
        self.input_error = None;
        // An in-flight request keeps the flag until its completion is
        // discarded; anything else is wiped together with the old selection.
        if !self.in_flight() {
            self.request = RequestState::Idle;
        }
        let stale_url = self.take_result_url();

        Some(Accepted {
            token: self.generation,
            stale_url,
        })
    }

    /// Stores the decoded preview, unless a newer selection arrived meanwhile.
    pub fn preview_ready(&mut self, token: u64, data_uri: String) {
        if token == self.generation {
            self.preview = Some(data_uri);
        }
    }

    /// Records a decode failure for the current selection; stale ones are dropped.
    pub fn preview_failed(&mut self, token: u64, message: String) {
        if token == self.generation {
            self.input_error = Some(message);
        }
    }

    /// Starts the personalize request, enforcing single-flight.
    ///
    /// Returns `None` (and changes nothing) when no file is selected or a
    /// request is already in flight.
    pub fn begin_request(&mut self) -> Option<Flight> {
        if self.selected.is_none() || self.in_flight() {
            return None;
        }

        self.request = RequestState::InFlight;
        self.input_error = None;
        let stale_url = self.take_result_url();

        Some(Flight {
            token: self.generation,
            stale_url,
        })
    }

    /// Completes the flight with a personalized result.
    ///
    /// A completion for a superseded selection only ends the flight; its
    /// payload is discarded and the freshly created object URL is returned to
    /// the caller for revocation.
    pub fn request_succeeded(&mut self, token: u64, result: ResultAsset) -> Option<String> {
        if token != self.generation {
            self.end_stale_flight();
            return Some(result.object_url);
        }

        self.request = RequestState::Succeeded;
        let stale_url = self.take_result_url();
        self.result = Some(result);
        stale_url
    }

    /// Completes the flight with an error message.
    ///
    /// A failure belonging to a superseded selection is dropped silently; the
    /// message would describe an asset the user no longer cares about.
    pub fn request_failed(&mut self, token: u64, message: String) {
        if token != self.generation {
            self.end_stale_flight();
            return;
        }

        self.request = RequestState::Failed(message);
    }

    pub fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }

    pub fn in_flight(&self) -> bool {
        self.request == RequestState::InFlight
    }

    /// True when the personalize action may be triggered
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.in_flight()
    }

    /// The message currently owed to the user, if any
    pub fn visible_error(&self) -> Option<String> {
        if let Some(message) = &self.input_error {
            return Some(message.clone());
        }
        match &self.request {
            RequestState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Detaches the current result, handing its object URL to the caller.
    fn take_result_url(&mut self) -> Option<String> {
        self.result.take().map(|r| r.object_url)
    }

    fn end_stale_flight(&mut self) {
        // The request must not linger in InFlight once its outcome arrived,
        // even though that outcome no longer applies.
        if self.in_flight() {
            self.request = RequestState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_photo(state: &mut PersonalizeState) -> Accepted {
        state
            .select("photo.jpg", "image/jpeg", 1024)
            .expect("image selection accepted")
    }

    #[test]
    fn rejects_non_image_file() {
        let mut state = PersonalizeState::new();
        assert!(state.select("notes.txt", "text/plain", 10).is_none());
        assert_eq!(state.visible_error().as_deref(), Some(INVALID_IMAGE_MESSAGE));
        assert!(state.selected.is_none());
    }

    #[test]
    fn rejection_leaves_previous_selection_untouched() {
        let mut state = PersonalizeState::new();
        let accepted = select_photo(&mut state);
        state.preview_ready(accepted.token, "data:image/jpeg;base64,AA==".to_string());

        assert!(state.select("movie.mp4", "video/mp4", 999).is_none());

        let selected = state.selected.as_ref().expect("selection kept");
        assert_eq!(selected.name, "photo.jpg");
        assert!(state.preview.is_some());
        assert_eq!(state.visible_error().as_deref(), Some(INVALID_IMAGE_MESSAGE));
    }

    #[test]
    fn selection_replaces_asset_and_clears_result() {
        let mut state = PersonalizeState::new();
        let first = select_photo(&mut state);
        let flight = state.begin_request().expect("request granted");
        state.request_succeeded(
            flight.token,
            ResultAsset {
                bytes: vec![1, 2, 3],
                object_url: "blob:old".to_string(),
            },
        );

        let second = state
            .select("other.png", "image/png", 2048)
            .expect("image selection accepted");

        assert!(second.token > first.token);
        assert_eq!(second.stale_url.as_deref(), Some("blob:old"));
        assert!(state.result.is_none());
        assert!(state.preview.is_none());
        assert_eq!(state.selected.as_ref().unwrap().name, "other.png");
        assert_eq!(state.request, RequestState::Idle);
    }

    #[test]
    fn valid_selection_clears_previous_errors() {
        let mut state = PersonalizeState::new();
        state.select("x", "application/pdf", 1);
        assert!(state.visible_error().is_some());

        select_photo(&mut state);
        assert!(state.visible_error().is_none());
    }

    #[test]
    fn stale_preview_is_discarded() {
        let mut state = PersonalizeState::new();
        let first = select_photo(&mut state);
        let second = state
            .select("newer.png", "image/png", 10)
            .expect("image selection accepted");

        state.preview_ready(first.token, "data:stale".to_string());
        assert!(state.preview.is_none());

        state.preview_ready(second.token, "data:current".to_string());
        assert_eq!(state.preview.as_deref(), Some("data:current"));
    }

    #[test]
    fn stale_preview_failure_is_discarded() {
        let mut state = PersonalizeState::new();
        let first = select_photo(&mut state);
        state.select("newer.png", "image/png", 10);

        state.preview_failed(first.token, "read error".to_string());
        assert!(state.visible_error().is_none());
    }

    #[test]
    fn request_requires_a_selection() {
        let mut state = PersonalizeState::new();
        assert!(state.begin_request().is_none());
        assert_eq!(state.request, RequestState::Idle);
    }

    #[test]
    fn request_is_single_flight() {
        let mut state = PersonalizeState::new();
        select_photo(&mut state);

        assert!(state.begin_request().is_some());
        // Second trigger while in flight has no effect
        assert!(state.begin_request().is_none());
        assert!(state.in_flight());
        assert!(!state.can_submit());
    }

    #[test]
    fn begin_request_clears_prior_result_and_error() {
        let mut state = PersonalizeState::new();
        let _ = select_photo(&mut state);
        let flight = state.begin_request().expect("request granted");
        state.request_failed(flight.token, "boom".to_string());
        assert!(state.visible_error().is_some());

        let retry = state.begin_request().expect("retry granted");
        assert!(retry.stale_url.is_none());
        assert!(state.visible_error().is_none());
        assert!(state.result.is_none());
    }

    #[test]
    fn success_stores_payload_bytes() {
        let mut state = PersonalizeState::new();
        select_photo(&mut state);
        let flight = state.begin_request().expect("request granted");

        let payload = vec![0x89, 0x50, 0x4E, 0x47];
        let revoke = state.request_succeeded(
            flight.token,
            ResultAsset {
                bytes: payload.clone(),
                object_url: "blob:result".to_string(),
            },
        );

        assert!(revoke.is_none());
        assert_eq!(state.request, RequestState::Succeeded);
        let result = state.result.as_ref().expect("result stored");
        assert_eq!(result.bytes, payload);
        assert_eq!(result.object_url, "blob:result");
    }

    #[test]
    fn stale_success_is_discarded_and_flight_ends() {
        let mut state = PersonalizeState::new();
        select_photo(&mut state);
        let flight = state.begin_request().expect("request granted");

        // A new selection supersedes the in-flight request without aborting it
        state.select("newer.png", "image/png", 10);
        assert!(state.in_flight());

        let revoke = state.request_succeeded(
            flight.token,
            ResultAsset {
                bytes: vec![1],
                object_url: "blob:stale".to_string(),
            },
        );

        assert_eq!(revoke.as_deref(), Some("blob:stale"));
        assert!(state.result.is_none());
        assert_eq!(state.request, RequestState::Idle);
        assert!(state.can_submit());
    }

    #[test]
    fn failure_surfaces_exact_message() {
        let mut state = PersonalizeState::new();
        select_photo(&mut state);
        let flight = state.begin_request().expect("request granted");

        state.request_failed(flight.token, "X".to_string());

        assert_eq!(state.request, RequestState::Failed("X".to_string()));
        assert_eq!(state.visible_error().as_deref(), Some("X"));
        assert!(state.can_submit());
    }

    #[test]
    fn stale_failure_is_dropped() {
        let mut state = PersonalizeState::new();
        select_photo(&mut state);
        let flight = state.begin_request().expect("request granted");
        state.select("newer.png", "image/png", 10);

        state.request_failed(flight.token, "stale error".to_string());

        assert!(state.visible_error().is_none());
        assert_eq!(state.request, RequestState::Idle);
    }

    #[test]
    fn drag_flag_toggles_independently_of_validation() {
        let mut state = PersonalizeState::new();
        state.set_drag_active(true);
        assert!(state.drag_active);

        state.select("x", "text/plain", 1);
        assert!(state.drag_active);

        state.set_drag_active(false);
        assert!(!state.drag_active);
    }

    #[test]
    fn state_round_trips_through_serde() {
        let mut state = PersonalizeState::new();
        select_photo(&mut state);
        let json = serde_json::to_string(&state).expect("serializable");
        let back: PersonalizeState = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, state);
    }
}
