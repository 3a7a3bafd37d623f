//! The event form: a draft, its media lists, and the callbacks the form
//! hands the draft to.

pub mod draft;
pub mod error;
pub mod fields;
pub mod media;
pub mod notify;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Category, Event};

pub use draft::{EventDraft, HexColor};
pub use error::FormError;
pub use fields::{DraftField, FieldSpec, InputKind, FORM_FIELDS};
pub use media::{MediaKind, MediaList, UrlPolicy};
pub use notify::{Notification, NotificationBuffer, NotificationLevel, Notifier, TracingNotifier};

pub type SubmitHandler = Box<dyn FnMut(EventDraft) + Send>;
pub type CancelHandler = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

impl FormMode {
    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Create => "Add event",
            FormMode::Edit => "Save changes",
        }
    }
}

/// Form state for creating or editing one event.
///
/// Every interaction is a synchronous call on `&mut self`. Rejected input
/// never changes the draft; it is reported through the notifier and
/// returned as a [`FormError`].
pub struct EventForm<N> {
    draft: EventDraft,
    mode: FormMode,
    categories: Vec<Category>,
    new_image_url: String,
    new_video_url: String,
    url_policy: UrlPolicy,
    notifier: N,
    on_submit: SubmitHandler,
    on_cancel: Option<CancelHandler>,
}

impl<N: Notifier> EventForm<N> {
    pub fn new<F>(notifier: N, categories: Vec<Category>, on_submit: F) -> Self
    where
        F: FnMut(EventDraft) + Send + 'static,
    {
        Self {
            draft: EventDraft::default(),
            mode: FormMode::Create,
            categories,
            new_image_url: String::new(),
            new_video_url: String::new(),
            url_policy: UrlPolicy::default(),
            notifier,
            on_submit: Box::new(on_submit),
            on_cancel: None,
        }
    }

    /// Starts the form from an existing row.
    pub fn with_initial(mut self, event: &Event) -> Result<Self, FormError> {
        self.reseed(event)?;
        Ok(self)
    }

    pub fn with_cancel<F>(mut self, on_cancel: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    pub fn with_url_policy(mut self, url_policy: UrlPolicy) -> Self {
        self.url_policy = url_policy;
        self
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn new_image_url(&self) -> &str {
        &self.new_image_url
    }

    pub fn new_video_url(&self) -> &str {
        &self.new_video_url
    }

    pub fn url_policy(&self) -> UrlPolicy {
        self.url_policy
    }

    pub fn can_cancel(&self) -> bool {
        self.on_cancel.is_some()
    }

    /// Replaces the whole draft with one built from `event`.
    ///
    /// Nothing of the previous draft survives. A row that cannot be read is
    /// refused and the current draft stays as it was.
    pub fn reseed(&mut self, event: &Event) -> Result<(), FormError> {
        let draft = EventDraft::try_from(event).inspect_err(|err| {
            tracing::warn!(event_id = %event.id, error = %err, "Refusing to seed form from event");
        })?;

        debug!(event_id = %event.id, "Seeded form from event");
        self.draft = draft;
        self.mode = FormMode::Edit;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.set_title(title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.set_description(description);
    }

    pub fn set_event_date(&mut self, date: chrono::NaiveDate) {
        self.draft.set_event_date(date);
    }

    pub fn set_event_time(&mut self, time: chrono::NaiveTime) {
        self.draft.set_event_time(time);
    }

    pub fn set_end_time(&mut self, time: chrono::NaiveTime) {
        self.draft.set_end_time(time);
    }

    pub fn set_location(&mut self, location: &str) {
        self.draft.set_location(location);
    }

    pub fn set_maps_url(&mut self, maps_url: &str) -> Result<(), FormError> {
        let result = self.draft.set_maps_url(maps_url);
        result.map_err(|err| self.reject(err))
    }

    pub fn set_entrance_fee(&mut self, fee: &str) {
        self.draft.set_entrance_fee(fee);
    }

    pub fn set_button_color(&mut self, color: Option<HexColor>) {
        self.draft.set_button_color(color);
    }

    pub fn set_button_secondary_color(&mut self, color: Option<HexColor>) {
        self.draft.set_button_secondary_color(color);
    }

    /// Picks a category from the list the form was given, or clears it.
    pub fn select_category(&mut self, category_id: Option<Uuid>) -> Result<(), FormError> {
        if let Some(id) = category_id {
            if !self.categories.iter().any(|category| category.id == id) {
                return Err(self.reject(FormError::UnknownCategory(id.to_string())));
            }
        }
        self.draft.set_category_id(category_id);
        Ok(())
    }

    /// Replaces one field from its text form.
    pub fn update(&mut self, field: DraftField, raw: &str) -> Result<(), FormError> {
        if field == DraftField::CategoryId {
            let id = match raw {
                "" => None,
                raw => Some(
                    Uuid::parse_str(raw)
                        .map_err(|_| self.reject(FormError::UnknownCategory(raw.to_string())))?,
                ),
            };
            return self.select_category(id);
        }

        let result = self.draft.apply_text(field, raw);
        result.map_err(|err| self.reject(err))
    }

    /// Same as [`EventForm::update`], looking the field up by its key.
    ///
    /// An unknown key is a caller mistake and is not shown to the user.
    pub fn update_by_key(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let field: DraftField = key.parse()?;
        self.update(field, raw)
    }

    pub fn set_new_image_url(&mut self, url: impl Into<String>) {
        self.new_image_url = url.into();
    }

    pub fn set_new_video_url(&mut self, url: impl Into<String>) {
        self.new_video_url = url.into();
    }

    /// Adds the pending image link and clears its input on success.
    pub fn add_image(&mut self) -> Result<(), FormError> {
        self.add_media(MediaKind::Image)
    }

    /// Adds the pending video link and clears its input on success.
    pub fn add_video(&mut self) -> Result<(), FormError> {
        self.add_media(MediaKind::Video)
    }

    /// Removes an image link. Reports success whether or not it was listed.
    pub fn remove_image(&mut self, url: &str) {
        self.remove_media(MediaKind::Image, url);
    }

    /// Removes a video link. Reports success whether or not it was listed.
    pub fn remove_video(&mut self, url: &str) {
        self.remove_media(MediaKind::Video, url);
    }

    fn add_media(&mut self, kind: MediaKind) -> Result<(), FormError> {
        let (list, input) = match kind {
            MediaKind::Image => (&mut self.draft.images, &mut self.new_image_url),
            MediaKind::Video => (&mut self.draft.video_urls, &mut self.new_video_url),
        };

        match list.add(input, kind, self.url_policy) {
            Ok(url) => {
                debug!(%kind, %url, "Added media link");
                input.clear();
                self.notifier.success(kind.added_message());
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn remove_media(&mut self, kind: MediaKind, url: &str) {
        let list = match kind {
            MediaKind::Image => &mut self.draft.images,
            MediaKind::Video => &mut self.draft.video_urls,
        };

        let removed = list.remove(url);
        debug!(%kind, url, removed, "Removed media link");
        self.notifier.success(kind.removed_message());
    }

    /// Hands a copy of the draft to the submit callback.
    ///
    /// Only the checks the inputs themselves enforce are applied: the
    /// required text fields must not be empty.
    pub fn submit(&mut self) -> Result<(), FormError> {
        if let Some(field) = self.draft.missing_required() {
            return Err(self.reject(FormError::MissingRequired(field.label())));
        }

        info!(
            title = %self.draft.title,
            event_date = %self.draft.event_date,
            mode = ?self.mode,
            "Submitting event draft"
        );
        (self.on_submit)(self.draft.clone());
        Ok(())
    }

    /// Calls the cancel callback; returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.on_cancel.as_mut() {
            Some(on_cancel) => {
                on_cancel();
                true
            }
            None => false,
        }
    }

    fn reject(&self, err: FormError) -> FormError {
        self.notifier.error(&err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Harness {
        form: EventForm<Arc<NotificationBuffer>>,
        notes: Arc<NotificationBuffer>,
        submitted: Arc<Mutex<Vec<EventDraft>>>,
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: Uuid::from_u128(1),
                name: "Music".to_string(),
            },
            Category {
                id: Uuid::from_u128(2),
                name: "Theatre".to_string(),
            },
        ]
    }

    fn harness() -> Harness {
        let notes = Arc::new(NotificationBuffer::new());
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&submitted);
        let form = EventForm::new(Arc::clone(&notes), categories(), move |draft| {
            sink.lock().unwrap().push(draft);
        });
        Harness {
            form,
            notes,
            submitted,
        }
    }

    #[test]
    fn test_fresh_form_is_in_create_mode() {
        let h = harness();
        assert_eq!(h.form.mode(), FormMode::Create);
        assert_eq!(h.form.mode().submit_label(), "Add event");
        assert!(!h.form.can_cancel());
    }

    #[test]
    fn test_add_image_rejects_non_dropbox_without_mutation() {
        let mut h = harness();
        h.form.set_new_image_url("https://imgur.com/a.png");

        assert_eq!(h.form.add_image(), Err(FormError::InvalidImageUrl));
        assert!(h.form.draft().images().is_empty());
        assert_eq!(h.form.new_image_url(), "https://imgur.com/a.png");
        assert_eq!(
            h.notes.drain(),
            vec![Notification::error("Please enter a valid Dropbox URL")]
        );
    }

    #[test]
    fn test_add_empty_image() {
        let mut h = harness();

        assert_eq!(h.form.add_image(), Err(FormError::EmptyImageUrl));
        assert_eq!(
            h.notes.drain(),
            vec![Notification::error("Please enter a valid image URL")]
        );
    }

    #[test]
    fn test_add_image_normalises_and_clears_input() {
        let mut h = harness();
        h.form.set_new_image_url("https://www.dropbox.com/s/abc/photo.jpg");

        h.form.add_image().unwrap();

        assert_eq!(
            h.form.draft().images(),
            ["https://dl.dropboxusercontent.com/s/abc/photo.jpg"]
        );
        assert_eq!(h.form.new_image_url(), "");
        assert_eq!(
            h.notes.drain(),
            vec![Notification::success("Image added successfully")]
        );
    }

    #[test]
    fn test_duplicate_image_is_reported() {
        let mut h = harness();
        for _ in 0..2 {
            h.form.set_new_image_url("https://www.dropbox.com/s/abc/photo.jpg");
            let _ = h.form.add_image();
        }

        assert_eq!(h.form.draft().images().len(), 1);
        assert_eq!(
            h.notes.drain(),
            vec![
                Notification::success("Image added successfully"),
                Notification::error("This image was already added"),
            ]
        );
        // The rejected link stays in the input for correction.
        assert_eq!(
            h.form.new_image_url(),
            "https://www.dropbox.com/s/abc/photo.jpg"
        );
    }

    #[test]
    fn test_removing_absent_image_still_reports_success() {
        let mut h = harness();
        h.form.set_new_image_url("https://www.dropbox.com/s/a.jpg");
        h.form.add_image().unwrap();
        h.notes.drain();

        h.form.remove_image("https://dl.dropboxusercontent.com/s/missing.jpg");

        assert_eq!(h.form.draft().images().len(), 1);
        assert_eq!(
            h.notes.drain(),
            vec![Notification::success("Image removed successfully")]
        );
    }

    #[test]
    fn test_remove_image() {
        let mut h = harness();
        h.form.set_new_image_url("https://www.dropbox.com/s/a.jpg");
        h.form.add_image().unwrap();

        h.form.remove_image("https://dl.dropboxusercontent.com/s/a.jpg");

        assert!(h.form.draft().images().is_empty());
    }

    #[test]
    fn test_add_youtube_video_literally() {
        let mut h = harness();
        h.form.set_new_video_url("https://youtu.be/xyz");

        h.form.add_video().unwrap();

        assert_eq!(h.form.draft().video_urls(), ["https://youtu.be/xyz"]);
        assert_eq!(h.form.new_video_url(), "");
        assert_eq!(
            h.notes.drain(),
            vec![Notification::success("Video added successfully")]
        );
    }

    #[test]
    fn test_video_rejections() {
        let mut h = harness();
        assert_eq!(h.form.add_video(), Err(FormError::EmptyVideoUrl));

        h.form.set_new_video_url("https://vimeo.com/1");
        assert_eq!(h.form.add_video(), Err(FormError::InvalidVideoUrl));

        h.form.set_new_video_url("https://youtu.be/xyz");
        h.form.add_video().unwrap();
        h.form.set_new_video_url("https://youtu.be/xyz");
        assert_eq!(h.form.add_video(), Err(FormError::DuplicateVideo));

        let messages: Vec<String> = h
            .notes
            .drain()
            .into_iter()
            .map(|note| note.message)
            .collect();
        assert_eq!(
            messages,
            [
                "Please enter a valid video URL",
                "Please enter a valid Dropbox or YouTube URL",
                "Video added successfully",
                "This video was already added",
            ]
        );
    }

    #[test]
    fn test_remove_video_reports_success() {
        let mut h = harness();
        h.form.remove_video("https://youtu.be/none");
        assert_eq!(
            h.notes.drain(),
            vec![Notification::success("Video removed successfully")]
        );
    }

    #[test]
    fn test_strict_policy_is_applied_to_inputs() {
        let mut h = harness();
        h.form = h.form.with_url_policy(UrlPolicy::Strict);
        h.form.set_new_image_url("https://evil.example/?q=dropbox.com");

        assert_eq!(h.form.add_image(), Err(FormError::InvalidImageUrl));
        assert_eq!(h.form.url_policy(), UrlPolicy::Strict);
    }

    #[test]
    fn test_seed_normalises_the_event_date() {
        let mut h = harness();
        let mut event = Event::sample();
        event.event_date = "2024-05-01T00:00:00Z".to_string();

        h.form.reseed(&event).unwrap();
        h.form.submit().unwrap();

        let submitted = h.submitted.lock().unwrap();
        assert_eq!(
            submitted[0].event_date(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        let json = serde_json::to_value(&submitted[0]).unwrap();
        assert_eq!(json["event_date"], "2024-05-01");
        assert_eq!(h.form.mode(), FormMode::Edit);
    }

    #[test]
    fn test_reseed_replaces_every_field() {
        let mut h = harness();
        h.form.set_title("Old title");
        h.form.set_location("Old place");
        h.form.set_new_image_url("https://www.dropbox.com/s/old.jpg");
        h.form.add_image().unwrap();

        let mut event = Event::sample();
        event.title = "New title".to_string();
        event.location = None;
        event.images = None;
        h.form.reseed(&event).unwrap();

        let expected = EventDraft::try_from(&event).unwrap();
        assert_eq!(h.form.draft(), &expected);
        assert_eq!(h.form.draft().location(), None);
        assert!(h.form.draft().images().is_empty());
    }

    #[test]
    fn test_failed_reseed_keeps_the_draft() {
        let mut h = harness();
        h.form.set_title("Keep me");
        let mut event = Event::sample();
        event.event_date = "someday".to_string();

        assert!(h.form.reseed(&event).is_err());
        assert_eq!(h.form.draft().title(), "Keep me");
        assert_eq!(h.form.mode(), FormMode::Create);
    }

    #[test]
    fn test_update_by_key() {
        let mut h = harness();

        h.form.update_by_key("title", "Forró").unwrap();
        h.form.update_by_key("event_time", "21:00").unwrap();
        h.form
            .update_by_key("category_id", &Uuid::from_u128(2).to_string())
            .unwrap();

        assert_eq!(h.form.draft().title(), "Forró");
        assert_eq!(h.form.draft().category_id(), Some(Uuid::from_u128(2)));
        assert!(h.notes.drain().is_empty());
    }

    #[test]
    fn test_update_rejection_is_notified() {
        let mut h = harness();

        assert_eq!(
            h.form.update(DraftField::EventTime, "9 o'clock"),
            Err(FormError::InvalidTime("9 o'clock".to_string()))
        );
        assert_eq!(h.notes.drain().len(), 1);
    }

    #[test]
    fn test_unknown_key_is_not_notified() {
        let mut h = harness();

        assert_eq!(
            h.form.update_by_key("created_at", "now"),
            Err(FormError::UnknownField("created_at".to_string()))
        );
        assert!(h.notes.drain().is_empty());
    }

    #[test]
    fn test_select_unknown_category() {
        let mut h = harness();

        assert_eq!(
            h.form.select_category(Some(Uuid::from_u128(99))),
            Err(FormError::UnknownCategory(Uuid::from_u128(99).to_string()))
        );
        assert_eq!(h.form.draft().category_id(), None);

        h.form.select_category(Some(Uuid::from_u128(1))).unwrap();
        h.form.select_category(None).unwrap();
        assert_eq!(h.form.draft().category_id(), None);
    }

    #[test]
    fn test_submit_requires_title_and_description() {
        let mut h = harness();

        assert_eq!(h.form.submit(), Err(FormError::MissingRequired("Title")));
        assert!(h.submitted.lock().unwrap().is_empty());
        assert_eq!(
            h.notes.drain(),
            vec![Notification::error("Please fill in the Title field")]
        );
    }

    #[test]
    fn test_submit_hands_over_the_draft_and_keeps_state() {
        let mut h = harness();
        h.form.set_title("Show");
        h.form.set_description("Live");
        h.form.set_new_video_url("https://youtu.be/xyz");
        h.form.add_video().unwrap();
        h.notes.drain();

        h.form.submit().unwrap();
        h.form.submit().unwrap();

        let submitted = h.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 2);
        assert_eq!(&submitted[0], h.form.draft());
        assert_eq!(submitted[0].video_urls(), ["https://youtu.be/xyz"]);
        assert!(h.notes.drain().is_empty());
    }

    #[test]
    fn test_cancel_invokes_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut form = EventForm::new(TracingNotifier, categories(), |_| {})
            .with_cancel(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert!(form.can_cancel());
        assert!(form.cancel());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_without_callback() {
        let mut h = harness();
        assert!(!h.form.cancel());
    }

    #[test]
    fn test_with_initial_starts_in_edit_mode() {
        let form = EventForm::new(TracingNotifier, categories(), |_| {})
            .with_initial(&Event::sample())
            .unwrap();

        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.mode().submit_label(), "Save changes");
        assert_eq!(form.draft().title(), Event::sample().title);
    }
}
