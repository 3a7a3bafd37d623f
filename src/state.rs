use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::form::{EventDraft, EventForm, Notification, NotificationBuffer, UrlPolicy};
use crate::models::Category;
use crate::utils::error::AppError;

pub type FormSession = EventForm<Arc<NotificationBuffer>>;

/// Shared state of the HTTP host: one form session and what is needed to
/// start a fresh one.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    form: Mutex<FormSession>,
    notifications: Arc<NotificationBuffer>,
    categories: Vec<Category>,
    url_policy: UrlPolicy,
    submissions: UnboundedSender<EventDraft>,
}

impl AppState {
    /// Accepted drafts are forwarded to `submissions`.
    pub fn new(
        categories: Vec<Category>,
        url_policy: UrlPolicy,
        submissions: UnboundedSender<EventDraft>,
    ) -> Self {
        let notifications = Arc::new(NotificationBuffer::new());
        let form = build_form(&notifications, &categories, url_policy, &submissions);

        Self {
            inner: Arc::new(Inner {
                form: Mutex::new(form),
                notifications,
                categories,
                url_policy,
                submissions,
            }),
        }
    }

    /// Runs `op` against the session and collects what it notified.
    ///
    /// The lock is held until the notifications are drained, so concurrent
    /// requests never see each other's messages.
    pub fn with_form<T, F>(&self, op: F) -> Result<(T, Vec<Notification>), AppError>
    where
        F: FnOnce(&mut FormSession) -> T,
    {
        let mut form = self
            .inner
            .form
            .lock()
            .map_err(|_| AppError::InternalServerError("Form session lock poisoned".to_string()))?;

        let output = op(&mut *form);
        let notifications = self.inner.notifications.drain();
        Ok((output, notifications))
    }

    /// A new, empty form wired to the same notifier and submission channel.
    pub fn fresh_form(&self) -> FormSession {
        build_form(
            &self.inner.notifications,
            &self.inner.categories,
            self.inner.url_policy,
            &self.inner.submissions,
        )
    }
}

fn build_form(
    notifications: &Arc<NotificationBuffer>,
    categories: &[Category],
    url_policy: UrlPolicy,
    submissions: &UnboundedSender<EventDraft>,
) -> FormSession {
    let submissions = submissions.clone();

    EventForm::new(Arc::clone(notifications), categories.to_vec(), move |draft| {
        if submissions.send(draft).is_err() {
            warn!("Submission receiver dropped, event draft discarded");
        }
    })
    .with_url_policy(url_policy)
    .with_cancel(|| info!("Event form cancelled"))
}
