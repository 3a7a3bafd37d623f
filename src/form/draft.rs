use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

use crate::form::fields::DraftField;
use crate::form::media::MediaList;
use crate::form::FormError;
use crate::models::Event;

pub const DEFAULT_BUTTON_COLOR: &str = "#000000";

/// Shown by the colour inputs while the draft holds no colour.
pub const FALLBACK_BUTTON_COLOR: &str = "#9b87f5";
pub const FALLBACK_SECONDARY_BUTTON_COLOR: &str = "#7E69AB";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// A `#rrggbb` colour as produced by a colour picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let valid = raw
            .strip_prefix('#')
            .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(FormError::InvalidColor(raw.to_string()))
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = FormError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads the date part of a stored `event_date`.
///
/// The backend may hand back a plain date or a full timestamp; timestamps
/// carrying an offset are moved to UTC before the date is taken.
pub fn parse_event_date(raw: &str) -> Result<NaiveDate, FormError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Utc).date_naive());
    }
    if let Ok(stamp) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(stamp.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(stamp.date());
        }
    }

    Err(FormError::InvalidDate(raw.to_string()))
}

/// Accepts `HH:MM` from a time input and `HH:MM:SS` from the database.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, FormError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| FormError::InvalidTime(raw.to_string()))
}

fn optional_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn optional_color(raw: Option<&str>) -> Result<Option<HexColor>, FormError> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::Serializer;

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }
}

/// The editable shape of an event: the stored row minus its identity and
/// creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) event_date: NaiveDate,
    #[serde(serialize_with = "hour_minute::serialize")]
    pub(crate) event_time: NaiveTime,
    #[serde(serialize_with = "hour_minute::serialize")]
    pub(crate) end_time: NaiveTime,
    pub(crate) location: Option<String>,
    pub(crate) maps_url: Option<String>,
    pub(crate) entrance_fee: Option<String>,
    pub(crate) images: MediaList,
    pub(crate) video_urls: MediaList,
    pub(crate) button_color: Option<HexColor>,
    pub(crate) button_secondary_color: Option<HexColor>,
    pub(crate) category_id: Option<Uuid>,
}

impl EventDraft {
    /// An empty draft scheduled on `event_date` at midnight.
    pub fn new(event_date: NaiveDate) -> Self {
        let default_color = HexColor(DEFAULT_BUTTON_COLOR.to_string());
        Self {
            title: String::new(),
            description: String::new(),
            event_date,
            event_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            location: None,
            maps_url: None,
            entrance_fee: None,
            images: MediaList::new(),
            video_urls: MediaList::new(),
            button_color: Some(default_color.clone()),
            button_secondary_color: Some(default_color),
            category_id: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    pub fn event_time(&self) -> NaiveTime {
        self.event_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn maps_url(&self) -> Option<&str> {
        self.maps_url.as_deref()
    }

    pub fn entrance_fee(&self) -> Option<&str> {
        self.entrance_fee.as_deref()
    }

    pub fn images(&self) -> &[String] {
        self.images.as_slice()
    }

    pub fn video_urls(&self) -> &[String] {
        self.video_urls.as_slice()
    }

    pub fn button_color(&self) -> Option<&HexColor> {
        self.button_color.as_ref()
    }

    pub fn button_secondary_color(&self) -> Option<&HexColor> {
        self.button_secondary_color.as_ref()
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    /// The colour the primary colour input displays.
    pub fn displayed_button_color(&self) -> &str {
        self.button_color
            .as_ref()
            .map_or(FALLBACK_BUTTON_COLOR, HexColor::as_str)
    }

    /// The colour the secondary colour input displays.
    pub fn displayed_button_secondary_color(&self) -> &str {
        self.button_secondary_color
            .as_ref()
            .map_or(FALLBACK_SECONDARY_BUTTON_COLOR, HexColor::as_str)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_event_date(&mut self, date: NaiveDate) {
        self.event_date = date;
    }

    pub fn set_event_time(&mut self, time: NaiveTime) {
        self.event_time = time;
    }

    pub fn set_end_time(&mut self, time: NaiveTime) {
        self.end_time = time;
    }

    /// An empty string clears the location.
    pub fn set_location(&mut self, location: &str) {
        self.location = optional_text(location);
    }

    /// An empty string clears the link; anything else must be an absolute URL.
    pub fn set_maps_url(&mut self, maps_url: &str) -> Result<(), FormError> {
        if !maps_url.is_empty() {
            Url::parse(maps_url).map_err(|_| FormError::InvalidUrl(maps_url.to_string()))?;
        }
        self.maps_url = optional_text(maps_url);
        Ok(())
    }

    pub fn set_entrance_fee(&mut self, fee: &str) {
        self.entrance_fee = optional_text(fee);
    }

    pub fn set_button_color(&mut self, color: Option<HexColor>) {
        self.button_color = color;
    }

    pub fn set_button_secondary_color(&mut self, color: Option<HexColor>) {
        self.button_secondary_color = color;
    }

    pub(crate) fn set_category_id(&mut self, category_id: Option<Uuid>) {
        self.category_id = category_id;
    }

    /// Parses `raw` for `field` and replaces that field.
    ///
    /// The category is not handled here since choosing one depends on the
    /// list the form was given.
    pub(crate) fn apply_text(&mut self, field: DraftField, raw: &str) -> Result<(), FormError> {
        match field {
            DraftField::Title => self.set_title(raw),
            DraftField::Description => self.set_description(raw),
            DraftField::EventDate => {
                let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                    .map_err(|_| FormError::InvalidDate(raw.to_string()))?;
                self.set_event_date(date);
            }
            DraftField::EventTime => self.set_event_time(parse_time_of_day(raw)?),
            DraftField::EndTime => self.set_end_time(parse_time_of_day(raw)?),
            DraftField::Location => self.set_location(raw),
            DraftField::MapsUrl => self.set_maps_url(raw)?,
            DraftField::EntranceFee => self.set_entrance_fee(raw),
            DraftField::ButtonColor => self.set_button_color(optional_color(Some(raw))?),
            DraftField::ButtonSecondaryColor => {
                self.set_button_secondary_color(optional_color(Some(raw))?)
            }
            DraftField::CategoryId => {
                let id = if raw.is_empty() {
                    None
                } else {
                    Some(
                        Uuid::parse_str(raw)
                            .map_err(|_| FormError::UnknownCategory(raw.to_string()))?,
                    )
                };
                self.set_category_id(id);
            }
        }
        Ok(())
    }

    /// The first required field left empty, if any.
    ///
    /// Date and times always hold a value, so only the text fields can be
    /// missing.
    pub fn missing_required(&self) -> Option<DraftField> {
        if self.title.is_empty() {
            Some(DraftField::Title)
        } else if self.description.is_empty() {
            Some(DraftField::Description)
        } else {
            None
        }
    }
}

impl Default for EventDraft {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl TryFrom<&Event> for EventDraft {
    type Error = FormError;

    fn try_from(event: &Event) -> Result<Self, Self::Error> {
        Ok(Self {
            title: event.title.clone(),
            description: event.description.clone(),
            event_date: parse_event_date(&event.event_date)?,
            event_time: parse_time_of_day(&event.event_time)?,
            end_time: parse_time_of_day(&event.end_time)?,
            location: event.location.clone(),
            maps_url: event.maps_url.clone(),
            entrance_fee: event.entrance_fee.clone(),
            images: MediaList::from_stored(event.images.clone().unwrap_or_default()),
            video_urls: MediaList::from_stored(event.video_urls.clone().unwrap_or_default()),
            button_color: optional_color(event.button_color.as_deref())?,
            button_secondary_color: optional_color(event.button_secondary_color.as_deref())?,
            category_id: event.category_id,
        })
    }
}
