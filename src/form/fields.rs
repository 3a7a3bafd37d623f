use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::form::FormError;

/// The kind of input a field is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    Select,
    Date,
    Time,
    Url,
    Color,
    UrlList,
}

/// One labelled input of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
    pub placeholder: Option<&'static str>,
}

const fn field(id: &'static str, label: &'static str, kind: InputKind) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind,
        required: false,
        placeholder: None,
    }
}

const fn required(spec: FieldSpec) -> FieldSpec {
    FieldSpec {
        required: true,
        ..spec
    }
}

const fn placeholder(spec: FieldSpec, text: &'static str) -> FieldSpec {
    FieldSpec {
        placeholder: Some(text),
        ..spec
    }
}

pub const FORM_FIELDS: &[FieldSpec] = &[
    required(field("title", "Title", InputKind::Text)),
    placeholder(
        field("category_id", "Category", InputKind::Select),
        "Select a category",
    ),
    required(field("description", "Description", InputKind::TextArea)),
    required(field("event_date", "Date", InputKind::Date)),
    required(field("event_time", "Time", InputKind::Time)),
    required(field("end_time", "End time", InputKind::Time)),
    placeholder(
        field("images", "Dropbox images", InputKind::UrlList),
        "Paste the Dropbox share URL",
    ),
    placeholder(
        field("video_urls", "Videos (Dropbox or YouTube)", InputKind::UrlList),
        "Paste the Dropbox or YouTube URL",
    ),
    field("location", "Location", InputKind::Text),
    placeholder(
        field("maps_url", "Google Maps link", InputKind::Url),
        "https://maps.google.com/...",
    ),
    field("entrance_fee", "Entrance fee", InputKind::Text),
    field("button_color", "Button color", InputKind::Color),
    field(
        "button_secondary_color",
        "Secondary button color",
        InputKind::Color,
    ),
];

/// A draft field that can be replaced from text by its key.
///
/// The media lists are absent on purpose: they only change through their
/// add and remove operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    EventDate,
    EventTime,
    EndTime,
    Location,
    MapsUrl,
    EntranceFee,
    ButtonColor,
    ButtonSecondaryColor,
    CategoryId,
}

impl DraftField {
    pub const ALL: [DraftField; 11] = [
        DraftField::Title,
        DraftField::Description,
        DraftField::EventDate,
        DraftField::EventTime,
        DraftField::EndTime,
        DraftField::Location,
        DraftField::MapsUrl,
        DraftField::EntranceFee,
        DraftField::ButtonColor,
        DraftField::ButtonSecondaryColor,
        DraftField::CategoryId,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::EventDate => "event_date",
            DraftField::EventTime => "event_time",
            DraftField::EndTime => "end_time",
            DraftField::Location => "location",
            DraftField::MapsUrl => "maps_url",
            DraftField::EntranceFee => "entrance_fee",
            DraftField::ButtonColor => "button_color",
            DraftField::ButtonSecondaryColor => "button_secondary_color",
            DraftField::CategoryId => "category_id",
        }
    }

    pub fn spec(self) -> Option<&'static FieldSpec> {
        FORM_FIELDS.iter().find(|spec| spec.id == self.key())
    }

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Title => "Title",
            DraftField::Description => "Description",
            DraftField::EventDate => "Date",
            DraftField::EventTime => "Time",
            DraftField::EndTime => "End time",
            DraftField::Location => "Location",
            DraftField::MapsUrl => "Google Maps link",
            DraftField::EntranceFee => "Entrance fee",
            DraftField::ButtonColor => "Button color",
            DraftField::ButtonSecondaryColor => "Secondary button color",
            DraftField::CategoryId => "Category",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DraftField {
    type Err = FormError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))
    }
}
