use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event row as the backend returns it.
///
/// Date and times are kept as the text the backend sent, since their
/// precision varies; the form parses them when it is seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub event_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub maps_url: Option<String>,
    #[serde(default)]
    pub entrance_fee: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub video_urls: Option<Vec<String>>,
    #[serde(default)]
    pub button_color: Option<String>,
    #[serde(default)]
    pub button_secondary_color: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

#[cfg(test)]
impl Event {
    pub fn sample() -> Self {
        Self {
            id: Uuid::from_u128(0xe7e27),
            created_at: DateTime::parse_from_rfc3339("2024-04-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            title: "Roda de samba".to_string(),
            description: "Open-air samba with guest musicians".to_string(),
            event_date: "2024-05-01".to_string(),
            event_time: "18:00:00".to_string(),
            end_time: "23:30:00".to_string(),
            location: Some("Praça XV".to_string()),
            maps_url: Some("https://maps.google.com/?q=praca+xv".to_string()),
            entrance_fee: Some("Free".to_string()),
            images: Some(vec![
                "https://dl.dropboxusercontent.com/s/abc/photo.jpg".to_string()
            ]),
            video_urls: Some(vec!["https://youtu.be/xyz".to_string()]),
            button_color: Some("#9b87f5".to_string()),
            button_secondary_color: Some("#7E69AB".to_string()),
            category_id: Some(Uuid::from_u128(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_columns_may_be_missing() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "created_at": "2024-04-01T10:00:00Z",
            "title": "Show",
            "description": "Live",
            "event_date": "2024-05-01T00:00:00+00:00",
            "event_time": "20:00",
            "end_time": "22:00",
            "images": null
        }))
        .unwrap();

        assert_eq!(event.images, None);
        assert_eq!(event.category_id, None);
        assert_eq!(event.event_date, "2024-05-01T00:00:00+00:00");
    }
}
