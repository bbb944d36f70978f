use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// One catalog record as served by the catalog service.
///
/// Display fields tolerate empty strings and `null` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cafe {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub map_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub img_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default)]
    pub has_sockets: bool,
    #[serde(default)]
    pub has_toilet: bool,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub can_take_calls: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub seats: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub coffee_price: String,
}

impl Cafe {
    pub fn has(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::Wifi => self.has_wifi,
            Amenity::Sockets => self.has_sockets,
            Amenity::Toilet => self.has_toilet,
            Amenity::Calls => self.can_take_calls,
        }
    }

    pub fn image(&self) -> Option<&str> {
        Some(self.img_url.as_str()).filter(|u| !u.trim().is_empty())
    }

    pub fn amenities(&self) -> Vec<Amenity> {
        Amenity::ALL.into_iter().filter(|a| self.has(*a)).collect()
    }
}

/// Body of `POST /add`: a cafe without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub can_take_calls: bool,
    pub seats: String,
    pub coffee_price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Amenity {
    #[serde(rename = "has_wifi")]
    Wifi,
    #[serde(rename = "has_sockets")]
    Sockets,
    #[serde(rename = "has_toilet")]
    Toilet,
    #[serde(rename = "can_take_calls")]
    Calls,
}

impl Amenity {
    pub const ALL: [Amenity; 4] = [
        Amenity::Wifi,
        Amenity::Sockets,
        Amenity::Toilet,
        Amenity::Calls,
    ];

    pub fn field(self) -> &'static str {
        match self {
            Amenity::Wifi => "has_wifi",
            Amenity::Sockets => "has_sockets",
            Amenity::Toilet => "has_toilet",
            Amenity::Calls => "can_take_calls",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Amenity::Wifi => "wifi",
            Amenity::Sockets => "sockets",
            Amenity::Toilet => "toilet",
            Amenity::Calls => "calls",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Amenity::ALL
            .into_iter()
            .find(|a| a.label() == raw || a.field() == raw)
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User constraints narrowing the cafe collection.
///
/// An amenity is either required or unconstrained; there is no
/// "must not have" state. An empty location is the same as no location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub location: Option<String>,
    pub required: BTreeSet<Amenity>,
}

impl FilterCriteria {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn require(mut self, amenity: Amenity) -> Self {
        self.required.insert(amenity);
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }

    /// Flip an amenity between required and unconstrained. Returns the new state.
    pub fn toggle(&mut self, amenity: Amenity) -> bool {
        if self.required.remove(&amenity) {
            false
        } else {
            self.required.insert(amenity);
            true
        }
    }

    pub fn has_amenity_filters(&self) -> bool {
        !self.required.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.location().is_none() && self.required.is_empty()
    }

    /// Identity of the criteria, used to match responses to the request that asked for them.
    pub fn key(&self) -> String {
        let need: Vec<&str> = self.required.iter().map(|a| a.field()).collect();
        format!("loc={}|need={}", self.location().unwrap_or(""), need.join(","))
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        let mut parts = Vec::new();
        if let Some(loc) = self.location() {
            parts.push(format!("location~\"{}\"", loc));
        }
        parts.extend(self.required.iter().map(|a| a.label().to_string()));
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize)]
pub struct LocateReport {
    pub map_url: String,
    pub matched: &'static str,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize)]
pub struct ListReport {
    pub criteria: FilterCriteria,
    pub state: &'static str,
    pub message: Option<String>,
    pub count: usize,
    pub cafes: Vec<Cafe>,
}

#[derive(Serialize)]
pub struct Popup {
    pub name: String,
    pub location: String,
    pub coffee_price: String,
    pub img_url: Option<String>,
}

#[derive(Serialize)]
pub struct Marker {
    pub id: i64,
    pub position: Coordinates,
    pub popup: Popup,
}

#[derive(Serialize)]
pub struct MapReport {
    pub state: &'static str,
    pub message: Option<String>,
    pub center: Coordinates,
    pub zoom: u8,
    pub selected: Option<i64>,
    pub markers: Vec<Marker>,
}

#[derive(Serialize)]
pub struct ScreenReport {
    pub selected: Option<Cafe>,
    pub list: ListReport,
    pub map: MapReport,
}

#[derive(Serialize)]
pub struct AddReport {
    pub success: String,
    pub cafe: Option<Cafe>,
}

#[derive(Serialize)]
pub struct CacheReport {
    pub action: String,
    pub removed: usize,
}
