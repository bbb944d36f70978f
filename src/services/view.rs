use crate::domain::constants::{FALLBACK_COORDINATES, OVERVIEW_ZOOM, SELECTED_ZOOM};
use crate::domain::models::{
    Cafe, FilterCriteria, ListReport, MapReport, Marker, Popup, ScreenReport,
};
use crate::services::geo::extract_coordinates;
use crate::services::orchestrator::QueryOutcome;

pub const GENERIC_ERROR: &str = "Error loading cafes";

/// What a view shows. Checked in declaration order: loading, error, empty, populated.
#[derive(Debug, PartialEq)]
pub enum ViewState<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Populated(&'a [Cafe]),
}

impl<'a> ViewState<'a> {
    pub fn of(outcome: &'a QueryOutcome) -> Self {
        if outcome.loading {
            ViewState::Loading
        } else if let Some(e) = &outcome.error {
            ViewState::Error(e)
        } else if outcome.cafes.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Populated(&outcome.cafes)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Empty => "empty",
            ViewState::Populated(_) => "populated",
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            ViewState::Loading => Some("Loading cafes...".to_string()),
            ViewState::Error(e) if e.trim().is_empty() => Some(GENERIC_ERROR.to_string()),
            ViewState::Error(e) => Some(format!("{}: {}", GENERIC_ERROR, e)),
            ViewState::Empty => Some("No cafes found".to_string()),
            ViewState::Populated(_) => None,
        }
    }

    pub fn cafes(&self) -> &'a [Cafe] {
        match self {
            ViewState::Populated(cafes) => *cafes,
            _ => &[],
        }
    }
}

pub fn list_report(criteria: &FilterCriteria, outcome: &QueryOutcome) -> ListReport {
    let state = ViewState::of(outcome);
    let cafes = state.cafes().to_vec();
    ListReport {
        criteria: criteria.clone(),
        state: state.name(),
        message: state.message(),
        count: cafes.len(),
        cafes,
    }
}

fn marker(cafe: &Cafe) -> Marker {
    Marker {
        id: cafe.id,
        position: extract_coordinates(&cafe.map_url),
        popup: Popup {
            name: cafe.name.clone(),
            location: cafe.location.clone(),
            coffee_price: cafe.coffee_price.clone(),
            img_url: cafe.image().map(str::to_string),
        },
    }
}

/// Markers plus viewport: the selected cafe zoomed in, else the first cafe, else the fallback.
pub fn map_report(outcome: &QueryOutcome, selected: Option<&Cafe>) -> MapReport {
    let state = ViewState::of(outcome);
    let cafes = state.cafes();
    let (center, zoom) = match (selected, cafes.first()) {
        (Some(sel), _) => (extract_coordinates(&sel.map_url), SELECTED_ZOOM),
        (None, Some(first)) if !first.map_url.is_empty() => {
            (extract_coordinates(&first.map_url), OVERVIEW_ZOOM)
        }
        _ => (FALLBACK_COORDINATES, OVERVIEW_ZOOM),
    };
    let message = match state {
        ViewState::Empty => Some("No cafes to display on map".to_string()),
        ref other => other.message(),
    };
    MapReport {
        state: state.name(),
        message,
        center,
        zoom,
        selected: selected.map(|c| c.id),
        markers: cafes.iter().map(marker).collect(),
    }
}

/// List and map built from the one outcome.
pub fn screen(
    criteria: &FilterCriteria,
    outcome: &QueryOutcome,
    selected: Option<&Cafe>,
) -> ScreenReport {
    ScreenReport {
        selected: selected.cloned(),
        list: list_report(criteria, outcome),
        map: map_report(outcome, selected),
    }
}

pub fn render_header(criteria: &FilterCriteria) -> Vec<String> {
    vec![
        "== Cafe Finder ==".to_string(),
        format!("filters: {}", criteria.summary()),
    ]
}

pub fn render_list(report: &ListReport, selected: Option<i64>) -> Vec<String> {
    if let Some(msg) = &report.message {
        return vec![msg.clone()];
    }
    report
        .cafes
        .iter()
        .map(|c| {
            let amenities: Vec<&str> = c.amenities().iter().map(|a| a.label()).collect();
            let mark = if selected == Some(c.id) { ">" } else { " " };
            format!(
                "{} {}\t{}\t{}\t[{}]\tseats {}\t{}",
                mark,
                c.id,
                c.name,
                c.location,
                amenities.join(","),
                c.seats,
                c.coffee_price
            )
        })
        .collect()
}

pub fn render_detail(cafe: &Cafe) -> Vec<String> {
    let amenities: Vec<&str> = cafe.amenities().iter().map(|a| a.label()).collect();
    let position = extract_coordinates(&cafe.map_url);
    let mut out = vec![
        format!("id: {}", cafe.id),
        format!("name: {}", cafe.name),
        format!("location: {}", cafe.location),
        format!("amenities: {}", amenities.join(", ")),
        format!("seats: {}", cafe.seats),
        format!("coffee price: {}", cafe.coffee_price),
        format!("map: {} ({:.4},{:.4})", cafe.map_url, position.lat, position.lng),
    ];
    if let Some(img) = cafe.image() {
        out.push(format!("image: {}", img));
    }
    out
}

pub fn render_screen(report: &ScreenReport) -> Vec<String> {
    let mut out = render_header(&report.list.criteria);
    if let Some(sel) = &report.selected {
        out.push(format!("selected: {} ({})", sel.name, sel.id));
    }
    out.push("-- list --".to_string());
    out.extend(render_list(&report.list, report.map.selected));
    out.push("-- map --".to_string());
    out.extend(render_map(&report.map));
    out
}

pub fn render_map(report: &MapReport) -> Vec<String> {
    let mut out = vec![format!(
        "map center {:.4},{:.4} zoom {}",
        report.center.lat, report.center.lng, report.zoom
    )];
    if let Some(msg) = &report.message {
        out.push(msg.clone());
        return out;
    }
    for m in &report.markers {
        out.push(format!(
            "marker {}\t{:.4},{:.4}\t{}\t{}",
            m.id, m.position.lat, m.position.lng, m.popup.name, m.popup.coffee_price
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::filter::fixtures::{cafe, sample};

    fn populated(cafes: Vec<Cafe>) -> QueryOutcome {
        QueryOutcome {
            cafes,
            loading: false,
            error: None,
        }
    }

    #[test]
    fn state_priority_is_loading_error_empty_populated() {
        let both = QueryOutcome {
            cafes: sample(),
            loading: true,
            error: Some("x".to_string()),
        };
        assert_eq!(ViewState::of(&both), ViewState::Loading);

        let err = QueryOutcome {
            cafes: sample(),
            loading: false,
            error: Some("x".to_string()),
        };
        assert_eq!(ViewState::of(&err), ViewState::Error("x"));
        assert_eq!(ViewState::of(&populated(vec![])), ViewState::Empty);
        assert_eq!(ViewState::of(&populated(sample())).name(), "populated");
    }

    #[test]
    fn blank_error_uses_generic_message() {
        let err = QueryOutcome {
            error: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(ViewState::of(&err).message().as_deref(), Some(GENERIC_ERROR));
    }

    #[test]
    fn list_and_map_come_from_same_collection() {
        let outcome = populated(sample());
        let s = screen(&FilterCriteria::default(), &outcome, None);
        let list_ids: Vec<i64> = s.list.cafes.iter().map(|c| c.id).collect();
        let marker_ids: Vec<i64> = s.map.markers.iter().map(|m| m.id).collect();
        assert_eq!(list_ids, marker_ids);
    }

    #[test]
    fn map_centers_on_selection_then_first_then_fallback() {
        let cafes = sample();
        let outcome = populated(cafes.clone());

        let sel = map_report(&outcome, Some(&cafes[2]));
        assert_eq!(sel.zoom, SELECTED_ZOOM);
        assert_eq!(sel.center, extract_coordinates(&cafes[2].map_url));
        assert_eq!(sel.selected, Some(3));

        let first = map_report(&outcome, None);
        assert_eq!(first.zoom, OVERVIEW_ZOOM);
        assert_eq!(first.center, extract_coordinates(&cafes[0].map_url));

        let mut blank = cafe(8, "Nowhere", false, false);
        blank.map_url.clear();
        let fallback = map_report(&populated(vec![blank]), None);
        assert_eq!(fallback.center, FALLBACK_COORDINATES);
        assert_eq!(fallback.markers[0].position, FALLBACK_COORDINATES);
    }

    #[test]
    fn empty_map_has_no_markers_and_explains_why() {
        let report = map_report(&populated(vec![]), None);
        assert_eq!(report.state, "empty");
        assert!(report.markers.is_empty());
        assert_eq!(report.message.as_deref(), Some("No cafes to display on map"));
    }

    #[test]
    fn list_text_marks_selected_row() {
        let report = list_report(&FilterCriteria::default(), &populated(sample()));
        let lines = render_list(&report, Some(2));
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("> 2\t"));
        assert!(lines[1].contains("[wifi,sockets]"));
    }
}
