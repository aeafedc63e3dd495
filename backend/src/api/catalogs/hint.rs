//! Example client code ("hints") showing how to fetch items from a matched collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::{
    bbox::BBox,
    datetime_interval::DatetimeInterval,
    hint::{HintLanguage, HintPackage},
};

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn join_coords(bbox: &BBox, separator: &str) -> String {
    bbox.coords().iter().map(|c| c.to_string()).collect::<Vec<_>>().join(separator)
}

/// `start/end` with `..` for open ends, as STAC item search expects.
pub(crate) fn stac_datetime(interval: &DatetimeInterval) -> String {
    [interval.start, interval.end]
        .iter()
        .map(|dt| dt.as_ref().map(format_datetime).unwrap_or("..".to_string()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Quoted timestamps with Python `None` for open ends.
fn python_datetimes(interval: &DatetimeInterval) -> String {
    [interval.start, interval.end]
        .iter()
        .map(|dt| dt.as_ref().map(|dt| format!("\"{}\"", format_datetime(dt))).unwrap_or("None".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn pystac_client_hint(base_url: &str, collection_id: &str, bbox: Option<&BBox>, datetime: Option<&DatetimeInterval>) -> String {
    let mut other = String::new();
    if let Some(bbox) = bbox {
        other.push_str(&format!("    bbox=({}),\n", join_coords(bbox, ", ")));
    }
    if let Some(datetime) = datetime {
        other.push_str(&format!("    datetime=\"{}\",\n", stac_datetime(datetime)));
    }
    let mut hint = format!(
        "# set up an item search with pystac_client\n\
         import pystac_client\n\
         \n\
         catalog = pystac_client.Client.open(\"{base_url}\")\n\
         \n\
         # get a sample of 10 items\n\
         search = catalog.search(\n\
         \x20   collections=\"{collection_id}\",\n\
         {other}\
         \x20   max_items=10,\n\
         )\n\
         items = search.items()\n"
    );
    if other.is_empty() {
        hint.push_str("\n# consider using the bbox and/or datetime filters for a more targeted search\n");
    }
    hint
}

pub fn python_cmr_hint(base_url: &str, short_name: &str, bbox: Option<&BBox>, datetime: Option<&DatetimeInterval>) -> String {
    let mut other = String::new();
    if let Some(bbox) = bbox {
        other.push_str(&format!(".bounding_box({})", join_coords(bbox, ", ")));
    }
    if let Some(datetime) = datetime {
        other.push_str(&format!(".temporal({})", python_datetimes(datetime)));
    }
    let mut hint = format!(
        "# set up a granule search with python-cmr\n\
         from cmr import GranuleQuery\n\
         \n\
         # get a sample of 10 granules\n\
         search = GranuleQuery(mode=\"{base_url}\").short_name(\"{}\"){other}\n\
         granules = search.get(10)\n",
        short_name.trim()
    );
    if other.is_empty() {
        hint.push_str("\n# consider applying a bounding box and/or temporal filter for a more targeted search\n");
    }
    hint
}

pub fn earthaccess_hint(short_name: &str, bbox: Option<&BBox>, datetime: Option<&DatetimeInterval>) -> String {
    let mut other = String::new();
    if let Some(bbox) = bbox {
        other.push_str(&format!("    bounding_box=({}),\n", join_coords(bbox, ", ")));
    }
    if let Some(datetime) = datetime {
        other.push_str(&format!("    temporal=({}),\n", python_datetimes(datetime)));
    }
    let mut hint = format!(
        "# set up a granule search with earthaccess\n\
         import earthaccess\n\
         \n\
         earthaccess.login()\n\
         \n\
         # get a sample of 10 granules\n\
         results = earthaccess.search_data(\n\
         \x20   short_name=\"{}\",\n\
         {other}\
         \x20   count=10,\n\
         )\n",
        short_name.trim()
    );
    if other.is_empty() {
        hint.push_str("\n# consider using the bounding_box and/or temporal arguments for a more targeted search\n");
    }
    hint
}

pub fn rstac_hint(base_url: &str, collection_id: &str, bbox: Option<&BBox>, datetime: Option<&DatetimeInterval>) -> String {
    let mut other = String::new();
    if let Some(bbox) = bbox {
        other.push_str(&format!("\n    bbox = c({}),", join_coords(bbox, ", ")));
    }
    if let Some(datetime) = datetime {
        other.push_str(&format!("\n    datetime = \"{}\",", stac_datetime(datetime)));
    }
    let mut hint = format!(
        "# set up an item search with rstac\n\
         library(rstac)\n\
         \n\
         catalog <- stac(\"{base_url}\")\n\
         \n\
         # get a sample of 10 items\n\
         items <- catalog |>\n\
         \x20 stac_search(\n\
         \x20   collections = \"{collection_id}\",{other}\n\
         \x20   limit = 10\n\
         \x20 ) |>\n\
         \x20 get_request()\n"
    );
    if other.is_empty() {
        hint.push_str("\n# consider using the bbox and/or datetime args for a more targeted search\n");
    }
    hint
}

/// Keeps the candidates written for `hint_lang`. `None` when no language was requested or
/// nothing matched it.
pub fn select_hints(
    hint_lang: Option<HintLanguage>,
    candidates: impl IntoIterator<Item = (HintPackage, String)>,
) -> Option<BTreeMap<HintPackage, String>> {
    let hint_lang = hint_lang?;
    let hints = candidates
        .into_iter()
        .filter(|(package, _)| package.language() == hint_lang)
        .collect::<BTreeMap<_, _>>();
    if hints.is_empty() { None } else { Some(hints) }
}
