//! Search criteria shared read-only by every adapter of one federated search.

use std::str::FromStr;

use common::{bbox::BBox, datetime_interval::DatetimeInterval, hint::HintLanguage, search_query::SearchQuery};

use crate::{error::DiscoveryError, query_utils::overlap::ensure_utc};

pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub bbox: Option<BBox>,
    pub datetime: Option<DatetimeInterval>,
    /// Never blank; a blank query is stored as `None`.
    pub q: Option<String>,
    pub limit: usize,
    pub hint_lang: Option<HintLanguage>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self { bbox: None, datetime: None, q: None, limit: DEFAULT_LIMIT, hint_lang: None }
    }
}

impl SearchCriteria {
    pub fn from_query(query: &SearchQuery) -> Result<Self, DiscoveryError> {
        let limit = match query.limit {
            Some(0) => return Err(DiscoveryError::invalid_input("limit must be a positive integer")),
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
            None => DEFAULT_LIMIT,
        };
        let hint_lang = match query.hint_lang.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(lang) => Some(HintLanguage::from_str(lang).map_err(DiscoveryError::InvalidInput)?),
            None => None,
        };
        Ok(Self {
            bbox: query.bbox.as_deref().map(str_to_bbox).transpose()?.flatten(),
            datetime: query.datetime.as_deref().map(str_to_interval).transpose()?.flatten(),
            q: query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()).map(str::to_string),
            limit,
            hint_lang,
        })
    }

    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_datetime(mut self, datetime: DatetimeInterval) -> Self {
        self.datetime = Some(datetime);
        self
    }

    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.q = if q.trim().is_empty() { None } else { Some(q.trim().to_string()) };
        self
    }

    pub fn with_hint_lang(mut self, hint_lang: HintLanguage) -> Self {
        self.hint_lang = Some(hint_lang);
        self
    }
}

/// `"x0,y0,x1,y1"`. An empty string means no bbox.
pub fn str_to_bbox(bbox_str: &str) -> Result<Option<BBox>, DiscoveryError> {
    if bbox_str.trim().is_empty() {
        return Ok(None);
    }
    let coords = bbox_str
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| DiscoveryError::invalid_input(format!("This is an invalid bbox: {bbox_str}")))?;
    let [xmin, ymin, xmax, ymax] = coords[..] else {
        return Err(DiscoveryError::invalid_input(format!("This is an invalid bbox: {bbox_str}")));
    };
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(DiscoveryError::invalid_input(format!("This is an invalid bbox: {bbox_str}")));
    }
    Ok(Some(BBox::new(xmin, ymin, xmax, ymax)))
}

/// `"start/end"` with `..` or an empty side for an open end, or a single instant.
/// An empty string means no interval.
pub fn str_to_interval(datetime_str: &str) -> Result<Option<DatetimeInterval>, DiscoveryError> {
    let datetime_str = datetime_str.trim();
    if datetime_str.is_empty() {
        return Ok(None);
    }
    let invalid = || {
        DiscoveryError::invalid_input(format!(
            "This is an invalid datetime interval: {datetime_str}. \
             You must provide a datetime range e.g. 2021-02-01T00:00:00Z/.. \
             or 2024-06-01T00:00:00/2024-06-30T23:59:59Z"
        ))
    };
    let bound = |part: &str| -> Result<_, DiscoveryError> {
        match part.trim() {
            "" | ".." => Ok(None),
            text => ensure_utc(text).map(Some).map_err(|_| invalid()),
        }
    };

    let parts = datetime_str.split('/').collect::<Vec<_>>();
    let interval = match parts[..] {
        [instant] => {
            let instant = bound(instant)?.ok_or_else(invalid)?;
            DatetimeInterval::new(Some(instant), Some(instant))
        }
        [start, end] => DatetimeInterval::new(bound(start)?, bound(end)?),
        _ => return Err(invalid()),
    };
    if interval.is_fully_open() {
        return Err(invalid());
    }
    if let (Some(start), Some(end)) = (interval.start, interval.end) {
        if start > end {
            return Err(invalid());
        }
    }
    Ok(Some(interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_bbox() {
        assert_eq!(str_to_bbox("-130,45,-125,46").unwrap(), Some(BBox::new(-130.0, 45.0, -125.0, 46.0)));
        assert_eq!(str_to_bbox(" ").unwrap(), None);
        for bad in ["1,2,3", "a,b,c,d", "1,2,3,4,5", "1,2,NaN,4"] {
            assert!(matches!(str_to_bbox(bad), Err(DiscoveryError::InvalidInput(_))), "{bad}");
        }
    }

    #[test]
    fn parses_open_and_closed_intervals() {
        let start = Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(str_to_interval("2021-02-01T00:00:00Z/..").unwrap(), Some(DatetimeInterval::new(Some(start), None)));
        assert_eq!(str_to_interval("/2021-02-01T00:00:00Z").unwrap(), Some(DatetimeInterval::new(None, Some(start))));

        let interval = str_to_interval("2024-06-01T00:00:00/2024-06-30T23:59:59Z").unwrap().unwrap();
        assert_eq!(interval.start, Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        assert_eq!(interval.end, Some(Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap()));

        assert_eq!(str_to_interval("2021-02-01T00:00:00Z").unwrap(), Some(DatetimeInterval::new(Some(start), Some(start))));
    }

    #[test]
    fn rejects_bad_intervals() {
        for bad in ["../..", "yesterday/..", "2021-01-01/2020-01-01", "a/b/c"] {
            assert!(matches!(str_to_interval(bad), Err(DiscoveryError::InvalidInput(_))), "{bad}");
        }
    }

    #[test]
    fn from_query_applies_defaults() {
        let criteria = SearchCriteria::from_query(&SearchQuery { q: Some("   ".to_string()), ..Default::default() }).unwrap();
        assert_eq!(criteria, SearchCriteria::default());
        assert_eq!(criteria.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn from_query_rejects_zero_limit_and_unknown_language() {
        let zero = SearchQuery { limit: Some(0), ..Default::default() };
        assert!(SearchCriteria::from_query(&zero).is_err());
        let lang = SearchQuery { hint_lang: Some("cobol".to_string()), ..Default::default() };
        assert!(matches!(SearchCriteria::from_query(&lang), Err(DiscoveryError::InvalidInput(_))));
        let python = SearchQuery { hint_lang: Some("python".to_string()), ..Default::default() };
        assert_eq!(SearchCriteria::from_query(&python).unwrap().hint_lang, Some(HintLanguage::Python));
    }
}
