use crate::dates::{parse_calendar_date, RecordDate, SENTINEL};
use crate::models::ListRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Filterable fields, named by the keys the list views send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    SearchTerm,
    Status,
    Priority,
    AssigneeId,
    StartDate,
    EndDate,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::SearchTerm,
        FilterField::Status,
        FilterField::Priority,
        FilterField::AssigneeId,
        FilterField::StartDate,
        FilterField::EndDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SearchTerm => "searchTerm",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::AssigneeId => "assigneeId",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On the wire this is the raw `assigneeId` value the list views send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssigneeFilter {
    #[default]
    Any,
    Assignee(u64),
    /// The filter value did not parse. Matches nothing.
    Unmatchable,
}

impl AssigneeFilter {
    /// Empty input means "all". `0` parses but never matches, since
    /// unassigned records carry no id.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Any;
        }
        raw.parse::<u64>()
            .map_or(Self::Unmatchable, Self::Assignee)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    fn matches(self, assignee: Option<u64>) -> bool {
        match self {
            Self::Any => true,
            Self::Assignee(expected) => assignee == Some(expected),
            Self::Unmatchable => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    Any,
    On(NaiveDate),
    Unmatchable,
}

impl DateFilter {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Any;
        }
        parse_calendar_date(raw).map_or(Self::Unmatchable, Self::On)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Raw filter input as it arrives in JSON. Ids may come as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(u64),
}

fn raw_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Text(text)) => text,
        Some(RawValue::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

// An unparseable filter is written as the sentinel, which parses back to
// `Unmatchable`.
impl Serialize for AssigneeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str(""),
            Self::Assignee(id) => serializer.collect_str(id),
            Self::Unmatchable => serializer.serialize_str(SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for AssigneeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        raw_value(deserializer).map(|raw| Self::parse(&raw))
    }
}

impl Serialize for DateFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str(""),
            Self::On(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            Self::Unmatchable => serializer.serialize_str(SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for DateFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        raw_value(deserializer).map(|raw| Self::parse(&raw))
    }
}

fn non_blank_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(non_blank))
}

/// The active per-field predicates of a list view, combined by AND.
///
/// Unset fields match everything. A record that lacks a filtered field does
/// not match that filter. Blank text counts as unset however it was set.
///
/// The JSON form uses the same keys and raw values as [`FilterSet::from_params`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    #[serde(deserialize_with = "non_blank_text", skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(deserialize_with = "non_blank_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(deserialize_with = "non_blank_text", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(rename = "assigneeId", skip_serializing_if = "AssigneeFilter::is_any")]
    pub assignee: AssigneeFilter,
    #[serde(skip_serializing_if = "DateFilter::is_any")]
    pub start_date: DateFilter,
    #[serde(skip_serializing_if = "DateFilter::is_any")]
    pub end_date: DateFilter,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter set from raw `key -> value` pairs. Empty values are
    /// unset; unknown keys are ignored.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Self::default();
        for (key, value) in params {
            match FilterField::parse(key.as_ref()) {
                Some(field) => filters.set(field, value.as_ref()),
                None => {
                    tracing::debug!(key = key.as_ref(), "ignoring unknown filter key");
                }
            }
        }
        filters
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.set(FilterField::SearchTerm, term);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.set(FilterField::Status, status);
        self
    }

    pub fn with_priority(mut self, priority: &str) -> Self {
        self.set(FilterField::Priority, priority);
        self
    }

    pub fn with_assignee(mut self, assignee_id: u64) -> Self {
        self.assignee = AssigneeFilter::Assignee(assignee_id);
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = DateFilter::On(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = DateFilter::On(date);
        self
    }

    /// Sets one field from its raw UI value. Blank input clears the field.
    pub fn set(&mut self, field: FilterField, raw: &str) {
        match field {
            FilterField::SearchTerm => self.search_term = non_blank(raw),
            FilterField::Status => self.status = non_blank(raw),
            FilterField::Priority => self.priority = non_blank(raw),
            FilterField::AssigneeId => self.assignee = AssigneeFilter::parse(raw),
            FilterField::StartDate => self.start_date = DateFilter::parse(raw),
            FilterField::EndDate => self.end_date = DateFilter::parse(raw),
        }
    }

    pub fn clear(&mut self, field: FilterField) {
        self.set(field, "");
    }

    pub fn is_empty(&self) -> bool {
        [&self.search_term, &self.status, &self.priority]
            .into_iter()
            .all(|text| trimmed(text).is_none())
            && self.assignee.is_any()
            && self.start_date.is_any()
            && self.end_date.is_any()
    }

    pub fn matches<R: ListRecord>(&self, record: &R) -> bool {
        Compiled::new(self).matches(record)
    }

    /// Keeps the records that pass every active filter, in source order.
    pub fn apply<'a, R: ListRecord>(&self, records: &'a [R]) -> Vec<&'a R> {
        let compiled = Compiled::new(self);
        records
            .iter()
            .filter(|record| compiled.matches(*record))
            .collect()
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// Fields are public, so text may arrive padded or blank.
fn trimmed(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

/// Lowercased needles, computed once per `apply`.
struct Compiled<'f> {
    search: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    filters: &'f FilterSet,
}

impl<'f> Compiled<'f> {
    fn new(filters: &'f FilterSet) -> Self {
        Self {
            search: trimmed(&filters.search_term).map(str::to_lowercase),
            status: trimmed(&filters.status).map(str::to_lowercase),
            priority: trimmed(&filters.priority).map(str::to_lowercase),
            filters,
        }
    }

    fn matches<R: ListRecord>(&self, record: &R) -> bool {
        if let Some(needle) = self.search.as_deref() {
            let Some(title) = record.title() else {
                return false;
            };
            if !title.to_lowercase().contains(needle) {
                return false;
            }
        }

        if !equals_ignore_case(record.status(), self.status.as_deref()) {
            return false;
        }

        if !equals_ignore_case(record.priority(), self.priority.as_deref()) {
            return false;
        }

        if !self.filters.assignee.matches(record.assignee_id()) {
            return false;
        }

        date_matches(self.filters.start_date, || record.start_date())
            && date_matches(self.filters.end_date, || record.end_date())
    }
}

fn equals_ignore_case(value: Option<&str>, expected_lower: Option<&str>) -> bool {
    let Some(expected) = expected_lower else {
        return true;
    };
    value.is_some_and(|value| value.trim().to_lowercase() == expected)
}

fn date_matches(filter: DateFilter, value: impl FnOnce() -> RecordDate) -> bool {
    match filter {
        DateFilter::Any => true,
        DateFilter::On(expected) => value().same_day(expected),
        DateFilter::Unmatchable => false,
    }
}
