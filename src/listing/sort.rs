use crate::models::ListRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    EndDate,
    StartDate,
    Title,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `"asc"` in any case is ascending; anything else is descending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Single-key comparator applied after filtering.
///
/// Missing values (sentinel dates, absent titles, unknown priorities) rank as
/// the lowest value of their key. Equal keys keep their input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sorter {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sorter {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Newest end date first, sentinel dates last.
    pub fn end_date_desc() -> Self {
        Self::default()
    }

    pub fn compare<R: ListRecord>(&self, a: &R, b: &R) -> Ordering {
        let ordering = match self.key {
            SortKey::EndDate => a.end_date().cmp(&b.end_date()),
            SortKey::StartDate => a.start_date().cmp(&b.start_date()),
            SortKey::Title => title_key(a).cmp(&title_key(b)),
            SortKey::Priority => priority_rank(a.priority()).cmp(&priority_rank(b.priority())),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable in-place sort.
    pub fn apply<R: ListRecord>(&self, records: &mut [R]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

fn title_key<R: ListRecord>(record: &R) -> Option<String> {
    record.title().map(str::to_lowercase)
}

/// High > Medium > Low > anything else.
pub fn priority_rank(priority: Option<&str>) -> u8 {
    match priority.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("high") => 3,
        Some("medium") => 2,
        Some("low") => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::RecordDate;
    use crate::models::TaskRecord;

    fn task(id: &str, end: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: None,
            status: None,
            priority: None,
            assignee_id: None,
            start_date: RecordDate::Missing,
            end_date: RecordDate::parse(end),
            kind: None,
        }
    }

    #[test]
    fn end_date_desc_puts_sentinels_last_and_is_stable() {
        let mut records = vec![
            task("0", "2025-01-01"),
            task("1", "N/A"),
            task("2", "2025-03-01"),
            task("3", "garbage"),
            task("4", "2025-03-01"),
        ];
        Sorter::end_date_desc().apply(&mut records);
        let order: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(order, vec!["2", "4", "0", "1", "3"]);
    }

    #[test]
    fn ascending_puts_sentinels_first() {
        let mut records = vec![task("0", "2025-01-01"), task("1", "N/A")];
        Sorter::new(SortKey::EndDate, SortDirection::Asc).apply(&mut records);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn priority_key_ranks_high_first_when_descending() {
        let mut records = vec![task("low", "N/A"), task("none", "N/A"), task("high", "N/A")];
        records[0].priority = Some("Low".to_string());
        records[2].priority = Some("HIGH".to_string());
        Sorter::new(SortKey::Priority, SortDirection::Desc).apply(&mut records);
        let order: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(order, vec!["high", "low", "none"]);
    }

    #[test]
    fn title_key_ignores_case() {
        let mut records = vec![task("b", "N/A"), task("a", "N/A")];
        records[0].title = "beta".to_string();
        records[1].title = "Alpha".to_string();
        Sorter::new(SortKey::Title, SortDirection::Asc).apply(&mut records);
        assert_eq!(records[0].id, "a");
    }

    #[test]
    fn direction_parse_defaults_to_desc() {
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Desc);
    }
}
