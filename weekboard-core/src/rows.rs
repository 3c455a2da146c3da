//! Flatten seven day buckets into the row list the week view renders.

use std::ops::Deref;

use chrono::NaiveDate;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::event::Event;
use crate::format::format_week_day;
use crate::gaps::{DayItem, interleave_gaps};
use crate::view::ViewContext;
use crate::week::bucketize;

/// One rendered row, keyed uniquely across the whole week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// `"{cur_day}_{original id}"`
    pub id: String,
    /// Title of the day group this row belongs to
    pub cur_day: String,
    #[serde(flatten)]
    pub kind: RowKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "rowType",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum RowKind {
    Title {
        day: usize,
        data: String,
    },
    Data {
        #[serde(flatten)]
        event: RowEvent,
        duration: String,
        /// Synthetic all-day copies cannot be opened or edited
        disabled: bool,
    },
    #[serde(rename = "diff")]
    Gap {
        data: String,
        start: i64,
        end: i64,
        is_end: bool,
        disabled: bool,
    },
}

/// Event inlined into a `data` row. Its owner uid is written as `ownerId`
/// since the row's own `id` takes that key.
#[derive(Debug, Clone, PartialEq)]
pub struct RowEvent(pub Event);

impl Deref for RowEvent {
    type Target = Event;

    fn deref(&self) -> &Event {
        &self.0
    }
}

impl Serialize for RowEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let serde_json::Value::Object(mut fields) = serde_json::to_value(&self.0).map_err(S::Error::custom)? else {
            return Err(S::Error::custom("event must serialize to an object"));
        };
        if let Some(owner) = fields.remove("id") {
            fields.insert("ownerId".to_string(), owner);
        }
        fields.serialize(serializer)
    }
}

impl Row {
    pub fn is_title(&self) -> bool {
        matches!(self.kind, RowKind::Title { .. })
    }
}

/// Prefix each day with its title row and namespace every id by day.
pub fn build_rows(days: Vec<Vec<DayItem>>, week_start: NaiveDate) -> Vec<Row> {
    let mut rows = Vec::new();

    for (index, items) in days.into_iter().enumerate() {
        let cur_day = format_week_day(week_start, index);
        let first_eid = items.iter().find_map(|item| match item {
            DayItem::Meeting(entry) => Some(entry.event.eid.clone()),
            DayItem::Gap { .. } => None,
        });

        rows.push(Row {
            id: format!("{cur_day}_title"),
            cur_day: cur_day.clone(),
            kind: RowKind::Title {
                day: index,
                data: cur_day.clone(),
            },
        });

        for item in items {
            let (original_id, kind) = match item {
                DayItem::Meeting(entry) => {
                    let disabled = entry.is_copy();
                    (
                        entry.event.eid.clone(),
                        RowKind::Data {
                            event: RowEvent(entry.event),
                            duration: entry.duration,
                            disabled,
                        },
                    )
                }
                DayItem::Gap { gap, anchor } => {
                    let original_id = match (anchor, &first_eid) {
                        (Some(eid), _) => format!("{eid}_gap"),
                        (None, Some(first)) => format!("{first}_prefix_gap"),
                        (None, None) => "free".to_string(),
                    };
                    (
                        original_id,
                        RowKind::Gap {
                            data: gap.label,
                            start: gap.start,
                            end: gap.end,
                            is_end: gap.is_end,
                            disabled: gap.disabled,
                        },
                    )
                }
            };

            rows.push(Row {
                id: format!("{cur_day}_{original_id}"),
                cur_day: cur_day.clone(),
                kind,
            });
        }
    }

    rows
}

/// The full personal week list: bucketize, add gaps, flatten.
pub fn build_week_list(
    events: &[Event],
    week_start: NaiveDate,
    my_accounts: &[String],
    ctx: &ViewContext,
) -> Vec<Row> {
    let days = bucketize(events, week_start, my_accounts, ctx)
        .into_iter()
        .enumerate()
        .map(|(index, entries)| {
            let day = week_start + chrono::Duration::days(index as i64);
            interleave_gaps(entries, day, ctx)
        })
        .collect();

    build_rows(days, week_start)
}
