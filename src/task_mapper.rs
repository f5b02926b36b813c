//! Maps Asana tasks to Google Tasks drafts.

use crate::asana::AsanaTask;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Title used when the source task has no name
const UNTITLED_TASK: &str = "名称未設定タスク";

/// Simplified task structure for insert requests.
/// Only the fields the Tasks API needs; optional API fields are omitted
/// entirely rather than sent as null.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GtaskDraft {
    pub title: String,
    pub notes: String,
    pub status: String,
    pub due: String,
}

/// Build the Google Tasks draft for one Asana task.
///
/// `due` is the run-wide fixed due timestamp; the task's own due date only
/// surfaces in the title suffix.
pub fn task_to_gtask(task: &AsanaTask, due: &str) -> GtaskDraft {
    GtaskDraft {
        title: format_task_title(task),
        notes: format_task_notes(task),
        status: "needsAction".to_string(),
        due: due.to_string(),
    }
}

/// Format the destination title: source name plus `[M/D期限]` when the task
/// carries a due date
fn format_task_title(task: &AsanaTask) -> String {
    let name = if task.name.is_empty() {
        UNTITLED_TASK
    } else {
        task.name.as_str()
    };

    let suffix = format_due_suffix(task.due_on.as_deref(), task.due_at.as_deref());
    if suffix.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, suffix)
    }
}

/// Format the destination notes: source notes, permalink and GID
fn format_task_notes(task: &AsanaTask) -> String {
    format!(
        "Asanaタスク詳細:\n{}\n\nAsanaリンク: {}\nAsanaタスクGID: {}",
        task.notes,
        task.permalink_url.as_deref().unwrap_or("N/A"),
        task.gid
    )
}

/// Convert an Asana due field pair into the `[M/D期限]` title suffix.
///
/// `due_at` (date+time) takes precedence over `due_on` (date-only). A
/// date-only value is taken at UTC midnight so the calendar day never
/// shifts with the local timezone. Month and day come from the UTC
/// components, unpadded. Unparseable input degrades to an empty suffix.
pub fn format_due_suffix(due_on: Option<&str>, due_at: Option<&str>) -> String {
    let Some(raw) = due_at.or(due_on) else {
        return String::new();
    };

    let parsed = if raw.len() == 10 {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| (d.format("%-m").to_string(), d.format("%-d").to_string()))
    } else {
        DateTime::parse_from_rfc3339(raw).map(|dt| {
            let utc = dt.with_timezone(&Utc);
            (utc.format("%-m").to_string(), utc.format("%-d").to_string())
        })
    };

    match parsed {
        Ok((month, day)) => format!("[{}/{}期限]", month, day),
        Err(e) => {
            log::warn!("Could not format due date '{}' for title: {}", raw, e);
            String::new()
        }
    }
}

/// Compute the due timestamp shared by every task created in a run:
/// today at 09:00 JST, rendered in UTC with millisecond precision.
pub fn fixed_due_timestamp(now: DateTime<Utc>) -> String {
    let jst = FixedOffset::east_opt(9 * 3600).unwrap();
    let today_jst = now.with_timezone(&jst).date_naive();
    let nine_am_jst = today_jst
        .and_hms_opt(9, 0, 0)
        .unwrap()
        .and_local_timezone(jst)
        .unwrap();

    nine_am_jst
        .with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, notes: &str) -> AsanaTask {
        serde_json::from_value(serde_json::json!({
            "gid": "123",
            "name": name,
            "notes": notes,
            "permalink_url": "https://x",
            "completed": false,
        }))
        .unwrap()
    }

    #[test]
    fn due_suffix_from_date_only() {
        assert_eq!(format_due_suffix(Some("2025-03-05"), None), "[3/5期限]");
    }

    #[test]
    fn due_suffix_from_timestamp() {
        assert_eq!(
            format_due_suffix(None, Some("2025-12-01T23:30:00Z")),
            "[12/1期限]"
        );
    }

    #[test]
    fn due_suffix_prefers_due_at() {
        assert_eq!(
            format_due_suffix(Some("2025-01-01"), Some("2025-01-02T00:00:00Z")),
            "[1/2期限]"
        );
    }

    #[test]
    fn due_suffix_empty_without_dates() {
        assert_eq!(format_due_suffix(None, None), "");
    }

    #[test]
    fn due_suffix_empty_on_malformed_input() {
        assert_eq!(format_due_suffix(None, Some("not-a-date")), "");
        assert_eq!(format_due_suffix(Some("2025/03/05"), None), "");
    }

    #[test]
    fn due_suffix_uses_utc_components() {
        // 23:30 with a +09:00 offset is 14:30 UTC the same day
        assert_eq!(
            format_due_suffix(None, Some("2025-12-01T23:30:00+09:00")),
            "[12/1期限]"
        );
        // 01:30 with a +09:00 offset crosses back to the previous UTC day
        assert_eq!(
            format_due_suffix(None, Some("2025-12-02T01:30:00+09:00")),
            "[12/1期限]"
        );
    }

    #[test]
    fn fixed_due_is_nine_am_jst_in_utc() {
        // 10:00 UTC = 19:00 JST, still the same JST day
        let now = "2025-06-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(fixed_due_timestamp(now), "2025-06-01T00:00:00.000Z");

        // 20:00 UTC = 05:00 JST the next day
        let now = "2025-06-01T20:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(fixed_due_timestamp(now), "2025-06-02T00:00:00.000Z");
    }

    #[test]
    fn title_appends_suffix_when_due_present() {
        let mut t = task("Write report", "");
        t.due_on = Some("2025-03-05".to_string());
        let draft = task_to_gtask(&t, "2025-03-05T00:00:00.000Z");
        assert_eq!(draft.title, "Write report [3/5期限]");
    }

    #[test]
    fn title_falls_back_for_unnamed_tasks() {
        let t = task("", "");
        let draft = task_to_gtask(&t, "2025-03-05T00:00:00.000Z");
        assert_eq!(draft.title, "名称未設定タスク");
    }

    #[test]
    fn notes_embed_source_fields_verbatim() {
        let t = task("t", "abc");
        let draft = task_to_gtask(&t, "2025-03-05T00:00:00.000Z");
        assert!(draft.notes.contains("abc"));
        assert!(draft.notes.contains("https://x"));
        assert!(draft.notes.contains("123"));
    }

    #[test]
    fn notes_fall_back_when_permalink_missing() {
        let mut t = task("t", "");
        t.permalink_url = None;
        let draft = task_to_gtask(&t, "2025-03-05T00:00:00.000Z");
        assert!(draft.notes.contains("N/A"));
    }

    #[test]
    fn draft_serializes_expected_fields() {
        let t = task("t", "n");
        let draft = task_to_gtask(&t, "2025-03-05T00:00:00.000Z");
        let v: serde_json::Value = serde_json::to_value(&draft).unwrap();
        assert_eq!(v["status"], "needsAction");
        assert_eq!(v["due"], "2025-03-05T00:00:00.000Z");
        assert!(v["title"].is_string());
        assert!(v["notes"].is_string());
    }
}
