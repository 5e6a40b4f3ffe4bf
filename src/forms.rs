// worklog-backend/src/forms.rs
//! Turns raw submitted form fields into the typed inputs the stores expect.
use crate::models::TaskRowInput;
use std::collections::{BTreeMap, HashMap};

/// Number of empty task rows offered by the blank daily-log form.
pub const BLANK_FORM_ROWS: usize = 5;

const ROW_FIELDS: [&str; 7] = [
    "task_type",
    "task_details",
    "task_result",
    "work_time_am",
    "work_time_pm",
    "future_plan",
    "notes",
];

/// Collects `task_type_3`, `notes_3`, ... into one row per index, in index
/// order. Gaps are fine; indices with no fields simply produce no row, and
/// names whose suffix is not a number are ignored.
pub fn parse_task_rows(fields: &HashMap<String, String>) -> Vec<TaskRowInput> {
    let mut rows: BTreeMap<usize, TaskRowInput> = BTreeMap::new();

    for (key, value) in fields {
        let Some((prefix, index)) = key.rsplit_once('_') else {
            continue;
        };
        let Ok(index) = index.parse::<usize>() else {
            continue;
        };
        if !ROW_FIELDS.contains(&prefix) {
            continue;
        }

        let row = rows.entry(index).or_default();
        let slot = match prefix {
            "task_type" => &mut row.task_type,
            "task_details" => &mut row.task_details,
            "task_result" => &mut row.task_result,
            "work_time_am" => &mut row.work_time_am,
            "work_time_pm" => &mut row.work_time_pm,
            "future_plan" => &mut row.future_plan,
            "notes" => &mut row.notes,
            _ => continue,
        };
        *slot = Some(value.clone());
    }

    rows.into_values().collect()
}

/// Reduces a client-supplied filename to a safe flat name: separators become
/// spaces, whitespace becomes `_`, anything outside `[A-Za-z0-9_.-]` is
/// dropped and leading/trailing `.`/`_` are trimmed. May return "".
pub fn sanitize_filename(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
