// worklog-backend/src/views.rs
//! Server-rendered HTML pages. Every piece of stored text goes through
//! `escape` before it reaches the markup.
use crate::forms::BLANK_FORM_ROWS;
use crate::models::{DailyLog, DailyLogDetail, FileRecord, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn timestamp(value: &Option<NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/work/daily\">Daily log</a> | \
         <a href=\"/work/weekly\">Weekly reports</a> | <a href=\"/work/evtx\">EVTX</a></nav>\n\
         <h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

fn upload_form(category: &str) -> String {
    format!(
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\">\
         <input type=\"hidden\" name=\"category\" value=\"{}\">\
         <button type=\"submit\">Upload</button></form>\n",
        escape(category)
    )
}

fn file_table(files: &[FileRecord]) -> String {
    if files.is_empty() {
        return "<p>No files uploaded yet.</p>\n".to_string();
    }
    let mut html = String::from(
        "<table>\n<tr><th>#</th><th>Filename</th><th>Type</th><th>Uploaded</th><th>Status</th><th>Category</th></tr>\n",
    );
    for file in files {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            file.id,
            escape(&file.filename),
            opt(&file.file_type),
            timestamp(&file.upload_date),
            opt(&file.status),
            opt(&file.category),
        );
    }
    html.push_str("</table>\n");
    html
}

pub fn home_page() -> String {
    let body = format!(
        "<p>Upload a file or open the <a href=\"/work/daily\">daily work log</a>.</p>\n{}",
        upload_form("general")
    );
    layout("Work log", &body)
}

/// `duplicate` is the date of a rejected submission, if the user was sent
/// back here after one.
pub fn daily_list_page(logs: &[DailyLog], duplicate: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(date) = duplicate {
        let _ = writeln!(
            body,
            "<p class=\"error\">A daily log for {} already exists.</p>",
            escape(date)
        );
    }
    body.push_str("<p><a href=\"/work/daily/new\">New daily log</a></p>\n");

    if logs.is_empty() {
        body.push_str("<p>No daily logs yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Date</th><th>Created</th></tr>\n");
        for log in logs {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"/work/daily/view/{}\">{}</a></td><td>{}</td></tr>",
                log.id,
                log.work_date,
                log.created_at.format(TIMESTAMP_FORMAT)
            );
        }
        body.push_str("</table>\n");
    }
    layout("Daily work log", &body)
}

pub fn daily_form_page() -> String {
    let mut body = String::from(
        "<form action=\"/work/daily/add\" method=\"post\">\n\
         <label>Date <input type=\"date\" name=\"work_date\" required></label>\n\
         <table>\n<tr><th>AM</th><th>PM</th><th>Type</th><th>Details</th><th>Result</th>\
         <th>Plan</th><th>Notes</th></tr>\n",
    );
    for i in 0..BLANK_FORM_ROWS {
        let _ = writeln!(
            body,
            "<tr><td><input type=\"checkbox\" name=\"work_time_am_{i}\" value=\"AM\"></td>\
             <td><input type=\"checkbox\" name=\"work_time_pm_{i}\" value=\"PM\"></td>\
             <td><input name=\"task_type_{i}\"></td>\
             <td><textarea name=\"task_details_{i}\"></textarea></td>\
             <td><input name=\"task_result_{i}\"></td>\
             <td><input name=\"future_plan_{i}\"></td>\
             <td><input name=\"notes_{i}\"></td></tr>"
        );
    }
    body.push_str("</table>\n<button type=\"submit\">Save</button>\n</form>\n");
    layout("New daily log", &body)
}

pub fn daily_detail_page(detail: &DailyLogDetail) -> String {
    let mut body = format!(
        "<p>Created {}</p>\n<table>\n<tr><th>Time</th><th>Type</th><th>Details</th>\
         <th>Result</th><th>Plan</th><th>Notes</th></tr>\n",
        detail.log.created_at.format(TIMESTAMP_FORMAT)
    );
    for task in &detail.tasks {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            opt(&task.work_time),
            opt(&task.task_type),
            opt(&task.task_details),
            opt(&task.task_result),
            opt(&task.future_plan),
            opt(&task.notes),
        );
    }
    body.push_str("</table>\n<p><a href=\"/work/daily\">Back to list</a></p>\n");
    layout(&format!("Daily log {}", detail.log.work_date), &body)
}

pub fn weekly_page(files: &[FileRecord]) -> String {
    let body = format!("{}{}", upload_form("weekly"), file_table(files));
    layout("Weekly reports", &body)
}

pub fn evtx_page(files: &[FileRecord]) -> String {
    let body = format!("{}{}", upload_form("evtx"), file_table(files));
    layout("EVTX event logs", &body)
}
