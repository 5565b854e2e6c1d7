//! Server-rendered HTML pages: home, archive and write form

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::Write as _;
use tracing::debug;

use crate::error::LetterError;
use crate::letters::validate_content;
use crate::server::ServerState;
use crate::types::{parse_timestamp, Category, Letter, NewLetter};

const STYLE: &str = r#"
    body {
        font-family: 'Cormorant Garamond', Georgia, serif;
        background: #fbf7ef;
        color: #3b2f2a;
        margin: 0;
    }
    nav, main, footer { max-width: 960px; margin: 0 auto; padding: 24px; }
    nav { display: flex; justify-content: space-between; align-items: center; }
    nav a, .link { color: #7a5c4f; text-decoration: none; margin-left: 16px; }
    h1, h2 { color: #6b3f2f; text-align: center; }
    .lead { text-align: center; font-size: 1.3em; color: #7a6a60; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 20px; }
    .letter-card { background: #fffdf8; border: 1px solid #e8dccb; border-radius: 12px; padding: 20px; }
    .handwriting { font-family: 'Handlee', cursive; white-space: pre-wrap; line-height: 1.6; }
    .meta { display: flex; justify-content: space-between; font-size: 0.8em; color: #8a7a70; margin-top: 12px; }
    .badge { background: #f1e4d3; border-radius: 999px; padding: 2px 8px; }
    .notice { background: #e9f3e4; border-radius: 8px; padding: 12px; text-align: center; }
    .error { background: #f8e1dc; border-radius: 8px; padding: 12px; text-align: center; }
    .panel { background: #f1e4d3; border-radius: 12px; padding: 32px; margin-top: 48px; text-align: center; }
    .filters { display: flex; justify-content: center; gap: 16px; margin-bottom: 32px; }
    .button { background: #6b3f2f; color: #fff; border: none; border-radius: 8px; padding: 10px 20px; text-decoration: none; }
    textarea { width: 100%; height: 320px; font-family: 'Handlee', cursive; font-size: 1.1em; }
    input, select, textarea { border: 1px solid #e8dccb; border-radius: 8px; padding: 10px; background: #fffdf8; }
    label { display: block; margin: 16px 0 8px; }
    footer { border-top: 1px solid #e8dccb; text-align: center; font-size: 0.9em; color: #8a7a70; }
"#;

/// Archive page query: `?category=Career`, `?shuffle=true`, `?submitted=true`
#[derive(Debug, Default, Deserialize)]
pub struct ArchiveQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub submitted: bool,
}

/// Fields posted by the write form
#[derive(Debug, Default, Deserialize)]
pub struct WriteForm {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub category: String,
}

impl WriteForm {
    /// Submission for the repository. Categories outside the offered set are dropped.
    fn to_new_letter(&self) -> NewLetter {
        let nickname = Some(self.nickname.trim().to_string()).filter(|n| !n.is_empty());
        let category = match Category::from_label(&self.category) {
            Some(c) => Some(c.as_str().to_string()),
            None => {
                if !self.category.is_empty() {
                    debug!("Ignoring unknown category '{}' from write form", self.category);
                }
                None
            }
        };
        NewLetter {
            content: self.content.trim().to_string(),
            nickname,
            category,
        }
    }
}

/// Home page with the most recent letters
pub async fn home_page(State(state): State<ServerState>) -> Html<String> {
    let base = state.base_path();
    let preview_chars = state.config.letters.preview_chars;
    let recent = state.letters.recent(state.config.letters.recent_limit);

    let mut cards = String::new();
    for letter in &recent {
        let _ = write!(
            cards,
            r#"<div class="letter-card"><div class="handwriting">"{}..."</div><div class="meta">{}<span>{}</span></div></div>"#,
            escape_html(letter.excerpt(preview_chars)),
            category_badge(letter),
            escape_html(&format_date(&letter.created_at)),
        );
    }

    let body = format!(
        r#"<main>
<h1>Dear Failure</h1>
<p class="lead">Write a letter to the moments that made you grow. Share your journey of resilience, learning, and transformation.</p>
<p style="text-align:center"><a class="button" href="{write}">Write a Letter</a> <a class="button" href="{letters}">Read Letters</a></p>
<blockquote class="lead"><em>"Every failure is a stepping stone to success. Every setback is a setup for a comeback."</em><br>- Anonymous</blockquote>
<h2>Recent Letters</h2>
<div class="grid">{cards}</div>
<p style="text-align:center"><a class="link" href="{letters}">Read more heartfelt letters</a></p>
</main>"#,
        write = href(&base, "/write"),
        letters = href(&base, "/letters"),
        cards = cards,
    );

    Html(layout("Dear Failure", &base, &body))
}

/// Archive of all letters with category filter and shuffle
pub async fn letters_page(
    State(state): State<ServerState>,
    Query(query): Query<ArchiveQuery>,
) -> Html<String> {
    let base = state.base_path();
    let selected = query.category.as_deref().filter(|c| !c.is_empty());
    let letters = state.archive_letters(selected, query.shuffle, None);
    let now = Utc::now();

    let mut body = format!("<main>\n{}\n<h1>Letters Archive</h1>\n", back_link(&base));
    body.push_str(
        r#"<p class="lead">Read heartfelt letters from people who have found strength in their failures.</p>"#,
    );

    if query.submitted {
        body.push_str(
            r#"<p class="notice">Your letter has been submitted! Thank you for sharing your story.</p>"#,
        );
    }

    let _ = write!(
        body,
        r#"<form class="filters" method="get" action="{action}">
<select name="category">{options}</select>
<button class="button" type="submit">Filter</button>
<a class="button" href="{shuffle}">Shuffle</a>
</form>"#,
        action = href(&base, "/letters"),
        options = category_options(selected, "All Categories"),
        shuffle = href(&base, "/letters?shuffle=true"),
    );

    if letters.is_empty() {
        let message = match selected {
            Some(category) => format!("No letters in the {} category yet.", escape_html(category)),
            None => "Be the first to share your story.".to_string(),
        };
        let _ = write!(
            body,
            r#"<div style="text-align:center"><h2>No letters found</h2><p>{}</p><a class="button" href="{}">Write the First Letter</a></div>"#,
            message,
            href(&base, "/write"),
        );
    } else {
        body.push_str(r#"<div class="grid">"#);
        for letter in &letters {
            body.push_str(&letter_card(letter, now));
        }
        body.push_str("</div>");
        let _ = write!(
            body,
            r#"<div class="panel"><h3>Inspired by these stories?</h3><p>Share your own journey of growth and resilience.</p><a class="button" href="{}">Write Your Letter</a></div>"#,
            href(&base, "/write"),
        );
    }
    body.push_str("\n</main>");

    Html(layout("Letters Archive - Dear Failure", &base, &body))
}

/// Empty write form
pub async fn write_page(State(state): State<ServerState>) -> Html<String> {
    let base = state.base_path();
    Html(write_form(&base, &WriteForm::default(), None))
}

/// Handle a write form submission
pub async fn submit_letter(
    State(state): State<ServerState>,
    Form(form): Form<WriteForm>,
) -> Response {
    let base = state.base_path();

    if let Err(e) = validate_content(&form.content) {
        return rejected(&base, &form, e);
    }

    match state.letters.add(form.to_new_letter()) {
        Ok(_) => Redirect::to(&href(&base, "/letters?submitted=true")).into_response(),
        Err(e) => rejected(&base, &form, e),
    }
}

fn rejected(base: &str, form: &WriteForm, error: LetterError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(write_form(base, form, Some(&error.to_string()))),
    )
        .into_response()
}

fn write_form(base: &str, form: &WriteForm, error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();
    let selected = Some(form.category.as_str()).filter(|c| !c.is_empty());

    let body = format!(
        r#"<main>
{back}
<h1>Write Your Letter</h1>
<p class="lead">Share your story of growth, resilience, and transformation. Your words may inspire someone else on their journey.</p>
{error_html}
<form method="post" action="{action}">
<label for="content">Your Letter *</label>
<textarea id="content" name="content" placeholder="Dear [your failure], thank you for teaching me..." required>{content}</textarea>
<label for="nickname">Nickname (Optional)</label>
<input type="text" id="nickname" name="nickname" value="{nickname}" placeholder="How would you like to sign your letter?">
<label for="category">Category (Optional)</label>
<select id="category" name="category">{options}</select>
<p><button class="button" type="submit">Send Letter</button></p>
</form>
<div class="panel"><h3>Need inspiration?</h3><p>Think about a moment when you felt like you failed, but looking back, it taught you something valuable. What would you say to that version of yourself?</p></div>
</main>"#,
        back = back_link(base),
        error_html = error_html,
        action = href(base, "/write"),
        content = escape_html(&form.content),
        nickname = escape_html(&form.nickname),
        options = category_options(selected, "Select a category"),
    );

    layout("Write a Letter - Dear Failure", base, &body)
}

fn layout(title: &str, base: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="Write a letter to the moments that made you grow. An anonymous letter archive celebrating failure as growth.">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<nav><a href="{home}"><strong>Dear Failure</strong></a><span><a href="{letters}">Read Letters</a><a href="{write}">Write Letter</a></span></nav>
{body}
<footer>A safe space to honor your journey through failure and growth.</footer>
</body>
</html>"#,
        title = escape_html(title),
        style = STYLE,
        home = href(base, "/"),
        letters = href(base, "/letters"),
        write = href(base, "/write"),
        body = body,
    )
}

fn back_link(base: &str) -> String {
    format!(r#"<p><a class="link" href="{}">&larr; Back to Home</a></p>"#, href(base, "/"))
}

fn letter_card(letter: &Letter, now: DateTime<Utc>) -> String {
    let nickname = letter
        .nickname
        .as_deref()
        .map(|n| format!("<span>&hearts; {}</span>", escape_html(n)))
        .unwrap_or_default();
    format!(
        r#"<div class="letter-card"><div class="handwriting">{}</div><div class="meta"><span>{}{}</span><span>{}</span></div></div>"#,
        escape_html(&letter.content),
        category_badge(letter),
        nickname,
        escape_html(&format_relative_date(&letter.created_at, now)),
    )
}

fn category_badge(letter: &Letter) -> String {
    letter
        .category
        .as_deref()
        .map(|c| format!(r#"<span class="badge">{}</span> "#, escape_html(c)))
        .unwrap_or_default()
}

fn category_options(selected: Option<&str>, blank_label: &str) -> String {
    let mut options = format!(r#"<option value="">{}</option>"#, escape_html(blank_label));
    for category in Category::ALL {
        let label = category.as_str();
        let marker = if selected == Some(label) { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape_html(label),
            marker
        );
    }
    options
}

/// Link to `path` under the mount prefix
pub fn href(base: &str, path: &str) -> String {
    if path == "/" && !base.is_empty() {
        base.to_string()
    } else {
        format!("{}{}", base, path)
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `YYYY-MM-DD`, or the raw value when it is not a timestamp
pub fn format_date(created_at: &str) -> String {
    parse_timestamp(created_at)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| created_at.to_string())
}

/// Human-friendly age of a letter relative to `now`
pub fn format_relative_date(created_at: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_timestamp(created_at) else {
        return created_at.to_string();
    };

    let days = (now - at).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", (d + 6) / 7),
        _ => at.format("%Y-%m-%d").to_string(),
    }
}
