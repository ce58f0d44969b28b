//! HTML building blocks shared by every page.

use std::collections::BTreeSet;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::Page;
use crate::cache::PrTable;

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn nav(current: Page) -> String {
    let mut out = String::from("<nav><ul>\n");
    for page in Page::ALL {
        let class = if page == current { "active" } else { "" };
        let _ = writeln!(
            out,
            "<li class=\"{class}\"><a href=\"{}.html\">{}</a></li>",
            page.name(),
            page.nav_label()
        );
    }
    out.push_str("</ul></nav>\n");
    out
}

/// Wrap a page body in the shared document layout.
pub fn layout(title: &str, page: Page, generated_at: &DateTime<Utc>, body: &str) -> String {
    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - {heading}</title>\n</head>\n<body>\n{nav}<h1>{title}</h1>\n\
         <h2>{heading}</h2>\n{body}<footer>Generated {now} UTC</footer>\n</body>\n</html>\n",
        heading = page.heading(),
        nav = nav(page),
        now = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Link to a pull request, falling back to its API URL when it is not in
/// the table.
pub fn pr_link(pulls: &PrTable, url: &str) -> String {
    match pulls.get(url) {
        Some(pr) => format!(
            "<a href=\"{}\" title=\"{}\">{}#{}</a>",
            escape(&pr.html_url),
            escape(&pr.title),
            escape(&pr.repo),
            pr.number
        ),
        None => format!("<a href=\"{0}\">{0}</a>", escape(url)),
    }
}

/// A two-column table: group key, then links to every PR in the group.
pub fn group_table<'a, I, P>(key_header: &str, groups: I, pulls: &PrTable) -> String
where
    I: IntoIterator<Item = (&'a str, P)>,
    P: IntoIterator<Item = &'a String>,
{
    let mut rows = String::new();
    for (key, urls) in groups {
        let links: Vec<String> = urls.into_iter().map(|u| pr_link(pulls, u)).collect();
        if links.is_empty() {
            continue;
        }
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(key),
            links.len(),
            links.join(" ")
        );
    }
    if rows.is_empty() {
        return "<p>Nothing to report.</p>\n".to_string();
    }
    format!(
        "<table>\n<thead><tr><th>{}</th><th>PRs</th><th>Pull requests</th></tr></thead>\n\
         <tbody>\n{rows}</tbody>\n</table>\n",
        escape(key_header)
    )
}

/// Count PRs across groups without double counting.
pub fn distinct<'a>(groups: impl IntoIterator<Item = &'a Vec<String>>) -> usize {
    groups.into_iter().flatten().collect::<BTreeSet<_>>().len()
}
