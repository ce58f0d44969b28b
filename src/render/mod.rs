//! Static HTML report pages.
//!
//! The scan and the join hand a single `ReportData` record to this
//! module; each page reads the parts it needs. Pages are written to the
//! output directory as `<name>.html` and passed to the publisher.

mod html;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{PrTable, Snapshot};
use crate::crossref::{CrossReference, CrossReferences};
use crate::error::Result;
use crate::forward::{Buckets, ForwardIndex, UserPulls};
use crate::publish::Publisher;
use html::{distinct, group_table, layout};

pub const CONTENT_TYPE: &str = "text/html";

/// Everything the pages are rendered from.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub index: ForwardIndex,
    pub users: Vec<UserPulls>,
    pub pulls: PrTable,
    pub ownership: CrossReferences,
}

impl ReportData {
    pub fn new(snapshot: Snapshot, ownership: CrossReferences) -> Self {
        ReportData {
            title: snapshot.settings.title,
            generated_at: Utc::now(),
            users: snapshot.index.ranked_users(),
            index: snapshot.index,
            pulls: snapshot.pulls,
            ownership,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    ByFile,
    ByDir,
    ByUser,
    ByMergeCommits,
    ByMaintainer,
    ByConflict,
    ByMultiAuthor,
    ByCiFailures,
    ByLabel,
    ByKeyword,
    BySupportLevel,
}

impl Page {
    pub const ALL: [Page; 12] = [
        Page::Index,
        Page::ByFile,
        Page::ByDir,
        Page::ByUser,
        Page::ByMergeCommits,
        Page::ByMaintainer,
        Page::ByConflict,
        Page::ByMultiAuthor,
        Page::ByCiFailures,
        Page::ByLabel,
        Page::ByKeyword,
        Page::BySupportLevel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::ByFile => "byfile",
            Page::ByDir => "bydir",
            Page::ByUser => "byuser",
            Page::ByMergeCommits => "bymergecommits",
            Page::ByMaintainer => "bymaintainer",
            Page::ByConflict => "byconflict",
            Page::ByMultiAuthor => "bymultiauthor",
            Page::ByCiFailures => "bycifailures",
            Page::ByLabel => "bylabel",
            Page::ByKeyword => "bykeyword",
            Page::BySupportLevel => "bysupportlevel",
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            Page::Index => "Overview",
            Page::ByFile => "Files",
            Page::ByDir => "Directories",
            Page::ByUser => "Users",
            Page::ByMergeCommits => "Merge commits",
            Page::ByMaintainer => "Maintainers",
            Page::ByConflict => "Conflicts",
            Page::ByMultiAuthor => "Multiple authors",
            Page::ByCiFailures => "CI failures",
            Page::ByLabel => "Labels",
            Page::ByKeyword => "Keywords",
            Page::BySupportLevel => "Support levels",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Page::Index => "Open pull requests",
            Page::ByFile => "Pull requests by file",
            Page::ByDir => "Pull requests by directory",
            Page::ByUser => "Pull requests by user",
            Page::ByMergeCommits => "Pull requests containing merge commits",
            Page::ByMaintainer => "Pull requests by maintainer",
            Page::ByConflict => "Pull requests with merge conflicts",
            Page::ByMultiAuthor => "Pull requests with multiple commit authors",
            Page::ByCiFailures => "Pull requests with failing CI",
            Page::ByLabel => "Pull requests by label",
            Page::ByKeyword => "Pull requests by keyword",
            Page::BySupportLevel => "Pull requests by support level",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.name())
    }
}

fn bucket_table(key_header: &str, buckets: &Buckets, pulls: &PrTable) -> String {
    group_table(
        key_header,
        buckets.iter().map(|(k, v)| (k.as_str(), v)),
        pulls,
    )
}

fn crossref(key_header: &str, refs: &CrossReference, pulls: &PrTable) -> String {
    group_table(key_header, refs.iter().map(|(k, v)| (k.as_str(), v)), pulls)
}

fn overview(data: &ReportData) -> String {
    let index = &data.index;
    let rows = [
        ("Open pull requests", data.pulls.len()),
        ("Authors", data.users.len()),
        ("Files touched", index.files.len()),
        ("Directories touched", index.dirs.len()),
        ("With merge commits", distinct(index.merges.values())),
        ("With conflicts", distinct(index.conflicts.values())),
        ("With failing CI", distinct(index.ci_failures.values())),
        ("With multiple authors", distinct(index.multi_author.values())),
    ];
    let mut body = String::from("<table>\n<tbody>\n");
    for (label, count) in rows {
        body.push_str(&format!("<tr><th>{label}</th><td>{count}</td></tr>\n"));
    }
    body.push_str("</tbody>\n</table>\n");
    body
}

/// Render one page to a complete HTML document.
pub fn render_page(page: Page, data: &ReportData) -> String {
    let pulls = &data.pulls;
    let index = &data.index;
    let body = match page {
        Page::Index => overview(data),
        Page::ByFile => bucket_table("File", &index.files, pulls),
        Page::ByDir => group_table(
            "Directory",
            index.dirs.iter().map(|(k, v)| {
                let key = if k.is_empty() { "(top level)" } else { k.as_str() };
                (key, v)
            }),
            pulls,
        ),
        Page::ByUser => group_table(
            "User",
            data.users.iter().map(|u| (u.login.as_str(), &u.pulls)),
            pulls,
        ),
        Page::ByMergeCommits => bucket_table("User", &index.merges, pulls),
        Page::ByMaintainer => crossref("Maintainer", &data.ownership.maintainer, pulls),
        Page::ByConflict => bucket_table("User", &index.conflicts, pulls),
        Page::ByMultiAuthor => bucket_table("User", &index.multi_author, pulls),
        Page::ByCiFailures => bucket_table("User", &index.ci_failures, pulls),
        Page::ByLabel => format!(
            "<h3>Labels from ownership metadata</h3>\n{}<h3>Labels on pull requests</h3>\n{}",
            crossref("Label", &data.ownership.label, pulls),
            bucket_table("Label", &index.labels, pulls)
        ),
        Page::ByKeyword => crossref("Keyword", &data.ownership.keyword, pulls),
        Page::BySupportLevel => crossref("Support level", &data.ownership.support_level, pulls),
    };
    layout(&data.title, page, &data.generated_at, &body)
}

/// Write every page into `out_dir` and hand each file to `publisher`.
pub fn write_reports(
    data: &ReportData,
    out_dir: &Path,
    publisher: &dyn Publisher,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(Page::ALL.len());
    for page in Page::ALL {
        let file_name = page.file_name();
        let path = out_dir.join(&file_name);
        log::info!("writing rendered html to {}", path.display());
        fs::write(&path, render_page(page, data))?;
        publisher.publish(&file_name, &path, CONTENT_TYPE)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
