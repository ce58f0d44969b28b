//! Console summary printed after the pages are written.

use std::path::Path;

use crate::forward::Buckets;
use crate::render::ReportData;
use crate::report_helpers::{max_width, pad, separator};

const TOP: usize = 10;

/// Files touched by the most open PRs, most first; ties by path.
pub fn busiest_files(data: &ReportData, top: usize) -> Vec<(&str, usize)> {
    let mut files: Vec<(&str, usize)> = data
        .index
        .files
        .iter()
        .map(|(path, pulls)| (path.as_str(), pulls.len()))
        .collect();
    files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    files.truncate(top);
    files
}

fn print_ranking(heading: &str, key: &str, rows: &[(&str, usize)]) {
    if rows.is_empty() {
        return;
    }
    let kw = max_width(rows.iter().map(|(k, _)| *k), key.len());
    let sep = separator((kw + 8).max(40));
    println!();
    println!("{heading}");
    println!("{sep}");
    println!(" {}  {:>5}", pad(key, kw), "PRs");
    println!("{sep}");
    for (name, count) in rows {
        println!(" {}  {count:>5}", pad(name, kw));
    }
    println!("{sep}");
}

pub fn print_summary(data: &ReportData, out_dir: &Path) {
    let index = &data.index;
    let sep = separator(40);
    println!("{}", data.title);
    println!("{sep}");
    let flagged = |buckets: &Buckets| buckets.values().map(Vec::len).sum::<usize>();
    let rows = [
        ("Open pull requests", data.pulls.len()),
        ("Authors", data.users.len()),
        ("Files touched", index.files.len()),
        ("Conflicts", flagged(&index.conflicts)),
        ("CI failures", flagged(&index.ci_failures)),
        ("Merge commits", flagged(&index.merges)),
        ("Multiple authors", flagged(&index.multi_author)),
    ];
    for (label, count) in rows {
        println!(" {label:<28}{count:>10}");
    }
    println!("{sep}");

    let users: Vec<(&str, usize)> = data
        .users
        .iter()
        .take(TOP)
        .map(|u| (u.login.as_str(), u.pulls.len()))
        .collect();
    print_ranking("Top authors", "User", &users);
    print_ranking("Busiest files", "File", &busiest_files(data, TOP));

    println!();
    println!("Reports written to {}", out_dir.display());
}
