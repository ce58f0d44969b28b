//! Long help text constants for the CLI.

/// Top-level description shown by `triage --help`.
pub const TRIAGE: &str = "\
Build a static triage dashboard for the open pull requests of one or more
GitHub repositories.

Every open PR is fetched with its files, commits and mergeability, grouped
by file, directory, author and state (merge commits, conflicts, failing
CI, multiple commit authors), then joined with the ownership manifest
(botmeta_path) to list PRs by maintainer, label, keyword and support level.
One HTML page per grouping is written to output_path and, when upload is
enabled, copied to object storage.

Progress is saved to data_path every snapshot_every PRs, so an interrupted
scan keeps most of its work on disk.

Configuration is read from --config, or the first of ./triage.yaml,
~/.triage.yaml and /etc/triage.yaml. GITHUB_TOKEN is used when the file
has no github_token. RUST_LOG overrides the log level.";

/// Long help for `--only-cached`.
pub const ONLY_CACHED: &str = "\
Render from the cached snapshot in data_path without contacting GitHub.

Fails when no snapshot exists. A snapshot written by an interrupted scan
is used as-is, with a warning that it is incomplete.";
