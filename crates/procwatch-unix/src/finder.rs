//! POSIX process-listing finder.

use procwatch_core::ProcessId;

/// Find the first process matching `target` in `ps -axo pid=,comm=` output.
///
/// Rows are whitespace-trimmed `<pid> <command path>` pairs; the path may
/// itself contain whitespace, so rows split into at most two fields. A row
/// matches when the path's basename equals `target` case-insensitively, or
/// when the full path contains `target` as a case-insensitive substring
/// (covers bundle paths whose basename carries embedded identifiers).
///
/// Total over arbitrary text: blank, malformed, and unparseable rows are
/// skipped, so garbage input yields `None` rather than an error.
pub fn find_in_listing(output: &str, target: &str) -> Option<ProcessId> {
    let target_lower = target.to_lowercase();

    for row in output.lines() {
        let row = row.trim();
        if row.is_empty() {
            continue;
        }

        let mut fields = row.splitn(2, char::is_whitespace);
        let pid_field = fields.next().unwrap_or_default();
        let command_path = fields.next().unwrap_or_default().trim();

        let command_name = command_path.rsplit('/').next().unwrap_or_default();
        let matches = command_name.eq_ignore_ascii_case(target)
            || command_path.to_lowercase().contains(&target_lower);
        if !matches {
            continue;
        }

        if let Ok(pid) = pid_field.parse::<ProcessId>() {
            return Some(pid);
        }
    }

    None
}
