//! Windows `tasklist` CSV finder.

use procwatch_core::ProcessId;

/// Find the first process matching `target` in `tasklist /FO CSV /NH` output.
///
/// Each well-formed row begins with a quoted image-name/pid pair:
/// `"<imageName>","<pid>",...`. Rows that do not start with that shape
/// (headers, blank lines, truncated rows) are skipped. The image name is
/// compared case-insensitively and exactly; the first matching row whose pid
/// parses wins.
///
/// Total over arbitrary text: garbage input yields `None`, never an error.
pub fn find_in_listing(output: &str, target: &str) -> Option<ProcessId> {
    for row in output.lines() {
        let Some((image_name, pid_field)) = leading_quoted_pair(row) else {
            continue;
        };

        if !image_name.eq_ignore_ascii_case(target) {
            continue;
        }

        if let Ok(pid) = pid_field.parse::<ProcessId>() {
            return Some(pid);
        }
    }

    None
}

/// Extract the two leading quoted fields of a CSV row, `"a","b"...` -> (a, b).
fn leading_quoted_pair(row: &str) -> Option<(&str, &str)> {
    let rest = row.strip_prefix('"')?;
    let (first, rest) = rest.split_once('"')?;
    let rest = rest.strip_prefix(",\"")?;
    let (second, _) = rest.split_once('"')?;
    Some((first, second))
}
