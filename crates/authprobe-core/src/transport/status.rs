//! Parse HTTP status lines out of collected response header lines.

/// Status code and reason phrase from one status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusLine {
    pub code: u32,
    pub reason: String,
}

/// Returns the last status line among `lines`. With redirects followed,
/// libcurl reports every hop's headers; the final one is what counts.
pub(crate) fn final_status_line(lines: &[String]) -> Option<StatusLine> {
    lines.iter().rev().find_map(|l| parse_status_line(l))
}

fn parse_status_line(line: &str) -> Option<StatusLine> {
    let line = line.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next()?;
    let code = parts.next()?.trim().parse::<u32>().ok()?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some(StatusLine { code, reason })
}
