//! URL decomposition for building traffic records
//!
//! These functions avoid allocations and work directly on string slices.

// =============================================================================
// Scheme Extraction
// =============================================================================

/// Get the position after "://" (or after ":" for data URLs).
#[inline]
pub fn get_scheme_end(url: &str) -> Option<usize> {
    let bytes = url.as_bytes();

    let colon_pos = bytes.iter().position(|&b| b == b':')?;
    if colon_pos == 0 || !bytes[..colon_pos].iter().all(is_scheme_byte) {
        return None;
    }

    if bytes.len() > colon_pos + 2
        && bytes[colon_pos + 1] == b'/'
        && bytes[colon_pos + 2] == b'/'
    {
        return Some(colon_pos + 3);
    }

    // Data URLs use ":" not "://"
    if bytes[..colon_pos].eq_ignore_ascii_case(b"data") {
        return Some(colon_pos + 1);
    }

    None
}

#[inline]
fn is_scheme_byte(b: &u8) -> bool {
    b.is_ascii_alphanumeric() || *b == b'+' || *b == b'-' || *b == b'.'
}

/// Scheme of a URL, without the trailing ':'.
#[inline]
pub fn extract_scheme(url: &str) -> Option<&str> {
    get_scheme_end(url)?;
    url.find(':').map(|pos| &url[..pos])
}

// =============================================================================
// Host Extraction
// =============================================================================

/// Get the start and end positions of the hostname in a URL.
///
/// Userinfo and port are excluded.
#[inline]
pub fn get_host_position(url: &str) -> Option<(usize, usize)> {
    let scheme_end = get_scheme_end(url)?;
    let bytes = url.as_bytes();

    // Skip userinfo
    let mut host_start = scheme_end;
    for (i, &b) in bytes.iter().enumerate().skip(scheme_end) {
        if b == b'@' {
            host_start = i + 1;
            break;
        }
        if b == b'/' || b == b'?' || b == b'#' {
            break;
        }
    }

    let mut host_end = bytes.len();
    // Bracketed IPv6 literals keep their colons
    if bytes.get(host_start) == Some(&b'[') {
        if let Some(close) = bytes[host_start..].iter().position(|&b| b == b']') {
            return Some((host_start, host_start + close + 1));
        }
    }
    for (i, &b) in bytes.iter().enumerate().skip(host_start) {
        if b == b'/' || b == b'?' || b == b'#' || b == b':' {
            host_end = i;
            break;
        }
    }

    Some((host_start, host_end))
}

/// Fast host extraction without allocations.
/// Returns a slice into the original URL.
#[inline]
pub fn extract_host(url: &str) -> Option<&str> {
    let (host_start, host_end) = get_host_position(url)?;
    Some(&url[host_start..host_end])
}

// =============================================================================
// Path and Query Extraction
// =============================================================================

/// Extract the path portion of a URL.
#[inline]
pub fn extract_path(url: &str) -> &str {
    let scheme_end = match get_scheme_end(url) {
        Some(pos) => pos,
        None => return "/",
    };

    let bytes = url.as_bytes();

    // authority ends at the first '/', or the URL has no path
    let mut path_start = None;
    for (i, &b) in bytes[scheme_end..].iter().enumerate() {
        if b == b'/' {
            path_start = Some(scheme_end + i);
            break;
        }
        if b == b'?' || b == b'#' {
            return "/";
        }
    }

    let path_start = match path_start {
        Some(pos) => pos,
        None => return "/",
    };

    let mut path_end = bytes.len();
    for (i, &b) in bytes[path_start..].iter().enumerate() {
        if b == b'?' || b == b'#' {
            path_end = path_start + i;
            break;
        }
    }

    &url[path_start..path_end]
}

/// Extract the query string of a URL, without the leading '?' and
/// without any fragment.
#[inline]
pub fn extract_query(url: &str) -> &str {
    let fragment_start = url.find('#').unwrap_or(url.len());
    let before_fragment = &url[..fragment_start];
    match before_fragment.find('?') {
        Some(pos) => &before_fragment[pos + 1..],
        None => "",
    }
}
