use crate::models::LinkStats;
use std::collections::HashSet;
use url::{ParseError, Url};

/// Parses a raw `href` literal.
///
/// Absolute literals are parsed as they are; relative references are resolved
/// against the page origin. Returns `None` for literals that are not valid
/// URL references at all.
pub fn parse_link(origin: &Url, raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(ParseError::RelativeUrlWithoutBase) => origin.join(raw).ok(),
        Err(_) => None,
    }
}

/// Checks if a parsed link points at the page origin.
///
/// Host-less URLs (`mailto:`, `javascript:` ...) and fragment-only literals
/// count as internal. Hosts are compared with the port as written, so
/// `http://x.com:80/` is not the same authority as `http://x.com/`.
pub fn is_internal(origin: &Url, raw: &str, link: &Url) -> bool {
    raw.starts_with('#')
        || link.host_str().is_none()
        || (link.host_str() == origin.host_str() && written_port(raw, link) == origin.port())
}

/// Port of `link` including a default port spelled out in the literal
fn written_port(raw: &str, link: &Url) -> Option<u16> {
    if has_explicit_port(raw) {
        link.port_or_known_default()
    } else {
        link.port()
    }
}

fn has_explicit_port(raw: &str) -> bool {
    let rest = match raw.strip_prefix("//") {
        Some(rest) => rest,
        None => match raw.split_once("://") {
            Some((scheme, rest)) if !scheme.contains(['/', '?', '#']) => rest,
            _ => return false,
        },
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    // Skip past an IPv6 literal before looking for the port separator
    let tail = host_port.rsplit_once(']').map_or(host_port, |(_, tail)| tail);

    tail.split_once(':').is_some_and(|(_, port)| !port.is_empty())
}

/// Counts internal and external links over every raw occurrence
pub fn compute_stats(origin: &Url, links: &[String]) -> LinkStats {
    let mut stats = LinkStats::default();

    for raw in links {
        let Some(link) = parse_link(origin, raw) else {
            tracing::debug!(link = %raw, "Skipping unparseable link");
            continue;
        };

        if is_internal(origin, raw, &link) {
            stats.internal += 1;
        } else {
            stats.external += 1;
        }
    }

    stats
}

/// Deduplicates raw links by literal value and makes root-relative ones absolute.
///
/// First occurrence wins and order is preserved. Literals that `compute_stats`
/// skips are dropped here as well.
pub fn normalize(origin: &Url, links: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(links.len());
    let mut normalized = Vec::with_capacity(links.len());

    for raw in links {
        if !seen.insert(raw.as_str()) {
            continue;
        }

        if parse_link(origin, raw).is_none() {
            continue;
        }

        if raw.starts_with("//") {
            normalized.push(format!("{}:{}", origin.scheme(), raw));
        } else if raw.starts_with('/') {
            normalized.push(format!("{}{}", origin_prefix(origin), raw));
        } else {
            normalized.push(raw.clone());
        }
    }

    normalized
}

/// `scheme://host[:port]` of the origin
fn origin_prefix(origin: &Url) -> String {
    let host = origin.host_str().unwrap_or_default();
    match origin.port() {
        Some(port) => format!("{}://{}:{}", origin.scheme(), host, port),
        None => format!("{}://{}", origin.scheme(), host),
    }
}
