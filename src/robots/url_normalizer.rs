use crate::robots::PolicyError;
use url::Url;

/// Origin used to resolve bare paths. Never reported as a host.
const PLACEHOLDER_ORIGIN: &str = "http://robots.invalid/";

/// A path or URL reduced to the canonical form rules and queries are matched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    path: String,
    host: String,
    full: String,
}

impl NormalizedUrl {
    /// Normalizes `raw`, which may be a bare path or an absolute URL.
    ///
    /// The fragment is dropped, percent-escapes are canonicalized and the
    /// query (if any) is kept on the path. `*` and `$` are left alone so
    /// rule patterns can go through the same routine.
    pub fn parse(raw: &str) -> Self {
        let collapsed = collapse_leading_slashes(raw);

        let absolute = Url::parse(&collapsed).ok().filter(|url| url.has_host());
        let is_absolute = absolute.is_some();
        let resolved = absolute.or_else(|| {
            Url::parse(PLACEHOLDER_ORIGIN)
                .ok()
                .and_then(|base| base.join(&collapsed).ok())
        });

        let Some(mut url) = resolved else {
            // Unresolvable input is matched as written.
            let path = canonicalize_escapes(strip_fragment(&collapsed));
            return Self {
                full: path.clone(),
                path,
                host: String::new(),
            };
        };
        url.set_fragment(None);

        let mut path = canonicalize_escapes(url.path());
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(&canonicalize_escapes(query));
        }

        if !is_absolute {
            return Self {
                full: path.clone(),
                path,
                host: String::new(),
            };
        }

        let host = url.host_str().unwrap_or_default().to_owned();
        let full = match url.port() {
            Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, path),
            None => format!("{}://{}{}", url.scheme(), host, path),
        };
        Self { path, host, full }
    }

    /// The candidate path, including `;params` and `?query`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The lower-cased host, or an empty string for bare paths.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn is_absolute(&self) -> bool {
        !self.host.is_empty()
    }
}

/// Returns the conventional policy document location for the site serving `url`.
pub fn robots_url(url: &str) -> Result<String, PolicyError> {
    let mut robots_txt_url = Url::parse(url)?;
    if !robots_txt_url.has_host() {
        return Err(PolicyError::MissingHost(url.to_owned()));
    }
    robots_txt_url.set_path("/robots.txt");
    robots_txt_url.set_query(None);
    robots_txt_url.set_fragment(None);
    // Both only fail for URLs that cannot carry credentials, which have none to strip.
    let _ = robots_txt_url.set_username("");
    let _ = robots_txt_url.set_password(None);
    Ok(robots_txt_url.to_string())
}

/// Treats `//a/b` as the path `/a/b` rather than a network-path reference.
fn collapse_leading_slashes(raw: &str) -> String {
    if raw.len() > 1 && raw.starts_with('/') {
        format!("/{}", raw.trim_start_matches('/'))
    } else {
        raw.to_owned()
    }
}

fn strip_fragment(raw: &str) -> &str {
    raw.split_once('#').map_or(raw, |(before, _)| before)
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodes escaped unreserved characters and upper-cases every other escape.
fn canonicalize_escapes(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut output: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte == b'%' && index + 2 < bytes.len() {
            let decoded = hex_value(bytes[index + 1])
                .zip(hex_value(bytes[index + 2]))
                .map(|(high, low)| high * 16 + low);
            if let Some(decoded) = decoded {
                if is_unreserved(decoded) {
                    output.push(decoded);
                } else {
                    output.push(b'%');
                    output.extend(format!("{decoded:02X}").bytes());
                }
                index += 3;
                continue;
            }
        }
        output.push(byte);
        index += 1;
    }
    String::from_utf8(output)
        .unwrap_or_else(|error| String::from_utf8_lossy(error.as_bytes()).into_owned())
}
