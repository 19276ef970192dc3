use url::Url;

const DRIVE_HOST: &str = "drive.google.com";

/// Rewrite a Google Drive share link into its direct-view form so it can be
/// used as an `<img>` source. Other URLs are returned unchanged.
///
/// Recognized shapes:
/// * `https://drive.google.com/file/d/<ID>/view?...`
/// * `https://drive.google.com/open?id=<ID>`
/// * `https://drive.google.com/uc?id=<ID>&export=download`
pub fn rewrite_drive_link(raw: &str) -> String {
    match drive_file_id(raw) {
        Some(id) => format!("https://{DRIVE_HOST}/uc?export=view&id={id}"),
        None => raw.to_string(),
    }
}

fn drive_file_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if url.host_str()? != DRIVE_HOST {
        return None;
    }

    let mut segments = url.path_segments()?;
    let id = match segments.next()? {
        "file" => {
            if segments.next()? != "d" {
                return None;
            }
            segments.next()?.to_string()
        }
        "open" | "uc" => url
            .query_pairs()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.into_owned())?,
        _ => return None,
    };

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

/// Whether `raw` is acceptable as a link stored in content: an absolute
/// http(s) URL with a host, or a path into the local media bucket.
pub fn is_acceptable_link(raw: &str) -> bool {
    if raw.starts_with("/media/") {
        return !raw.contains("..");
    }
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Last non-empty path segment of an absolute URL or a site-relative path.
pub fn last_path_segment(raw: &str) -> Option<String> {
    let path = match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    path.rsplit('/')
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}
