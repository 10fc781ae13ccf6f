use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
    pub version: Option<String>,
}

/// Parses the object URLs packaging writes into templates:
/// `s3://bucket/key?versionId=v` and path-style or virtual-hosted
/// `https://...amazonaws.com/...` URLs. Returns `None` for anything else
/// (local paths, unresolved intrinsics, other hosts).
pub fn parse_s3_url(value: &str) -> Option<S3Location> {
    if let Some(rest) = value.strip_prefix("s3://") {
        return parse_s3_scheme(rest);
    }
    if value.starts_with("https://") || value.starts_with("http://") {
        return parse_http_url(value);
    }
    None
}

fn parse_s3_scheme(rest: &str) -> Option<S3Location> {
    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    let (bucket, key) = location.split_once('/')?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }

    let version = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(name, _)| name == "versionId")
            .map(|(_, v)| v.into_owned())
    });

    Some(S3Location {
        bucket: bucket.to_string(),
        key: key.to_string(),
        version,
    })
}

fn parse_http_url(value: &str) -> Option<S3Location> {
    let url = Url::parse(value).ok()?;
    let host = url.host_str()?;
    let host = host
        .strip_suffix(".amazonaws.com")
        .or_else(|| host.strip_suffix(".amazonaws.com.cn"))?;
    let path = url.path().trim_start_matches('/');

    let (bucket, key) = if host == "s3" || host.starts_with("s3.") || host.starts_with("s3-") {
        // Path style: https://s3.<region>.amazonaws.com/<bucket>/<key>
        let (bucket, key) = path.split_once('/')?;
        (bucket.to_string(), key.to_string())
    } else {
        // Virtual hosted: https://<bucket>.s3.<region>.amazonaws.com/<key>
        let bucket = host
            .split_once(".s3.")
            .or_else(|| host.split_once(".s3-"))
            .map(|(bucket, _)| bucket)
            .or_else(|| host.strip_suffix(".s3"))?;
        (bucket.to_string(), path.to_string())
    };

    if bucket.is_empty() || key.is_empty() {
        return None;
    }

    let version = url
        .query_pairs()
        .find(|(name, _)| name == "versionId")
        .map(|(_, v)| v.into_owned());

    Some(S3Location {
        bucket,
        key,
        version,
    })
}
