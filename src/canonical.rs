//! Canonical-request assembly for both header-based signing and presigned
//! query-string signing.
//!
//! The signed-header set for header mode is the 2×2×2 cross product of
//! `{acl?, contentDisposition?, sessionToken?}`, always including `host`,
//! `x-amz-content-sha256` and `x-amz-date`. Headers are emitted in
//! lexicographic order by name; that happens to coincide with insertion
//! order for every one of the eight combinations, since `content-disposition`
//! sorts before `host`, which sorts before every `x-amz-*` name.

use crate::path::percent_encode;
use crate::types::Method;

pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// One canonical header: lowercase name plus raw (pre-canonicalization)
/// value.
#[derive(Debug, Clone)]
pub struct HeaderEntry {
    pub name: &'static str,
    pub value: String,
}

/// Build the sorted list of canonical headers for header-mode signing.
pub fn header_mode_headers(
    host: &str,
    content_hash: &str,
    amz_date: &str,
    acl: Option<&str>,
    content_disposition: Option<&str>,
    session_token: Option<&str>,
) -> Vec<HeaderEntry> {
    let mut headers = vec![
        HeaderEntry { name: "host", value: host.to_owned() },
        HeaderEntry { name: "x-amz-content-sha256", value: content_hash.to_owned() },
        HeaderEntry { name: "x-amz-date", value: amz_date.to_owned() },
    ];

    if let Some(acl) = acl {
        headers.push(HeaderEntry { name: "x-amz-acl", value: acl.to_owned() });
    }
    if let Some(cd) = content_disposition {
        headers.push(HeaderEntry {
            name: "content-disposition",
            value: cd.to_owned(),
        });
    }
    if let Some(token) = session_token {
        headers.push(HeaderEntry {
            name: "x-amz-security-token",
            value: token.to_owned(),
        });
    }

    headers.sort_by(|a, b| a.name.cmp(b.name));
    headers
}

/// Assemble the canonical request for header-based signing and return it
/// alongside the `;`-joined signed-headers list.
pub fn header_mode_canonical_request(
    method: Method,
    canonical_uri: &str,
    search_params: &str,
    headers: &[HeaderEntry],
    content_hash: &str,
) -> (String, String) {
    let mut canonical_headers = String::new();
    let mut signed_headers = String::new();

    for (i, header) in headers.iter().enumerate() {
        canonical_headers.push_str(header.name);
        canonical_headers.push(':');
        canonical_headers.push_str(header.value.trim());
        canonical_headers.push('\n');

        if i > 0 {
            signed_headers.push(';');
        }
        signed_headers.push_str(header.name);
    }

    // `canonical_headers` already ends in `\n` after the last header; one
    // more `\n` produces the required blank line before SignedHeaders.
    let canonical_request = format!(
        "{method}\n{uri}\n{query}\n{headers}\n{signed}\n{payload}",
        method = method.as_str(),
        uri = canonical_uri,
        query = search_params,
        headers = canonical_headers,
        signed = signed_headers,
        payload = content_hash,
    );

    (canonical_request, signed_headers)
}

/// Query-string parameters for presigned-URL signing, in the exact order
/// the wire format requires: `X-Amz-Acl?, X-Amz-Algorithm, X-Amz-Credential,
/// X-Amz-Date, X-Amz-Expires, X-Amz-Security-Token?, X-Amz-SignedHeaders`.
pub fn query_mode_params(
    acl: Option<&str>,
    credential: &str,
    amz_date: &str,
    expires: u64,
    session_token: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(7);
    if let Some(acl) = acl {
        params.push(("X-Amz-Acl", acl.to_owned()));
    }
    params.push(("X-Amz-Algorithm", "AWS4-HMAC-SHA256".to_owned()));
    params.push(("X-Amz-Credential", credential.to_owned()));
    params.push(("X-Amz-Date", amz_date.to_owned()));
    params.push(("X-Amz-Expires", expires.to_string()));
    if let Some(token) = session_token {
        params.push(("X-Amz-Security-Token", token.to_owned()));
    }
    params.push(("X-Amz-SignedHeaders", "host".to_owned()));
    params
}

/// Assemble the canonical request for presigned-URL signing: the only
/// canonical header is `host`, payload is always `UNSIGNED-PAYLOAD`.
pub fn query_mode_canonical_request(
    method: Method,
    canonical_uri: &str,
    params: &[(&'static str, String)],
    host: &str,
) -> String {
    let query_string = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, percent_encode(value, false)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{method}\n{uri}\n{query}\nhost:{host}\n\nhost\n{payload}",
        method = method.as_str(),
        uri = canonical_uri,
        query = query_string,
        host = host,
        payload = UNSIGNED_PAYLOAD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_header_lexicographic_order_matches_all_eight_combinations() {
        let none = header_mode_headers("h", "hash", "date", None, None, None);
        assert_eq!(
            none.iter().map(|e| e.name).collect::<Vec<_>>(),
            vec!["host", "x-amz-content-sha256", "x-amz-date"]
        );

        let all = header_mode_headers("h", "hash", "date", Some("private"), Some("x"), Some("tok"));
        assert_eq!(
            all.iter().map(|e| e.name).collect::<Vec<_>>(),
            vec![
                "content-disposition",
                "host",
                "x-amz-acl",
                "x-amz-content-sha256",
                "x-amz-date",
                "x-amz-security-token",
            ]
        );
    }

    #[test]
    fn query_mode_params_are_in_wire_order() {
        let params = query_mode_params(None, "AKID/20130524/us-east-1/s3/aws4_request", "20130524T000000Z", 3600, None);
        let names: Vec<_> = params.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "X-Amz-Algorithm",
                "X-Amz-Credential",
                "X-Amz-Date",
                "X-Amz-Expires",
                "X-Amz-SignedHeaders",
            ]
        );
    }
}
