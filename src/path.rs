//! RFC 3986 percent-encoding with a slash-preserve mode, and bucket/key
//! resolution from a logical path.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

use crate::error::S3Error;

const MAX_ENCODED_BUCKET_LEN: usize = 63;
const MAX_ENCODED_KEY_LEN: usize = 1024;

/// `'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~'` are the only bytes SigV4
/// leaves unescaped; everything else, including `/`, is percent-encoded
/// under this set.
const UNRESERVED: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a path segment. When `preserve_slash` is set, `/` passes
/// through unescaped (used for the canonical URI and presigned-URL path);
/// otherwise it is escaped as `%2F` (used for query-string values and
/// `Content-Disposition`).
pub fn percent_encode(input: &str, preserve_slash: bool) -> String {
    if preserve_slash {
        input
            .split('/')
            .map(|segment| percent_encoding::percent_encode(segment.as_bytes(), &UNRESERVED).to_string())
            .collect::<Vec<_>>()
            .join("/")
    } else {
        percent_encoding::percent_encode(input.as_bytes(), &UNRESERVED).to_string()
    }
}

/// Resolved bucket and key, along with their percent-encoded forms.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub bucket: String,
    pub key: String,
    pub encoded_bucket: String,
    pub encoded_key: String,
}

impl ResolvedPath {
    /// The canonical URI used by both the canonical request and the
    /// presigned URL: `/<encoded bucket>/<encoded key>`.
    pub fn canonical_uri(&self) -> String {
        format!("/{}/{}", self.encoded_bucket, self.encoded_key)
    }
}

/// Resolve `path` against an optional credential-supplied bucket.
///
/// Leading `/` or `\` is stripped and `\` is normalized to `/`. If
/// `credential_bucket` is non-empty the whole (normalized) path is the key;
/// otherwise the first path segment is the bucket and the remainder the
/// key. An empty key, or an encoded bucket/key that overflows the wire
/// size limit, fails with [`S3Error::InvalidPath`].
pub fn resolve_path(path: &str, credential_bucket: &str) -> Result<ResolvedPath, S3Error> {
    let normalized = path.replace('\\', "/");
    let normalized = normalized.trim_start_matches('/');

    let (bucket, key) = if !credential_bucket.is_empty() {
        (credential_bucket.to_owned(), normalized.to_owned())
    } else {
        match normalized.split_once('/') {
            Some((b, k)) => (b.to_owned(), k.to_owned()),
            None => (normalized.to_owned(), String::new()),
        }
    };

    if key.is_empty() {
        return Err(S3Error::InvalidPath("empty object key".to_owned()));
    }

    let encoded_bucket = percent_encode(&bucket, false);
    let encoded_key = percent_encode(&key, true);

    if encoded_bucket.len() > MAX_ENCODED_BUCKET_LEN {
        return Err(S3Error::InvalidPath(format!(
            "encoded bucket name exceeds {MAX_ENCODED_BUCKET_LEN} bytes"
        )));
    }
    if encoded_key.len() > MAX_ENCODED_KEY_LEN {
        return Err(S3Error::InvalidPath(format!(
            "encoded object key exceeds {MAX_ENCODED_KEY_LEN} bytes"
        )));
    }

    Ok(ResolvedPath {
        bucket,
        key,
        encoded_bucket,
        encoded_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslash_path_without_credential_bucket() {
        let resolved = resolve_path("\\mybucket\\dir\\file.bin", "").unwrap();
        assert_eq!(resolved.bucket, "mybucket");
        assert_eq!(resolved.key, "dir/file.bin");
        assert_eq!(resolved.canonical_uri(), "/mybucket/dir/file.bin");
    }

    #[test]
    fn uses_credential_bucket_when_present() {
        let resolved = resolve_path("/dir/file.bin", "examplebucket").unwrap();
        assert_eq!(resolved.bucket, "examplebucket");
        assert_eq!(resolved.key, "dir/file.bin");
    }

    #[test]
    fn empty_key_is_invalid_path() {
        assert!(matches!(
            resolve_path("/justabucket", ""),
            Err(S3Error::InvalidPath(_))
        ));
        assert!(matches!(
            resolve_path("", "examplebucket"),
            Err(S3Error::InvalidPath(_))
        ));
    }

    #[test]
    fn preserves_slash_in_key_encoding_but_not_bucket() {
        let resolved = resolve_path("a b/c+d", "bucket name").unwrap();
        assert_eq!(resolved.encoded_bucket, "bucket%20name");
        assert_eq!(resolved.encoded_key, "a%20b/c%2Bd");
    }
}
