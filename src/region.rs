//! Region guessing from an endpoint URL, used when `Credentials.region` is
//! not supplied explicitly.

/// Guess the SigV4 region from an endpoint string.
///
/// - `*.r2.cloudflarestorage.com` ⇒ `"auto"`.
/// - endpoints containing both `s3.` and `.amazonaws.com` ⇒ the substring
///   between them.
/// - anything else (including an empty endpoint) ⇒ `"us-east-1"`.
pub fn guess_region(endpoint: &str) -> String {
    if endpoint.ends_with(".r2.cloudflarestorage.com") {
        return "auto".to_owned();
    }

    if let (Some(start), Some(end)) = (endpoint.find("s3."), endpoint.find(".amazonaws.com")) {
        let region_start = start + "s3.".len();
        if region_start <= end {
            return endpoint[region_start..end].to_owned();
        }
    }

    "us-east-1".to_owned()
}

#[cfg(test)]
mod tests {
    use super::guess_region;

    #[test]
    fn guesses_cloudflare_r2() {
        assert_eq!(guess_region("abc.r2.cloudflarestorage.com"), "auto");
    }

    #[test]
    fn guesses_aws_region_from_endpoint() {
        assert_eq!(guess_region("s3.eu-west-3.amazonaws.com"), "eu-west-3");
    }

    #[test]
    fn defaults_to_us_east_1() {
        assert_eq!(guess_region(""), "us-east-1");
        assert_eq!(guess_region("minio.example.com"), "us-east-1");
    }
}
