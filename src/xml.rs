//! S3 XML response parsing: `<UploadId>`, `<Error>/<Code>/<Message>`
//! detection, and the two error-classification modes from the design.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::S3Error;

const DEFAULT_UNKNOWN_CODE: &str = "UnknownError";
const DEFAULT_UNKNOWN_MESSAGE: &str = "an unexpected error has occurred";
const NOT_FOUND_CODE: &str = "NoSuchKey";
const NOT_FOUND_MESSAGE: &str = "The specified key does not exist.";

/// Read the text content of the first occurrence of `tag` in `body`, if
/// present.
fn find_element_text(body: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == tag.as_bytes() => inside = true,
            Ok(Event::Text(t)) if inside => {
                return t.unescape().ok().map(|s| s.into_owned());
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == tag.as_bytes() => inside = false,
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Whether `body` contains an `<Error>` element anywhere.
pub fn contains_error_element(body: &str) -> bool {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"Error" => return true,
            Ok(Event::Eof) => return false,
            Err(_) => return false,
            _ => {}
        }
        buf.clear();
    }
}

/// Extract `<UploadId>…</UploadId>` from an `InitiateMultipartUpload`
/// response body.
pub fn extract_upload_id(body: &str) -> Option<String> {
    find_element_text(body, "UploadId")
}

/// Extract `<ETag>…</ETag>` from an `UploadPart` response body, stripping
/// the surrounding quotes S3 always wraps ETags in.
pub fn extract_etag(body: &str) -> Option<String> {
    find_element_text(body, "ETag").map(|s| s.trim_matches('"').to_owned())
}

/// Whether a 404 response is classified as not-found (vs. a generic
/// failure) for the given operation.
pub const fn is_http_not_found(status: u16) -> bool {
    status == 404
}

/// Strict parse of an error body: `{code, message}`, defaulting based on
/// whether the surrounding HTTP class was "not found".
pub fn parse_error_body(body: &str, is_not_found_class: bool) -> S3Error {
    let code = find_element_text(body, "Code");
    let message = find_element_text(body, "Message");

    match (code, message) {
        (Some(code), Some(message)) => S3Error::Protocol { code, message },
        _ if is_not_found_class => S3Error::Protocol {
            code: NOT_FOUND_CODE.to_owned(),
            message: NOT_FOUND_MESSAGE.to_owned(),
        },
        _ => S3Error::Protocol {
            code: DEFAULT_UNKNOWN_CODE.to_owned(),
            message: DEFAULT_UNKNOWN_MESSAGE.to_owned(),
        },
    }
}

/// The commit/part check: a 2xx response is still a failure if the body
/// contains an `<Error>` element.
pub fn fail_if_contains_error(status: u16, body: &str) -> Result<(), S3Error> {
    if (status == 200 || status == 206) && !contains_error_element(body) {
        return Ok(());
    }
    if contains_error_element(body) {
        let code = find_element_text(body, "Code").unwrap_or_else(|| DEFAULT_UNKNOWN_CODE.to_owned());
        let message =
            find_element_text(body, "Message").unwrap_or_else(|| DEFAULT_UNKNOWN_MESSAGE.to_owned());
        return Err(S3Error::Semantic { code, message });
    }
    Err(S3Error::Protocol {
        code: DEFAULT_UNKNOWN_CODE.to_owned(),
        message: format!("unexpected status {status}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_upload_id() {
        let body = "<InitiateMultipartUploadResult><Bucket>b</Bucket><Key>k</Key><UploadId>abc-123</UploadId></InitiateMultipartUploadResult>";
        assert_eq!(extract_upload_id(body), Some("abc-123".to_owned()));
    }

    #[test]
    fn missing_upload_id_is_none() {
        let body = "<InitiateMultipartUploadResult></InitiateMultipartUploadResult>";
        assert_eq!(extract_upload_id(body), None);
    }

    #[test]
    fn extracts_etag_and_strips_quotes() {
        let body = "<UploadPartResult><ETag>&quot;d41d8cd98f00b204e9800998ecf8427e&quot;</ETag></UploadPartResult>";
        assert_eq!(extract_etag(body), Some("d41d8cd98f00b204e9800998ecf8427e".to_owned()));
    }

    #[test]
    fn detects_error_element() {
        let body = "<Error><Code>NoSuchBucket</Code><Message>missing</Message></Error>";
        assert!(contains_error_element(body));
        assert!(fail_if_contains_error(200, body).is_err());
    }

    #[test]
    fn commit_success_without_error_passes() {
        let body = "<CompleteMultipartUploadResult><Location>x</Location></CompleteMultipartUploadResult>";
        assert!(fail_if_contains_error(200, body).is_ok());
    }

    #[test]
    fn parse_error_body_defaults_for_not_found() {
        let err = parse_error_body("", true);
        assert_eq!(
            err,
            S3Error::Protocol {
                code: "NoSuchKey".to_owned(),
                message: "The specified key does not exist.".to_owned(),
            }
        );
    }

    #[test]
    fn parse_error_body_defaults_to_unknown() {
        let err = parse_error_body("not xml", false);
        assert_eq!(
            err,
            S3Error::Protocol {
                code: "UnknownError".to_owned(),
                message: "an unexpected error has occurred".to_owned(),
            }
        );
    }
}
