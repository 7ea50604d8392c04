//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use tokio::io::{AsyncWriteExt, BufReader};

    use crate::parser::{Error, HttpRequest, HttpVersion, Method, parse_request, read_request};

    async fn read_from(input: &[u8]) -> Result<HttpRequest, Error> {
        let mut reader = BufReader::new(input);
        read_request(&mut reader).await
    }

    #[test]
    fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.0\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.target, "/index.html");
        assert_eq!(result.version, HttpVersion::Http10);
        assert_eq!(result.header("Host"), Some("example.com"));
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_parse_request_with_multiple_headers() {
        let request = b"HEAD /a.txt HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test\r\nAccept: */*\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::HEAD);
        assert_eq!(result.version, HttpVersion::Http11);

        let names: Vec<&str> = result.headers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Accept", "Host", "User-Agent"]);
        assert_eq!(result.header("Accept"), Some("*/*"));
    }

    #[test]
    fn test_duplicate_header_keeps_last_value() {
        let request = b"GET / HTTP/1.0\r\nX-Tag: first\r\nX-Tag: second\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.headers.len(), 1);
        assert_eq!(result.header("X-Tag"), Some("second"));
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let request = b"GET / HTTP/1.0\r\nHost: a\r\nhost: b\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.header("Host"), Some("a"));
        assert_eq!(result.header("host"), Some("b"));
        assert!(!result.has_header("HOST"));
    }

    #[test]
    fn test_header_value_keeps_later_separators() {
        let request = b"GET / HTTP/1.0\r\nX-Test: value: with: separators\r\nX-Empty: \r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.header("X-Test"), Some("value: with: separators"));
        assert_eq!(result.header("X-Empty"), Some(""));
    }

    #[test]
    fn test_header_without_colon_space_is_rejected() {
        let request = b"GET / HTTP/1.0\r\nHost:example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::MalformedHeader(ref line)) if line == "Host:example.com"));

        let result = parse_request(b"GET / HTTP/1.0\r\nInvalidHeader\r\n\r\n");
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_empty_request() {
        let result = parse_request(b"");
        assert!(matches!(result, Err(Error::EmptyRequest)));
        assert!(result.unwrap_err().is_malformed());
    }

    #[test]
    fn test_incomplete_request_line() {
        for line in ["GET\r\n", "GET /index.html\r\n", "\r\n"] {
            let result = parse_request(line.as_bytes());
            assert!(
                matches!(result, Err(Error::MalformedRequestLine(_))),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_request_line_names_the_line() {
        let err = parse_request(b"GET /index.html\r\n\r\n").unwrap_err();
        assert_eq!(err.to_string(), "Cannot parse request line from \"GET /index.html\"");
    }

    #[test]
    fn test_protocol_must_start_with_http_prefix() {
        let result = parse_request(b"GET /index.html FTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(Error::UnsupportedProtocol(ref p)) if p == "FTP/1.0"));

        // A fourth field ends up in the protocol token and fails the prefix check.
        let result = parse_request(b"GET /a b HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(Error::UnsupportedProtocol(ref p)) if p == "b HTTP/1.0"));
    }

    #[test]
    fn test_unknown_http_version_is_kept_verbatim() {
        let result = parse_request(b"GET / HTTP/2\r\n\r\n").unwrap();
        assert_eq!(result.version, HttpVersion::Other("HTTP/2".to_string()));
        assert_eq!(result.version.to_string(), "HTTP/2");
    }

    #[test]
    fn test_other_methods_are_parsed() {
        for token in ["POST", "DELETE", "PUT", "get", "BREW"] {
            let request = format!("{token} /index.html HTTP/1.0\r\n\r\n");
            let result = parse_request(request.as_bytes()).unwrap();
            assert_eq!(result.method, Method::Other(token.to_string()));
            assert!(!result.method.is_supported());
            assert_eq!(result.method.to_string(), token);
        }
    }

    #[test]
    fn test_lf_only_line_endings() {
        let result = parse_request(b"GET /x HTTP/1.0\nHost: h\n\nline one\nline two\n").unwrap();
        assert_eq!(result.target, "/x");
        assert_eq!(result.header("Host"), Some("h"));
        assert_eq!(result.body, vec!["line one", "line two"]);
    }

    #[test]
    fn test_body_lines_after_blank_line() {
        let result = parse_request(b"POST /form HTTP/1.0\r\nHost: h\r\n\r\nname=a\r\n\r\nlast").unwrap();
        assert_eq!(result.body, vec!["name=a", "", "last"]);
    }

    #[test]
    fn test_headers_end_at_end_of_input() {
        let result = parse_request(b"GET / HTTP/1.0\r\nHost: h").unwrap();
        assert_eq!(result.header("Host"), Some("h"));
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let result = parse_request(b"GET /caf\xe9 HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(result.target, "/caf\u{fffd}");
    }

    #[test]
    fn test_display_renders_request() {
        let mut headers = BTreeMap::new();
        headers.insert("b".to_string(), "2".to_string());
        headers.insert("a".to_string(), "1".to_string());
        let request = HttpRequest::with_body(
            Method::GET,
            "/index.html",
            HttpVersion::Http10,
            headers,
            vec!["body".to_string()],
        );

        assert_eq!(request.to_string(), "GET /index.html HTTP/1.0\na: 1\nb: 2\n\r\nbody\n");
    }

    #[tokio::test]
    async fn test_read_request_matches_slice_parser() {
        let input = b"GET /index.html HTTP/1.0\r\nHost: example.com\r\nX-A: 1\r\nX-A: 2\r\n\r\nhello\r\nworld\r\n";
        let streamed = read_from(input).await.unwrap();
        let sliced = parse_request(input).unwrap();
        assert_eq!(streamed, sliced);
        assert_eq!(streamed.header("X-A"), Some("2"));
        assert_eq!(streamed.body, vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_read_request_errors() {
        assert!(matches!(read_from(b"").await, Err(Error::EmptyRequest)));
        assert!(matches!(
            read_from(b"GET /\r\n\r\n").await,
            Err(Error::MalformedRequestLine(_))
        ));
        assert!(matches!(
            read_from(b"GET / SMTP\r\n\r\n").await,
            Err(Error::UnsupportedProtocol(_))
        ));
        assert!(matches!(
            read_from(b"GET / HTTP/1.0\r\nbroken\r\n\r\n").await,
            Err(Error::MalformedHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_read_request_does_not_wait_for_body() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"GET /index.html HTTP/1.0\r\nHost: h\r\n\r\n")
            .await
            .unwrap();

        // The client keeps its end open and never sends a body.
        let mut reader = BufReader::new(server);
        let request = tokio::time::timeout(Duration::from_secs(2), read_request(&mut reader))
            .await
            .expect("parser blocked waiting for a body")
            .unwrap();

        assert_eq!(request.target, "/index.html");
        assert!(request.body.is_empty());
        drop(client);
    }

    #[tokio::test]
    async fn test_read_request_collects_body_sent_with_head() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"POST /submit HTTP/1.0\r\nHost: h\r\n\r\nfirst\r\nsecond\r\n")
            .await
            .unwrap();

        let mut reader = BufReader::new(server);
        let request = tokio::time::timeout(Duration::from_secs(2), read_request(&mut reader))
            .await
            .expect("parser blocked on an available body")
            .unwrap();

        assert_eq!(request.method, Method::Other("POST".to_string()));
        assert_eq!(request.body, vec!["first", "second"]);
        drop(client);
    }

    #[tokio::test]
    async fn test_read_request_keeps_unterminated_body_line() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"POST /x HTTP/1.0\r\nContent-Length: 3\r\n\r\na=b")
            .await
            .unwrap();

        // The client waits for the reply with its end still open.
        let mut reader = BufReader::new(server);
        let request = tokio::time::timeout(Duration::from_secs(2), read_request(&mut reader))
            .await
            .expect("parser blocked waiting for the end of a body line")
            .unwrap();

        assert_eq!(request.header("Content-Length"), Some("3"));
        assert_eq!(request.body, vec!["a=b"]);
        drop(client);
    }

    #[tokio::test]
    async fn test_read_request_mixed_body_lines() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"PUT /x HTTP/1.0\r\n\r\none\r\ntwo")
            .await
            .unwrap();

        let mut reader = BufReader::new(server);
        let request = tokio::time::timeout(Duration::from_secs(2), read_request(&mut reader))
            .await
            .expect("parser blocked on a partial body line")
            .unwrap();

        assert_eq!(request.body, vec!["one", "two"]);
        drop(client);
    }
}
