//! End-to-end checks through the public API: load, project, look fields up, match requests.

use jcap::{load, match_request, project, CaptureModule, FieldValue, HttpMethodFilter};
use regex::Regex;
use rstest::rstest;

const NESTED_HTTP: &str = r#"[
    {"_source":{"layers":{
        "ip":{"ip.src":"10.0.0.1","ip.dst":"10.0.0.2"},
        "tcp":{"tcp.srcport":"51000","tcp.dstport":"80"},
        "http":{
            "GET /index.html HTTP/1.1\r\n":{"http.request.method":"GET","http.request.uri":"/index.html"},
            "http.host":"example.com",
            "http.request.full_uri":"http://example.com/index.html"
        }
    }}},
    {"_source":{"layers":{
        "tcp":{"tcp.srcport":"51001","tcp.dstport":"80"},
        "http":{
            "POST /login HTTP/1.1\r\n":{"http.request.method":"POST","http.request.uri":"/login"},
            "http.host":"example.com",
            "http.request.full_uri":"http://example.com/login"
        }
    }}},
    {"_source":{"layers":{"tcp":{"tcp.srcport":"80"}}}}
]"#;

const FLAT_HTTP: &str = r#"[
    {
        "ip":{"ip.src":"10.0.0.1","ip.dst":"10.0.0.2"},
        "tcp":{"tcp.srcport":"51000","tcp.dstport":"80"},
        "http":{
            "GET /index.html HTTP/1.1\r\n":{"http.request.method":"GET","http.request.uri":"/index.html"},
            "http.host":"example.com",
            "http.request.full_uri":"http://example.com/index.html"
        }
    },
    {
        "tcp":{"tcp.srcport":"51001","tcp.dstport":"80"},
        "http":{
            "POST /login HTTP/1.1\r\n":{"http.request.method":"POST","http.request.uri":"/login"},
            "http.host":"example.com",
            "http.request.full_uri":"http://example.com/login"
        }
    },
    {"tcp":{"tcp.srcport":"80"}}
]"#;

fn re(s: &str) -> Regex {
    Regex::new(s).unwrap()
}

fn string(s: &str) -> Option<FieldValue> {
    Some(FieldValue::String(s.to_string()))
}

#[test]
fn scenario_tcp_only_packet() {
    let mut module = CaptureModule::default();
    module.load([br#"[{"_source":{"layers":{"tcp":{"tcp.srcport":"80","tcp.dstport":"443"}}}}]"#]).unwrap();

    assert_eq!(module.number_of_packets(), Some(1));
    assert_eq!(module.field("packets[0].tcp.srcport"), Some(FieldValue::Integer(80)));
    assert_eq!(module.field("packets[0].tcp.dstport"), Some(FieldValue::Integer(443)));
    for path in ["method", "uri", "host", "full_uri"] {
        assert_eq!(module.field(&format!("packets[0].http.request.{}", path)), None);
    }
}

#[test]
fn scenario_post_login() {
    let mut module = CaptureModule::default();
    module.load([br#"[{"_source":{"layers":{"http":{
        "req1":{"http.request.method":"POST","http.request.uri":"/login"},
        "http.request.full_uri":"http://x/login"
    }}}}]"#]).unwrap();

    assert_eq!(module.http_get(&re("login")), 0);
    assert_eq!(module.http_post(&re("login")), 1);
    assert_eq!(module.http_request(&re("login")), 1);
}

#[test]
fn scenario_malformed_input() {
    let mut module = CaptureModule::default();
    let err = module.load([b"{not json"]).unwrap_err();

    assert!(!err.message.is_empty());
    assert_eq!(module.number_of_packets(), None);
    assert_eq!(module.field("number_of_packets"), None);
    assert_eq!(module.field("packets[0].tcp.srcport"), None);
}

#[rstest]
#[case(NESTED_HTTP)]
#[case(FLAT_HTTP)]
fn both_nesting_shapes_project_the_same(#[case] input: &str) {
    let parsed = load(input.as_bytes()).unwrap();
    let projected = project(&parsed);
    assert_eq!(projected.len(), parsed.len());
    assert_eq!(projected.len(), 3);

    assert_eq!(projected.field("packets[0].tcp.srcport"), Some(FieldValue::Integer(51000)));
    assert_eq!(projected.field("packets[0].http.request.method"), string("GET"));
    assert_eq!(projected.field("packets[0].http.request.uri"), string("/index.html"));
    assert_eq!(projected.field("packets[0].http.request.host"), string("example.com"));
    assert_eq!(projected.field("packets[0].http.request.full_uri"), string("http://example.com/index.html"));
    // the ip layer is present but never projected
    assert_eq!(projected.field("packets[0].ip.src"), None);
    assert_eq!(projected.field("packets[0].ip.dst"), None);

    assert_eq!(projected.field("packets[1].http.request.method"), string("POST"));

    // a lone source port is dropped
    assert_eq!(projected.field("packets[2].tcp.srcport"), None);
    assert_eq!(projected.field("packets[2].tcp.dstport"), None);
}

#[rstest]
#[case(NESTED_HTTP)]
#[case(FLAT_HTTP)]
fn both_nesting_shapes_match_the_same(#[case] input: &str) {
    let parsed = load(input.as_bytes()).unwrap();

    assert!(match_request(&parsed, &re("index"), HttpMethodFilter::GET));
    assert!(!match_request(&parsed, &re("index"), HttpMethodFilter::POST));
    assert!(match_request(&parsed, &re("login"), HttpMethodFilter::POST));
    assert!(!match_request(&parsed, &re("login"), HttpMethodFilter::GET));
    assert!(match_request(&parsed, &re("example\\.com"), HttpMethodFilter::ANY));
    assert!(!match_request(&parsed, &re("logout"), HttpMethodFilter::ANY));
}

#[rstest]
#[case(NESTED_HTTP, "index")]
#[case(NESTED_HTTP, "login")]
#[case(NESTED_HTTP, "nothing")]
#[case(FLAT_HTTP, "\\.html$")]
#[case(FLAT_HTTP, "^https")]
fn any_filter_is_union_of_get_and_post(#[case] input: &str, #[case] pattern: &str) {
    let parsed = load(input.as_bytes()).unwrap();
    let pattern = re(pattern);

    assert_eq!(
        match_request(&parsed, &pattern, HttpMethodFilter::ANY),
        match_request(&parsed, &pattern, HttpMethodFilter::GET)
            || match_request(&parsed, &pattern, HttpMethodFilter::POST)
    );
}

#[test]
fn projection_is_repeatable() {
    let parsed = load(NESTED_HTTP.as_bytes()).unwrap();
    assert_eq!(project(&parsed), project(&parsed));
}

#[test]
fn projection_outlives_parse_tree() {
    let parsed = load(NESTED_HTTP.as_bytes()).unwrap();
    let projected = project(&parsed);
    drop(parsed);
    assert_eq!(projected.field("number_of_packets"), Some(FieldValue::Integer(3)));
}

#[test]
fn multiple_blocks_last_one_is_current() {
    let mut module = CaptureModule::default();
    module.load([NESTED_HTTP.as_bytes(), br#"[{"tcp":{"tcp.srcport":"1","tcp.dstport":"2"}}]"#.as_slice()]).unwrap();

    assert_eq!(module.loaded().len(), 2);
    assert_eq!(module.loaded()[0].projected.len(), 3);
    assert_eq!(module.number_of_packets(), Some(1));
    assert_eq!(module.field("packets[0].tcp.srcport"), Some(FieldValue::Integer(1)));
    assert_eq!(module.http_request(&re("login")), 0);

    module.unload();
    assert!(module.loaded().is_empty());
    assert_eq!(module.number_of_packets(), None);
}

#[test]
fn non_array_document_has_zero_packets() {
    let mut module = CaptureModule::default();
    module.load([br#"{"_source":{"layers":{}}}"#]).unwrap();
    assert_eq!(module.number_of_packets(), Some(0));
    assert_eq!(module.http_request(&re("")), 0);
}
