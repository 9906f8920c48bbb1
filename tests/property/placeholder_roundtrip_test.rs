//! Property-based tests for placeholder addressing.
//!
//! Whatever a tab showed, the placeholder address must carry it back unchanged,
//! including URLs and titles full of `&`, `?`, `#` and `=`.

use proptest::prelude::*;
use tab_suspender::services::placeholder::{PlaceholderCodec, DEFAULT_PLACEHOLDER_BASE};
use tab_suspender::types::placeholder::{UrlKind, UNTITLED};

fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https://"), Just("http://"), Just("file:///")],
        "[a-z0-9.-]{1,20}",
        "[a-zA-Z0-9/&?#=%+ ._~-]{0,40}",
    )
        .prop_map(|(scheme, host, rest)| format!("{}{}{}", scheme, host, rest))
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(url in arb_url(), title in "[^\\x00]{1,40}") {
        let codec = PlaceholderCodec::default();
        let encoded = codec.encode(&url, &title);

        prop_assert_eq!(codec.classify(&encoded), UrlKind::Placeholder);
        let decoded = codec.decode(&encoded).unwrap();
        prop_assert_eq!(decoded.original_url, url);
        prop_assert_eq!(decoded.original_title, title);
    }

    #[test]
    fn prop_empty_title_decodes_untitled(url in arb_url()) {
        let codec = PlaceholderCodec::default();
        let decoded = codec.decode(&codec.encode(&url, "")).unwrap();
        prop_assert_eq!(decoded.original_title, UNTITLED);
        prop_assert_eq!(decoded.original_url, url);
    }

    #[test]
    fn prop_normal_pages_are_never_placeholders(url in arb_url()) {
        let codec = PlaceholderCodec::default();
        prop_assert_eq!(codec.classify(&url), UrlKind::Normal);
        prop_assert!(codec.decode(&url).is_none());
    }
}

#[test]
fn query_delimiters_survive() {
    let codec = PlaceholderCodec::default();
    let url = "https://example.com/search?q=a&b=c#section";
    let title = "Q&A: what? #1 = best";

    let decoded = codec.decode(&codec.encode(url, title)).unwrap();

    assert_eq!(decoded.original_url, url);
    assert_eq!(decoded.original_title, title);
}

#[test]
fn custom_base_drops_its_own_query() {
    let codec = PlaceholderCodec::new("moz-extension://abc/suspended.html?stale=1");
    assert_eq!(codec.base_url(), "moz-extension://abc/suspended.html");
    let encoded = codec.encode("https://a.test", "A");
    assert!(encoded.starts_with("moz-extension://abc/suspended.html?originalUrl="));
    assert_eq!(codec.classify(&encoded), UrlKind::Placeholder);
}

#[test]
fn other_extension_pages_are_internal() {
    let codec = PlaceholderCodec::default();
    assert_eq!(
        codec.classify("chrome-extension://other/options.html"),
        UrlKind::Internal
    );
    assert_eq!(codec.classify(DEFAULT_PLACEHOLDER_BASE), UrlKind::Placeholder);
    assert_eq!(codec.classify("chrome://settings"), UrlKind::Internal);
    assert_eq!(codec.classify("about:blank"), UrlKind::Internal);
}
