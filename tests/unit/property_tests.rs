//! Property-based tests for the descriptor schema and URL handling.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use agentci::domain::connection::{extract_subdomain, ConnectionParams};
use agentci::domain::descriptor::AgentDescriptor;

proptest! {
    #[test]
    fn prop_descriptor_roundtrips_through_toml(
        subdomain in "[a-z][a-z0-9]{0,15}",
        id in "[A-Za-z0-9_]{0,24}",
        regions in prop::collection::vec("[a-z]{2,6}-[a-z0-9]{1,4}", 0..4),
    ) {
        let mut descriptor = AgentDescriptor::new(subdomain);
        descriptor.agent.id = id;
        descriptor.agent.regions = regions;

        let text = descriptor.to_toml().unwrap();
        let back = AgentDescriptor::parse(&text).unwrap();
        prop_assert_eq!(back, descriptor);
    }

    #[test]
    fn prop_subdomain_extracted_under_any_scheme(
        subdomain in "[a-z][a-z0-9-]{0,20}",
        scheme in prop::sample::select(vec!["http", "https", "ws", "wss"]),
    ) {
        let url = format!("{scheme}://{subdomain}.example.cloud");
        prop_assert_eq!(extract_subdomain(&url), Some(subdomain.as_str()));
    }

    #[test]
    fn prop_undotted_hosts_have_no_subdomain(host in "[a-z0-9]{1,12}") {
        let url = format!("https://{host}/v1/agents");
        prop_assert_eq!(extract_subdomain(&url), None);
    }

    #[test]
    fn prop_http_url_never_keeps_a_ws_scheme_or_trailing_slash(
        host in "[a-z][a-z0-9.]{0,20}",
        scheme in prop::sample::select(vec!["http", "https", "ws", "wss"]),
        slash in proptest::bool::ANY,
    ) {
        let conn = ConnectionParams {
            url: format!("{scheme}://{host}{}", if slash { "/" } else { "" }),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };
        let base = conn.http_url();
        prop_assert!(base.starts_with("http://") || base.starts_with("https://"));
        prop_assert!(!base.ends_with('/'));
    }
}
