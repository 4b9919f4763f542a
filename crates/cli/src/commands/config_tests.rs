// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_mask() {
    assert_eq!(mask("abcdefgh"), "****efgh");
    assert_eq!(mask("abcd"), "****");
    assert_eq!(mask(""), "****");
}

#[test]
fn test_show_is_toml() {
    let mut config = Config::default();
    config.api.client_id = Some("reader-app".to_string());
    let mut out = Vec::new();
    show(&config, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let parsed = Config::parse(&text).unwrap();
    assert_eq!(parsed.api.client_id.as_deref(), Some("reader-app"));
    assert!(text.contains("[api]"));
}

#[test]
fn test_show_masks_token_from_file() {
    let mut config = Config::default();
    config.api.access_token = Some("super-secret-token".to_string());
    let mut out = Vec::new();
    show(&config, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("super-secret"));
    assert!(text.contains("****"));
}
