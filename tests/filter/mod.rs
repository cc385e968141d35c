use error_relay::filter::{apply_filters, is_filtered_key, FILTERED};
use error_relay::types::{into_tree, MetaData};
use serde_json::{json, Value};

fn tree(value: Value) -> MetaData {
    into_tree(value).unwrap()
}

#[test]
fn redacts_matching_keys_at_every_depth() {
    let input = tree(json!({
        "request": {
            "params": { "user_password": "hunter2", "email": "ana@example.com" },
            "headers": { "Cookie": "PHPSESSID=abc", "Accept": "text/html" }
        },
        "password": { "nested": "whole subtree goes" }
    }));

    let clean = apply_filters(input, &["password", "Cookie"]);

    assert_eq!(clean["request"]["params"]["user_password"], FILTERED);
    assert_eq!(clean["request"]["params"]["email"], "ana@example.com");
    assert_eq!(clean["request"]["headers"]["Cookie"], FILTERED);
    assert_eq!(clean["request"]["headers"]["Accept"], "text/html");
    assert_eq!(clean["password"], FILTERED);
}

#[test]
fn empty_terms_leave_tree_untouched() {
    let input = tree(json!({ "password": "hunter2", "nested": { "Cookie": 1 } }));
    let terms: [&str; 0] = [];

    assert_eq!(apply_filters(input.clone(), &terms), input);
}

#[test]
fn matching_is_case_sensitive_substring() {
    assert!(is_filtered_key("db_password_hash", &["password"]));
    assert!(!is_filtered_key("PASSWORD", &["password"]));
    assert!(!is_filtered_key("pass", &["password"]));
}

#[test]
fn sequences_are_not_walked() {
    let input = tree(json!({ "items": [{ "password": "x" }] }));
    let clean = apply_filters(input, &["password"]);

    assert_eq!(clean["items"], json!([{ "password": "x" }]));
}

#[test]
fn non_matching_tree_is_unchanged() {
    let input = tree(json!({ "user": { "id": 1, "roles": ["admin"] } }));
    assert_eq!(apply_filters(input.clone(), &["secret"]), input);
}
