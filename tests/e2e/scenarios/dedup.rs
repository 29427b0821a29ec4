use crate::harness::Scenario;

#[test]
fn test_repeat_visit_keeps_latest() {
    Scenario::new("repeat_visit_keeps_latest")
        .user_creates_project("p")
        .transaction("t1", "https://a.test/", None)
        .transaction("t2", "https://a.test/", None)
        .transaction("t3", "https://a.test/", None)
        .assert_page_requests("https://a.test/", &["t3"])
        .assert_request_deleted("t1")
        .assert_request_deleted("t2")
        .assert_project_page_count("p", 1)
        .run()
        .unwrap();
}

#[test]
fn test_different_methods_kept() {
    Scenario::new("different_methods_kept")
        .user_creates_project("p")
        .transaction("t1", "https://a.test/form", None)
        .start_method("t2", "POST", "https://a.test/form", None)
        .complete("t2", 303)
        .assert_page_requests("https://a.test/form", &["t1", "t2"])
        .run()
        .unwrap();
}

#[test]
fn test_source_page_collapses_repeated_subresource() {
    Scenario::new("source_page_collapses_repeated_subresource")
        .user_creates_project("p")
        .transaction("t1", "https://a.test/x.js", Some("https://a.test/"))
        .transaction("t2", "https://a.test/x.js", Some("https://a.test/"))
        .assert_page_requests("https://a.test/x.js", &["t2"])
        .assert_page_requests("https://a.test/", &["t2"])
        .assert_request_deleted("t1")
        .run()
        .unwrap();
}

#[test]
fn test_dangling_ids_pruned_on_next_attach() {
    Scenario::new("dangling_ids_pruned_on_next_attach")
        .user_creates_project("p")
        .transaction("t1", "https://a.test/x", Some("https://a.test/"))
        // Same resource, loaded from another page: t1 is deleted via x.
        .transaction("t2", "https://a.test/x", Some("https://b.test/"))
        .assert_request_deleted("t1")
        .assert_page_request_count("https://a.test/", 1)
        .transaction("t3", "https://a.test/y", Some("https://a.test/"))
        .assert_page_requests("https://a.test/", &["t3"])
        .assert_page_requests("https://b.test/", &["t2"])
        .run()
        .unwrap();
}

#[test]
fn test_unattached_request_is_not_deduplicated() {
    Scenario::new("unattached_request_is_not_deduplicated")
        .transaction("t1", "https://a.test/", None)
        .user_creates_project("p")
        .transaction("t2", "https://a.test/", None)
        .assert_page_requests("https://a.test/", &["t2"])
        .assert_request_stored("t1")
        .run()
        .unwrap();
}
