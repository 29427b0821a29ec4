use crate::harness::Scenario;

#[test]
fn test_missing_start_is_dropped() {
    Scenario::new("missing_start_is_dropped")
        .user_creates_project("p")
        .headers("ghost", &[("Accept", "*/*")])
        .complete("ghost", 200)
        .assert_not_finalized("ghost")
        .assert_project_page_count("p", 0)
        .assert_no_builders()
        .run()
        .unwrap();
}

#[test]
fn test_missing_completion_leaves_builder() {
    Scenario::new("missing_completion_leaves_builder")
        .user_creates_project("p")
        .start("t1", "https://a.test/slow", None)
        .headers("t1", &[("Accept", "*/*")])
        .assert_builder_pending("t1")
        .assert_no_page("https://a.test/slow")
        .run()
        .unwrap();
}

#[test]
fn test_missing_headers_still_finalizes() {
    Scenario::new("missing_headers_still_finalizes")
        .user_creates_project("p")
        .start("t1", "https://a.test/", None)
        .complete("t1", 200)
        .assert_page_requests("https://a.test/", &["t1"])
        .assert_no_builders()
        .run()
        .unwrap();
}

#[test]
fn test_duplicate_completion_ignored() {
    Scenario::new("duplicate_completion_ignored")
        .user_creates_project("p")
        .transaction("t1", "https://a.test/", None)
        .complete("t1", 200)
        .assert_page_requests("https://a.test/", &["t1"])
        .run()
        .unwrap();
}

#[test]
fn test_no_active_project_stores_request_only() {
    Scenario::new("no_active_project_stores_request_only")
        .assert_active(None)
        .transaction("t1", "https://a.test/", None)
        .assert_request_stored("t1")
        .assert_no_page("https://a.test/")
        .assert_no_builders()
        .run()
        .unwrap();
}
