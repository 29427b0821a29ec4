use crate::harness::Scenario;

#[test]
fn test_records_survive_restart() {
    Scenario::new("records_survive_restart")
        .user_creates_project("shop")
        .transaction("t1", "https://shop.test/", None)
        .transaction("t2", "https://shop.test/app.js", Some("https://shop.test/"))
        .restart()
        .assert_active(Some("shop"))
        .assert_project_pages("shop", &["https://shop.test/", "https://shop.test/app.js"])
        .assert_page_requests("https://shop.test/", &["t1", "t2"])
        .run()
        .unwrap();
}

#[test]
fn test_transaction_spans_crash() {
    Scenario::new("transaction_spans_crash")
        .user_creates_project("shop")
        .start("t1", "https://shop.test/", None)
        .crash()
        .restart()
        .assert_builder_pending("t1")
        .headers("t1", &[("Accept", "text/html")])
        .complete("t1", 200)
        .assert_page_requests("https://shop.test/", &["t1"])
        .assert_no_builders()
        .run()
        .unwrap();
}

#[test]
fn test_dedup_after_restart() {
    Scenario::new("dedup_after_restart")
        .user_creates_project("shop")
        .transaction("t1", "https://shop.test/", None)
        .restart()
        .transaction("t2", "https://shop.test/", None)
        .assert_page_requests("https://shop.test/", &["t2"])
        .assert_request_deleted("t1")
        .run()
        .unwrap();
}
