use crate::harness::Scenario;

#[test]
fn test_single_page_load() {
    Scenario::new("single_page_load")
        .user_creates_project("shop")
        .assert_active(Some("shop"))
        .transaction("t1", "https://shop.test/", None)
        .assert_project_pages("shop", &["https://shop.test/"])
        .assert_page_requests("https://shop.test/", &["t1"])
        .assert_request_stored("t1")
        .assert_no_builders()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_subresource_lands_on_both_pages() {
    Scenario::new("subresource_lands_on_both_pages")
        .user_creates_project("shop")
        .transaction("t1", "https://shop.test/", None)
        .transaction("t2", "https://shop.test/app.js", Some("https://shop.test/"))
        .assert_project_pages("shop", &["https://shop.test/", "https://shop.test/app.js"])
        .assert_page_requests("https://shop.test/", &["t1", "t2"])
        .assert_page_requests("https://shop.test/app.js", &["t2"])
        .run()
        .unwrap();
}

#[test]
fn test_interleaved_transactions() {
    Scenario::new("interleaved_transactions")
        .user_creates_project("shop")
        .start("a", "https://shop.test/", None)
        .start("b", "https://shop.test/logo.png", Some("https://shop.test/"))
        .headers("b", &[("Accept", "image/*")])
        .headers("a", &[("Accept", "text/html")])
        .complete("b", 200)
        .complete("a", 200)
        .assert_project_pages("shop", &["https://shop.test/logo.png", "https://shop.test/"])
        .assert_page_requests("https://shop.test/", &["b", "a"])
        .assert_no_builders()
        .run()
        .unwrap();
}

#[test]
fn test_fixture_replay() {
    Scenario::new("fixture_replay")
        .user_creates_project("shop")
        .replay_fixture("browse")
        .assert_project_pages(
            "shop",
            &[
                "https://shop.test/",
                "https://shop.test/app.css",
                "https://shop.test/app.js",
                "https://shop.test/api/cart",
            ],
        )
        // The reload replaced the first landing page request.
        .assert_page_requests("https://shop.test/", &["2", "3", "4", "5"])
        .assert_request_deleted("1")
        .assert_not_finalized("6")
        .assert_no_builders()
        .run()
        .unwrap();
}

#[test]
fn test_existing_page_joins_second_project() {
    Scenario::new("existing_page_joins_second_project")
        .user_creates_project("shop")
        .transaction("t1", "https://shop.test/", None)
        .user_creates_project("audit")
        .assert_active(Some("audit"))
        .transaction("t2", "https://shop.test/", None)
        .assert_project_pages("audit", &["https://shop.test/"])
        .assert_project_pages("shop", &["https://shop.test/"])
        .assert_page_requests("https://shop.test/", &["t2"])
        .run()
        .unwrap();
}

#[test]
fn test_switching_projects() {
    Scenario::new("switching_projects")
        .user_creates_project("one")
        .user_creates_project("two")
        .user_activates("one")
        .transaction("t1", "https://a.test/", None)
        .assert_project_page_count("one", 1)
        .assert_project_page_count("two", 0)
        .run()
        .unwrap();
}

#[test]
fn test_page_nickname_kept_across_captures() {
    Scenario::new("page_nickname_kept_across_captures")
        .user_creates_project("shop")
        .transaction("t1", "https://shop.test/", None)
        .user_renames_page("https://shop.test/", "Landing")
        .transaction("t2", "https://shop.test/", None)
        .assert_page_nickname("https://shop.test/", "Landing")
        .assert_page_requests("https://shop.test/", &["t2"])
        .run()
        .unwrap();
}
