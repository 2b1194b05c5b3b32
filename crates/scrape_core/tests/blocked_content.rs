use scrape_core::{BlockedContentDetector, DEFAULT_BLOCKED_KEYWORDS};

#[test]
fn matching_is_case_insensitive() {
    let detector = BlockedContentDetector::default();
    let page = "Notice: SESSION EXPIRED. Please log in again.";
    assert_eq!(detector.find(page), Some("session expired"));
}

#[test]
fn clean_page_is_not_blocked() {
    let detector = BlockedContentDetector::default();
    let page = "Property register\nW123 P456 East District\nshowing 10 of 10 rows";
    assert_eq!(detector.find(page), None);
}

#[test]
fn default_list_covers_the_known_blockers() {
    let detector = BlockedContentDetector::default();
    for keyword in DEFAULT_BLOCKED_KEYWORDS {
        let page = format!("something something {keyword} something");
        assert_eq!(detector.find(&page), Some(*keyword));
    }
}

#[test]
fn custom_list_replaces_the_default() {
    let detector = BlockedContentDetector::new(["quota exceeded"]);
    assert_eq!(detector.find("ERROR: Quota Exceeded"), Some("quota exceeded"));
    // "error" is no longer in the list.
    assert_eq!(detector.find("an error occurred"), None);
}

#[test]
fn first_listed_keyword_wins() {
    let detector = BlockedContentDetector::new(["no data", "forbidden"]);
    let page = "forbidden / no data";
    assert_eq!(detector.find(page), Some("no data"));
}
