use std::collections::HashSet;

use super::*;

#[test]
fn slugs_are_unique() {
    let slugs: HashSet<_> = TOPICS.iter().map(|t| t.slug).collect();
    assert_eq!(slugs.len(), TOPICS.len());
    assert_eq!(TOPICS.len(), 18);
    assert_eq!(
        TOPICS
            .iter()
            .filter(|t| t.category == TopicCategory::Pattern)
            .count(),
        6
    );
}

#[test]
fn known_topics_use_their_preset() {
    assert_eq!(
        request_for("binary-search", "Binary Search"),
        "Demonstrate binary search for value 7 in sorted array [1, 3, 5, 7, 9, 11]"
    );
    assert_eq!(find("BFS").map(|t| t.title), Some("Breadth-First Search"));
}

#[test]
fn unknown_topics_fall_back_to_title() {
    assert_eq!(request_for("heap-sort", " Heap Sort "), "Show me Heap Sort");
}
