/// Section a topic is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicCategory {
    DataStructure,
    Algorithm,
    Pattern,
}

/// A predefined topic and the generation request sent for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopicPreset {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: TopicCategory,
    pub request: &'static str,
}

macro_rules! presets {
    ($($category:ident $slug:literal, $title:literal => $request:literal;)+) => {
        &[$(TopicPreset {
            slug: $slug,
            title: $title,
            category: TopicCategory::$category,
            request: $request,
        }),+]
    };
}

pub const TOPICS: &[TopicPreset] = presets! {
    DataStructure "array-basics", "Array Basics" =>
        "Show me fundamental array operations: creation, indexing, insertion, deletion, and traversal using array [1, 2, 3, 4, 5]. Include definition of arrays and when to use them.";
    DataStructure "linked-list", "Linked List" =>
        "Visualize linked list insertion and reversal with nodes 1, 2, 3, 4";
    DataStructure "stack-queue", "Stack & Queue" =>
        "Show me stack push/pop and queue enqueue/dequeue operations";
    DataStructure "binary-tree", "Binary Tree" =>
        "Demonstrate binary tree traversal (inorder, preorder, postorder)";
    DataStructure "bst", "Binary Search Tree" =>
        "Show me binary search tree insertion for values 15, 10, 20, 8, 12";
    DataStructure "graph", "Graph" =>
        "Visualize a graph and show BFS traversal";
    Algorithm "bubble-sort", "Bubble Sort" =>
        "Show me bubble sort step-by-step on array [5, 2, 8, 1, 9]";
    Algorithm "merge-sort", "Merge Sort" =>
        "Visualize merge sort divide and conquer on [5, 2, 8, 1]";
    Algorithm "quick-sort", "Quick Sort" =>
        "Show me quick sort with partitioning on [5, 2, 8, 1, 9]";
    Algorithm "binary-search", "Binary Search" =>
        "Demonstrate binary search for value 7 in sorted array [1, 3, 5, 7, 9, 11]";
    Algorithm "bfs", "Breadth-First Search" =>
        "Show me breadth-first search on a sample graph";
    Algorithm "dfs", "Depth-First Search" =>
        "Visualize depth-first search on a sample graph";
    Pattern "two-pointers", "Two Pointers" =>
        "Show me the two pointers pattern for finding pair sum in array [1, 2, 3, 4, 5, 6] with target 7";
    Pattern "sliding-window", "Sliding Window" =>
        "Demonstrate sliding window pattern to find maximum sum subarray of size 3 in [2, 1, 5, 1, 3, 2]";
    Pattern "fast-slow-pointers", "Fast & Slow Pointers" =>
        "Visualize fast and slow pointers for cycle detection in a linked list";
    Pattern "merge-intervals", "Merge Intervals" =>
        "Show me how to merge overlapping intervals: [[1,3], [2,6], [8,10], [15,18]]";
    Pattern "backtracking", "Backtracking" =>
        "Demonstrate backtracking pattern with N-Queens problem for n=4";
    Pattern "dynamic-programming", "Dynamic Programming" =>
        "Visualize dynamic programming with Fibonacci sequence using memoization";
};

pub fn find(slug: &str) -> Option<&'static TopicPreset> {
    TOPICS.iter().find(|t| t.slug.eq_ignore_ascii_case(slug.trim()))
}

/// Generation request for `slug`, falling back to `Show me {title}` for unknown topics.
pub fn request_for(slug: &str, title: &str) -> String {
    match find(slug) {
        Some(preset) => preset.request.to_owned(),
        None => format!("Show me {}", title.trim()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/topics.rs"]
mod tests;
