use super::*;

use crate::dom::{DocumentTree, NodeId};
use crate::format::FormatKind;

fn parse(markup: &str) -> DocumentTree {
    DocumentTree::parse(markup).expect("fixture markup must parse")
}

fn serialize(tree: &DocumentTree) -> String {
    tree.serialize_children(tree.root())
}

fn find_text(tree: &DocumentTree, needle: &str) -> NodeId {
    fn walk(tree: &DocumentTree, id: NodeId, needle: &str) -> Option<NodeId> {
        if tree.text(id) == Some(needle) {
            return Some(id);
        }
        for &child in tree.children(id) {
            if let Some(found) = walk(tree, child, needle) {
                return Some(found);
            }
        }
        None
    }
    walk(tree, tree.root(), needle).expect("fixture must contain the text node")
}

fn range_over(tree: &DocumentTree, start: (&str, usize), end: (&str, usize)) -> Range {
    Range::new(
        Boundary {
            node: find_text(tree, start.0),
            offset: start.1,
        },
        Boundary {
            node: find_text(tree, end.0),
            offset: end.1,
        },
    )
}

fn toggle(tree: &mut DocumentTree, range: &mut Range, kind: FormatKind) -> bool {
    surgeon::toggle_format(tree, range, kind)
}

#[test]
fn wrapping_a_plain_selection() {
    let mut tree = parse("hello world");
    let mut range = range_over(&tree, ("hello world", 0), ("hello world", 5));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "<strong class=\"bold\">hello</strong> world");
}

#[test]
fn toggling_the_whole_formatted_text_removes_the_element() {
    let mut tree = parse("<strong class=\"bold\">hello world</strong>");
    let mut range = range_over(&tree, ("hello world", 0), ("hello world", 11));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "hello world");
}

#[test]
fn stripping_a_format_from_part_of_an_element() {
    let mut tree = parse("<strong class=\"bold\">hello world</strong>");
    let mut range = range_over(&tree, ("hello world", 0), ("hello world", 5));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "hello<strong class=\"bold\"> world</strong>");
}

#[test]
fn stripping_rewraps_intermediate_formats() {
    let mut tree =
        parse("<strong class=\"bold\"><em class=\"italic\">hello world</em></strong>");
    let mut range = range_over(&tree, ("hello world", 0), ("hello world", 5));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(
        serialize(&tree),
        "<em class=\"italic\">hello</em><strong class=\"bold\"><em class=\"italic\"> world</em></strong>"
    );
}

#[test]
fn full_coverage_across_siblings_unwraps_them_all() {
    let mut tree = parse(
        "<strong class=\"bold\"><em class=\"italic\">A</em></strong><strong class=\"bold\"><span class=\"underline\">B</span></strong>",
    );
    let mut range = range_over(&tree, ("A", 0), ("B", 1));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(
        serialize(&tree),
        "<em class=\"italic\">A</em><span class=\"underline\">B</span>"
    );
}

#[test]
fn full_coverage_with_matching_elements_nested_inside_others() {
    let mut tree = parse(
        "<em><strong class=\"bold\">A</strong></em><span class=\"underline\"><strong class=\"bold\">B</strong></span>",
    );
    let mut range = range_over(&tree, ("A", 0), ("B", 1));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "<em>A</em><span class=\"underline\">B</span>");
}

#[test]
fn whitespace_between_formatted_runs_still_counts_as_full_coverage() {
    let mut tree =
        parse("<strong class=\"bold\">hello</strong> <strong class=\"bold\">world</strong>");
    let mut range = range_over(&tree, ("hello", 0), ("world", 5));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "hello world");
}

#[test]
fn one_uncovered_character_turns_the_toggle_into_a_wrap() {
    let mut tree = parse("<strong class=\"bold\">hello</strong> world");
    let mut range = range_over(&tree, ("hello", 0), (" world", 6));

    assert!(toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "<strong class=\"bold\">hello world</strong>");
}

#[test]
fn same_tag_with_a_different_class_is_not_the_same_format() {
    let mut tree = parse("<span class=\"underline\">hi</span>");
    let mut range = range_over(&tree, ("hi", 0), ("hi", 2));

    assert!(toggle(&mut tree, &mut range, FormatKind::Important));
    assert_eq!(
        serialize(&tree),
        "<span class=\"underline\"><span class=\"imp\">hi</span></span>"
    );
}

#[test]
fn toggling_twice_returns_to_the_original_text() {
    let mut tree = parse("hello world");
    let mut range = range_over(&tree, ("hello world", 0), ("hello world", 11));
    assert!(toggle(&mut tree, &mut range, FormatKind::Italic));
    assert_eq!(serialize(&tree), "<em class=\"italic\">hello world</em>");

    let mut range = range_over(&tree, ("hello world", 0), ("hello world", 11));
    assert!(toggle(&mut tree, &mut range, FormatKind::Italic));
    assert_eq!(serialize(&tree), "hello world");
}

#[test]
fn formatting_never_changes_the_text_itself() {
    let mut tree = parse("a<em class=\"italic\">b</em>c d");
    let mut range = range_over(&tree, ("a", 0), ("c d", 1));

    assert!(toggle(&mut tree, &mut range, FormatKind::Superscript));
    assert_eq!(tree.text_content(tree.root()), "abc d");
}

#[test]
fn an_empty_document_cannot_be_formatted() {
    let mut tree = DocumentTree::new();
    let root = tree.root();
    let mut range = Range::new(
        Boundary {
            node: root,
            offset: 0,
        },
        Boundary {
            node: root,
            offset: 0,
        },
    );
    assert!(!toggle(&mut tree, &mut range, FormatKind::Bold));
    assert_eq!(serialize(&tree), "");
}

#[test]
fn insert_link_replaces_the_selection() {
    let mut tree = parse("click here now");
    let mut range = range_over(&tree, ("click here now", 6), ("click here now", 10));

    let link = surgeon::insert_link(&mut tree, &mut range, "here", "https://example.com");
    assert_eq!(tree.link_target(link), Some("https://example.com"));
    assert_eq!(
        serialize(&tree),
        "click <a class=\"a-link\" href=\"https://example.com\">here</a> now"
    );
}

#[test]
fn insert_link_at_a_collapsed_range_inserts_new_text() {
    let mut tree = parse("ab");
    let mut range = range_over(&tree, ("ab", 1), ("ab", 1));

    surgeon::insert_link(&mut tree, &mut range, "link", "page");
    assert_eq!(
        serialize(&tree),
        "a<a class=\"a-link\" href=\"page\">link</a>b"
    );
}
