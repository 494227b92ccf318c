use super::*;

use crate::dom::DocumentTree;
use crate::format::FormatKind;

fn parse(markup: &str) -> DocumentTree {
    DocumentTree::parse(markup).expect("fixture markup must parse")
}

fn normalize(tree: &mut DocumentTree, kind: FormatKind) -> String {
    let root = tree.root();
    cleanup::normalize(tree, root, kind.descriptor());
    tree.serialize_children(root)
}

#[test]
fn adjacent_same_format_elements_are_merged() {
    let mut tree = parse("<strong class=\"bold\">A</strong><strong class=\"bold\">B</strong> ");
    assert_eq!(
        normalize(&mut tree, FormatKind::Bold),
        "<strong class=\"bold\">AB</strong> "
    );
}

#[test]
fn whitespace_only_text_between_elements_does_not_block_the_merge() {
    let mut tree = parse("<strong class=\"bold\">A</strong> <strong class=\"bold\">B</strong>");
    assert_eq!(
        normalize(&mut tree, FormatKind::Bold),
        "<strong class=\"bold\">AB</strong> "
    );
}

#[test]
fn visible_text_between_elements_blocks_the_merge() {
    let markup = "<strong class=\"bold\">A</strong>x<strong class=\"bold\">B</strong>";
    let mut tree = parse(markup);
    assert_eq!(normalize(&mut tree, FormatKind::Bold), markup);
}

#[test]
fn elements_under_different_parents_are_never_merged() {
    let markup =
        "<em class=\"italic\"><strong class=\"bold\">A</strong></em><strong class=\"bold\">B</strong>";
    let mut tree = parse(markup);
    assert_eq!(normalize(&mut tree, FormatKind::Bold), markup);
}

#[test]
fn nesting_the_same_format_is_flattened() {
    let mut tree = parse("<strong class=\"bold\">A<strong class=\"bold\">B</strong>C</strong>");
    assert_eq!(
        normalize(&mut tree, FormatKind::Bold),
        "<strong class=\"bold\">ABC</strong>"
    );
}

#[test]
fn empty_format_elements_are_pruned() {
    let mut tree = parse("a<em class=\"italic\"></em>b");
    assert_eq!(normalize(&mut tree, FormatKind::Italic), "ab");
}

#[test]
fn empty_elements_are_pruned_at_any_depth() {
    let mut tree = parse("<strong class=\"bold\"><em class=\"italic\"></em>x</strong>");
    assert_eq!(
        normalize(&mut tree, FormatKind::Bold),
        "<strong class=\"bold\">x</strong>"
    );
}

#[test]
fn a_different_class_on_the_same_tag_is_left_alone() {
    let markup = "<span class=\"imp\">A</span><span class=\"underline\">B</span>";
    let mut tree = parse(markup);
    assert_eq!(normalize(&mut tree, FormatKind::Important), markup);
}

#[test]
fn merging_keeps_nested_formatting_of_the_moved_children() {
    let mut tree = parse(
        "<strong class=\"bold\">A</strong><strong class=\"bold\"><em class=\"italic\">B</em></strong>",
    );
    assert_eq!(
        normalize(&mut tree, FormatKind::Bold),
        "<strong class=\"bold\">A<em class=\"italic\">B</em></strong>"
    );
}
