use super::*;

fn parse(markup: &str) -> DocumentTree {
    DocumentTree::parse(markup).expect("fixture markup must parse")
}

fn serialize(tree: &DocumentTree) -> String {
    tree.serialize_children(tree.root())
}

fn first_text(tree: &DocumentTree) -> NodeId {
    fn walk(tree: &DocumentTree, id: NodeId) -> Option<NodeId> {
        if tree.is_text(id) {
            return Some(id);
        }
        for &child in tree.children(id) {
            if let Some(found) = walk(tree, child) {
                return Some(found);
            }
        }
        None
    }
    walk(tree, tree.root()).expect("fixture must contain a text node")
}

#[test]
fn new_tree_has_an_empty_element_root() {
    let tree = DocumentTree::new();
    assert!(tree.is_element(tree.root()));
    assert_eq!(tree.tag(tree.root()), Some("div"));
    assert!(tree.children(tree.root()).is_empty());
    assert_eq!(serialize(&tree), "");
}

#[test]
fn parse_and_serialize_round_trip() {
    let markup = "plain <strong class=\"bold\">bold <em class=\"italic\">both</em></strong> tail";
    let tree = parse(markup);
    assert_eq!(serialize(&tree), markup);
}

#[test]
fn parse_reads_link_targets() {
    let tree = parse("<a class=\"a-link\" href=\"https://example.com\">here</a>");
    let link = tree.children(tree.root())[0];
    assert_eq!(tree.tag(link), Some("a"));
    assert_eq!(tree.class(link), Some("a-link"));
    assert_eq!(tree.link_target(link), Some("https://example.com"));
    assert_eq!(tree.text_content(link), "here");
}

#[test]
fn serialize_escapes_text_and_attributes() {
    let mut tree = DocumentTree::new();
    let root = tree.root();
    let text = tree.create_text("a < b & c > d");
    tree.append_child(root, text);
    let link = tree.create_element("a", Some("a-link"));
    tree.set_link_target(link, Some("https://example.com/?q=\"x\"&y".to_string()));
    let label = tree.create_text("go");
    tree.append_child(link, label);
    tree.append_child(root, link);

    let markup = serialize(&tree);
    assert_eq!(
        markup,
        "a &lt; b &amp; c &gt; d<a class=\"a-link\" href=\"https://example.com/?q=&quot;x&quot;&amp;y\">go</a>"
    );

    let reparsed = parse(&markup);
    assert_eq!(tree.text_content(tree.root()), reparsed.text_content(reparsed.root()));
}

#[test]
fn parse_treats_a_bare_ampersand_literally() {
    let tree = parse("fish & chips");
    assert_eq!(tree.text_content(tree.root()), "fish & chips");
}

#[test]
fn parse_rejects_mismatched_closing_tags() {
    assert!(DocumentTree::parse("<strong class=\"bold\">x</em>").is_err());
}

#[test]
fn parse_rejects_trailing_closing_tags() {
    assert!(DocumentTree::parse("x</strong>").is_err());
}

#[test]
fn parse_rejects_unterminated_elements() {
    assert!(DocumentTree::parse("<strong class=\"bold\">x").is_err());
    assert!(DocumentTree::parse("<strong class=\"bold").is_err());
}

#[test]
fn split_text_node_divides_at_a_character_offset() {
    let mut tree = parse("héllo world");
    let text = first_text(&tree);
    let tail = tree.split_text_node(text, 5);

    assert_eq!(tree.text(text), Some("héllo"));
    assert_eq!(tree.text(tail), Some(" world"));
    assert_eq!(tree.children(tree.root()), &[text, tail]);
    assert_eq!(serialize(&tree), "héllo world");
}

#[test]
fn split_element_copies_tag_class_and_link_target() {
    let mut tree = parse("<a class=\"a-link\" href=\"https://example.com\">one two</a>");
    let link = tree.children(tree.root())[0];
    let text = first_text(&tree);
    tree.split_text_node(text, 3);
    let tail = tree.split_element(link, 1);

    assert_eq!(tree.tag(tail), Some("a"));
    assert_eq!(tree.class(tail), Some("a-link"));
    assert_eq!(tree.link_target(tail), Some("https://example.com"));
    assert_eq!(
        serialize(&tree),
        "<a class=\"a-link\" href=\"https://example.com\">one</a><a class=\"a-link\" href=\"https://example.com\"> two</a>"
    );
}

#[test]
fn unwrap_element_replaces_it_with_its_children() {
    let mut tree = parse("a<em class=\"italic\">b<strong class=\"bold\">c</strong></em>d");
    let em = tree.children(tree.root())[1];
    tree.unwrap_element(em);

    assert_eq!(serialize(&tree), "ab<strong class=\"bold\">c</strong>d");
    assert!(tree.parent(em).is_none());
    assert!(tree.children(em).is_empty());
}

#[test]
fn insert_child_moves_a_node_from_its_old_parent() {
    let mut tree = parse("<em class=\"italic\">x</em><strong class=\"bold\">y</strong>");
    let em = tree.children(tree.root())[0];
    let strong = tree.children(tree.root())[1];
    let x = tree.children(em)[0];

    tree.insert_child(strong, 0, x);
    assert!(tree.children(em).is_empty());
    assert_eq!(
        serialize(&tree),
        "<em class=\"italic\"></em><strong class=\"bold\">xy</strong>"
    );
}

#[test]
fn child_index_and_subtree_queries() {
    let tree = parse("a<strong class=\"bold\">b</strong>c");
    let root = tree.root();
    let strong = tree.children(root)[1];
    let b = tree.children(strong)[0];

    assert_eq!(tree.child_index(strong), Some(1));
    assert!(tree.is_in_subtree(root, b));
    assert!(tree.is_in_subtree(strong, b));
    assert!(!tree.is_in_subtree(strong, tree.children(root)[0]));
}

#[test]
fn descendant_elements_are_listed_in_document_order() {
    let tree = parse("<em class=\"italic\"><strong class=\"bold\">a</strong></em><span class=\"underline\">b</span>");
    let root = tree.root();
    let elements = tree.descendant_elements(root);
    let tags: Vec<_> = elements.iter().map(|&id| tree.tag(id)).collect();
    assert_eq!(tags, vec![Some("em"), Some("strong"), Some("span")]);
}

#[test]
fn text_content_concatenates_the_subtree() {
    let tree = parse("a<em class=\"italic\">b<strong class=\"bold\">c</strong></em>d");
    assert_eq!(tree.text_content(tree.root()), "abcd");
}

#[test]
fn cloning_preserves_node_ids() {
    let tree = parse("x<strong class=\"bold\">y</strong>");
    let strong = tree.children(tree.root())[1];
    let clone = tree.clone();
    assert_eq!(clone.tag(strong), Some("strong"));
    assert_eq!(clone.text_content(strong), "y");
}
