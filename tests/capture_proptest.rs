//! Property-based tests for the capture engine
//!
//! Generates random well-formed delimiter trees, renders them to text, and
//! checks that parsing recovers exactly the generated structure invariants:
//! container counts per family, marker placement, and empty stacks at end
//! of parse. Also checks that lenient parsing never fails on arbitrary
//! delimiter soup.

use proptest::prelude::*;

use capset::capset::builtins::register_default_pairs;
use capset::capset::{NodeTree, Parser};

const FAMILIES: [(&str, char, char); 3] = [
    ("brace", '{', '}'),
    ("bracket", '[', ']'),
    ("paren", '(', ')'),
];

/// A generated well-formed input fragment
#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Pair(usize, Vec<Piece>),
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    let leaf = "[a-z]{1,4}".prop_map(Piece::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (0..FAMILIES.len(), prop::collection::vec(inner, 0..4))
            .prop_map(|(family, children)| Piece::Pair(family, children))
    })
}

fn input_strategy() -> impl Strategy<Value = Vec<Piece>> {
    prop::collection::vec(piece_strategy(), 0..5)
}

/// Render pieces to text, tallying generated pairs per family
fn render(pieces: &[Piece], out: &mut String, counts: &mut [usize; 3]) {
    for piece in pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Pair(family, children) => {
                let (_, open, close) = FAMILIES[*family];
                counts[*family] += 1;
                out.push(open);
                render(children, out, counts);
                out.push(close);
            }
        }
    }
}

fn default_parser() -> Parser {
    let mut parser = Parser::new();
    register_default_pairs(&mut parser).unwrap();
    parser
}

/// Every container of a captured family must start with its open marker
/// and end with its close marker
fn assert_marker_placement(tree: &NodeTree) {
    for id in tree.descendants(tree.root()) {
        let kind = tree.kind(id).to_string();
        if !FAMILIES.iter().any(|(name, _, _)| *name == kind) {
            continue;
        }
        let children = tree.children(id);
        assert!(children.len() >= 2, "container '{}' missing markers", kind);
        assert_eq!(tree.kind(children[0]), format!("{}.open", kind));
        assert_eq!(
            tree.kind(*children.last().unwrap()),
            format!("{}.close", kind)
        );
    }
}

proptest! {
    #[test]
    fn parse_recovers_generated_structure(pieces in input_strategy()) {
        let mut input = String::new();
        let mut counts = [0usize; 3];
        render(&pieces, &mut input, &mut counts);

        let mut parser = default_parser();
        let tree = parser.parse(&input).unwrap().clone();

        for (i, (kind, _, _)) in FAMILIES.iter().enumerate() {
            prop_assert_eq!(tree.count_kind(tree.root(), kind), counts[i]);
        }
        assert_marker_placement(&tree);

        prop_assert!(parser.unclosed().is_empty());
        let total: usize = counts.iter().sum();
        prop_assert_eq!(parser.set_count(), total as isize);
    }

    #[test]
    fn deep_same_kind_nesting_pairs_lifo(depth in 1usize..25) {
        let input = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        let mut parser = default_parser();
        let tree = parser.parse(&input).unwrap().clone();

        prop_assert_eq!(tree.count_kind(tree.root(), "brace"), depth);
        prop_assert!(parser.unclosed().is_empty());

        // Spans must nest strictly inward, one byte per level.
        let mut id = tree.children(tree.root())[0];
        for level in 0..depth {
            let node = tree.node(id);
            prop_assert_eq!(node.span.start, level);
            prop_assert_eq!(node.span.end, 2 * depth - level);
            let children = tree.children(id);
            if level + 1 < depth {
                prop_assert_eq!(children.len(), 3);
                id = children[1];
            } else {
                prop_assert_eq!(children.len(), 2);
            }
        }
    }

    #[test]
    fn lenient_parsing_never_fails_on_delimiter_soup(input in "[a-z{}\\[\\]()]{0,40}") {
        let mut parser = default_parser();
        // Arbitrary delimiter sequences may be wildly unbalanced, but the
        // lenient policy must always produce a tree.
        let tree = parser.parse(&input).unwrap();
        prop_assert!(tree.len() >= 1);
    }

    #[test]
    fn strict_and_lenient_agree_on_balanced_input(pieces in input_strategy()) {
        use capset::capset::snapshot::snapshot;
        use capset::capset::ParserOptions;

        let mut input = String::new();
        let mut counts = [0usize; 3];
        render(&pieces, &mut input, &mut counts);

        let mut lenient = default_parser();
        let lenient_snap = snapshot(lenient.parse(&input).unwrap());

        let mut strict = Parser::with_options(ParserOptions {
            strict: true,
            ..ParserOptions::default()
        });
        register_default_pairs(&mut strict).unwrap();
        let strict_snap = snapshot(strict.parse(&input).unwrap());

        prop_assert_eq!(lenient_snap, strict_snap);
    }
}
