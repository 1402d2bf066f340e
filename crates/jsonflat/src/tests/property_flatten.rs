use alloc::{
    boxed::Box,
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::{Arbitrary, Gen, QuickCheck};

use crate::parse_json;

const KEY_CHARS: &[char] = &['a', 'b', 'x', 'é', '_'];
const MAX_DEPTH: usize = 4;

#[derive(Clone, Debug)]
enum Node {
    Text(String),
    Literal(String),
    Object(BTreeMap<String, Node>),
    Array(Vec<Node>),
}

/// A random object tree. Keys never contain the separator, so every leaf has
/// a distinct dotted path.
#[derive(Clone, Debug)]
struct Doc(BTreeMap<String, Node>);

fn gen_key(g: &mut Gen) -> String {
    let len = 1 + usize::arbitrary(g) % 3;
    (0..len).map(|_| *g.choose(KEY_CHARS).unwrap()).collect()
}

fn gen_leaf(g: &mut Gen) -> Node {
    match u8::arbitrary(g) % 5 {
        0 => Node::Literal(i64::arbitrary(g).to_string()),
        1 => Node::Literal(format!("{}.5e-3", i32::arbitrary(g))),
        2 => Node::Literal((*g.choose(&["true", "false", "null"]).unwrap()).to_string()),
        _ => {
            let len = usize::arbitrary(g) % 4;
            Node::Text((0..len).map(|_| *g.choose(KEY_CHARS).unwrap()).collect())
        }
    }
}

fn gen_object(g: &mut Gen, depth: usize) -> BTreeMap<String, Node> {
    let members = usize::arbitrary(g) % 5;
    (0..members)
        .map(|_| {
            let node = match u8::arbitrary(g) % 16 {
                0 => Node::Array(Vec::new()),
                1..=5 if depth < MAX_DEPTH => Node::Object(gen_object(g, depth + 1)),
                _ => gen_leaf(g),
            };
            (gen_key(g), node)
        })
        .collect()
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        Doc(gen_object(g, 1))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let entries: Vec<_> = self.0.clone().into_iter().collect();
        Box::new((0..entries.len()).map(move |skip| {
            Doc(entries
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, entry)| entry.clone())
                .collect())
        }))
    }
}

fn render_object(object: &BTreeMap<String, Node>, out: &mut String) {
    out.push('{');
    for (i, (key, node)) in object.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(key);
        out.push_str("\":");
        match node {
            Node::Text(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
            Node::Literal(literal) => out.push_str(literal),
            Node::Object(inner) => render_object(inner, out),
            Node::Array(_) => out.push_str("[]"),
        }
    }
    out.push('}');
}

/// Expected leaves, or `None` when an array makes the document unsupported.
fn expected_leaves(
    object: &BTreeMap<String, Node>,
    base: Option<&str>,
    out: &mut Vec<(String, Option<String>)>,
) -> Option<()> {
    for (key, node) in object {
        let path = match base {
            Some(base) => format!("{base}.{key}"),
            None => key.clone(),
        };
        match node {
            Node::Text(text) if text.is_empty() => out.push((path, None)),
            Node::Text(text) | Node::Literal(text) => out.push((path, Some(text.clone()))),
            Node::Object(inner) => expected_leaves(inner, Some(&path), out)?,
            Node::Array(_) => return None,
        }
    }
    Some(())
}

#[test]
fn flattened_paths_match_the_tree() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let mut src = String::new();
        render_object(&doc.0, &mut src);

        let mut expected = Vec::new();
        let expected = expected_leaves(&doc.0, None, &mut expected).map(|()| {
            expected.sort();
            expected
        });

        let actual = parse_json(&src).map(|map| {
            map.iter()
                .map(|(k, v)| (k.to_string(), v.map(ToString::to_string)))
                .collect::<Vec<_>>()
        });

        actual == expected
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Doc) -> bool);
}
