//! Seeded random trees are flattened into markup runs interleaved with
//! foreign nodes, the way a template front end lowers them, and must come
//! back out of the rewrite pass unchanged.

use markup_test_support::{Lcg, env_u64};
use template_ir::{IrSnapshot, Node, RewritePass, attribute_node};

const CONTAINERS: [&str; 5] = ["div", "span", "p", "section", "b"];
const VOIDS: [&str; 3] = ["br", "img", "input"];
const WORDS: [&str; 4] = ["alpha", "beta", "x", "hello world"];

/// Collects the flat child list: consecutive markup is one run, foreign
/// nodes break runs.
#[derive(Default)]
struct Flattener {
    flat: Vec<Node>,
    pending: String,
}

impl Flattener {
    fn markup(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    fn foreign(&mut self, node: Node) {
        self.flush();
        self.flat.push(node);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.flat.push(Node::markup(std::mem::take(&mut self.pending)));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush();
        self.flat
    }
}

fn gen_children(rng: &mut Lcg, depth: usize, out: &mut Flattener, counter: &mut usize) -> Vec<Node> {
    let mut children = Vec::new();
    let mut last_was_text = false;
    let count = rng.gen_range(5);
    for _ in 0..count {
        match rng.gen_range(4) {
            0 if !last_was_text => {
                let word = WORDS[rng.gen_range(WORDS.len())];
                out.markup(word);
                children.push(Node::text(word));
                last_was_text = true;
                continue;
            }
            1 => {
                *counter += 1;
                let node = Node::foreign("expr", format!("E{counter}"));
                out.foreign(node.clone());
                children.push(node);
            }
            2 => {
                let name = VOIDS[rng.gen_range(VOIDS.len())];
                let attrs = gen_attributes(rng);
                out.markup(&format!("<{name}{}>", render_attributes(&attrs)));
                children.push(Node::element(name, attrs.into_iter().map(attr_node).collect()));
            }
            _ if depth > 0 => {
                let name = CONTAINERS[rng.gen_range(CONTAINERS.len())];
                let attrs = gen_attributes(rng);
                out.markup(&format!("<{name}{}>", render_attributes(&attrs)));
                let mut element_children: Vec<Node> = attrs.into_iter().map(attr_node).collect();
                element_children.extend(gen_children(rng, depth - 1, out, counter));
                out.markup(&format!("</{name}>"));
                children.push(Node::element(name, element_children));
            }
            _ => {
                *counter += 1;
                let node = Node::foreign("expr", format!("E{counter}"));
                out.foreign(node.clone());
                children.push(node);
            }
        }
        last_was_text = false;
    }
    children
}

fn gen_attributes(rng: &mut Lcg) -> Vec<(String, String)> {
    (0..rng.gen_range(3))
        .map(|i| (format!("a{i}"), WORDS[rng.gen_range(WORDS.len())].to_string()))
        .collect()
}

fn render_attributes(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(" {name}=\"{value}\""))
        .collect()
}

fn attr_node((name, value): (String, String)) -> Node {
    attribute_node(name, Some(value))
}

#[test]
fn random_trees_survive_flattening() {
    let runs = env_u64("MARKUP_REWRITE_RANDOM_RUNS", 200);
    let seed = env_u64("MARKUP_REWRITE_RANDOM_SEED", 0xC0FFEE);
    let mut rng = Lcg::new(seed);
    let pass = RewritePass::default();
    for run in 0..runs {
        let mut flattener = Flattener::default();
        let mut counter = 0usize;
        let expected_children = gen_children(&mut rng, 4, &mut flattener, &mut counter);
        let expected = Node::method("Render", expected_children);
        let mut actual = Node::method("Render", flattener.finish());
        let input = IrSnapshot::new(&actual).render();

        pass.run(&mut actual)
            .unwrap_or_else(|err| panic!("run {run} (seed {seed:#x}) failed: {err}\ninput:\n{input}"));
        assert_eq!(
            actual,
            expected,
            "run {run} (seed {seed:#x}) mismatch\ninput:\n{input}\nactual:\n{}",
            IrSnapshot::new(&actual)
        );
    }
}

#[test]
fn dropping_any_close_tag_is_fatal() {
    let mut rng = Lcg::new(0xBADC0DE);
    let pass = RewritePass::default();
    for _ in 0..50 {
        let depth = 1 + rng.gen_range(4);
        let names: Vec<&str> = (0..depth)
            .map(|_| CONTAINERS[rng.gen_range(CONTAINERS.len())])
            .collect();
        let skip = rng.gen_range(depth);
        let mut text = String::new();
        for name in &names {
            text.push_str(&format!("<{name}>"));
        }
        for (i, name) in names.iter().enumerate().rev() {
            if i != skip {
                text.push_str(&format!("</{name}>"));
            }
        }
        let mut tree = Node::method("Render", vec![Node::markup(text.clone())]);
        assert!(pass.run(&mut tree).is_err(), "accepted unbalanced markup {text:?}");
    }
}
