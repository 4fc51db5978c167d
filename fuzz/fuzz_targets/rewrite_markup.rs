#![no_main]

use libfuzzer_sys::fuzz_target;
use template_ir::{Node, RewritePass};

fn count_foreign(node: &Node) -> usize {
    let own = usize::from(matches!(node, Node::Foreign { .. }));
    own + node
        .children()
        .map_or(0, |children| children.iter().map(count_foreign).sum())
}

// NUL separates markup runs; an expression node sits between neighbours.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut children = Vec::new();
    for (i, run) in text.split('\0').enumerate() {
        if i > 0 {
            children.push(Node::foreign("expr", i.to_string()));
        }
        children.push(Node::markup(run));
    }
    let mut tree = Node::method("Render", children);
    let foreign_before = count_foreign(&tree);

    if RewritePass::default().run(&mut tree).is_ok() {
        assert!(!tree.contains_markup());
        assert_eq!(count_foreign(&tree), foreign_before);
        let once = tree.clone();
        RewritePass::default()
            .run(&mut tree)
            .expect("rewritten tree must rewrite again");
        assert_eq!(tree, once);
    }
});
