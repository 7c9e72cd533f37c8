use crate::arena::GrammarArena;
use crate::ast::{HookRegistry, ast_build, parse_and_build};
use crate::error::{AstError, BuildError};

#[derive(Debug, PartialEq)]
enum Node {
    Int(i64),
    List(Vec<Node>),
}

#[test]
fn untagged_tree_is_fully_pruned() {
    let mut arena = GrammarArena::new();
    let a = arena.char(None, b'a');
    let b = arena.char(None, b'b');
    let seq = arena.and(None, &[a, b]);

    let cpt = arena.parse(seq, "ab").unwrap();
    let mut registry: HookRegistry<'_, Node> = HookRegistry::new(1);
    assert_eq!(ast_build(&cpt, &mut registry).unwrap(), None);
}

#[test]
fn identity_registry_collects_children_in_order() {
    const ON_INT: usize = 0;
    const ON_LIST: usize = 1;

    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, ON_INT);
    let comma = arena.char(None, b',');
    let list = arena.delimited(Some("list"), int, Some(comma));
    arena.set_action(list, ON_LIST);

    let cpt = arena.parse(list, "1,2,3").unwrap();

    let mut registry: HookRegistry<'_, Node> = HookRegistry::new(2);
    registry.set_action(ON_INT, |stack, node, _children| {
        let value = node
            .semantic_text()
            .parse()
            .map_err(|_| AstError::action("bad integer literal"))?;
        stack.push(Node::Int(value));
        Ok(())
    });
    registry.set_action(ON_LIST, |stack, _node, children| {
        stack.push(Node::List(children));
        Ok(())
    });

    let ast = ast_build(&cpt, &mut registry).unwrap().unwrap();
    assert_eq!(
        ast,
        Node::List(vec![Node::Int(1), Node::Int(2), Node::Int(3)])
    );
}

#[test]
fn multiple_roots_is_an_error() {
    const ON_INT: usize = 0;

    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, ON_INT);
    let comma = arena.char(None, b',');
    let list = arena.delimited(None, int, Some(comma));

    let cpt = arena.parse(list, "1,2").unwrap();

    let mut registry: HookRegistry<'_, Node> = HookRegistry::new(1);
    registry.set_action(ON_INT, |stack, node, _| {
        stack.push(Node::Int(node.text().parse().unwrap()));
        Ok(())
    });

    // Two ints flatten up through the untagged list node and both survive.
    assert_eq!(
        ast_build(&cpt, &mut registry).unwrap_err(),
        AstError::MultipleRoots(2)
    );
}

#[test]
fn action_error_stops_the_build() {
    const ON_INT: usize = 0;

    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, ON_INT);

    let cpt = arena.parse(int, "1").unwrap();

    let mut registry: HookRegistry<'_, Node> = HookRegistry::new(1);
    registry.set_action(ON_INT, |_, _, _| Err(AstError::action("boom")));

    assert_eq!(
        ast_build(&cpt, &mut registry).unwrap_err(),
        AstError::Action("boom".to_owned())
    );
}

#[test]
fn out_of_range_tag_is_rejected() {
    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, 7);

    let cpt = arena.parse(int, "1").unwrap();
    let mut registry: HookRegistry<'_, Node> = HookRegistry::new(1);

    assert_eq!(
        ast_build(&cpt, &mut registry).unwrap_err(),
        AstError::InvalidAction(7)
    );
}

#[test]
fn unregistered_tag_flattens_like_untagged() {
    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, 0);

    let cpt = arena.parse(int, "1").unwrap();
    let mut registry: HookRegistry<'_, Node> = HookRegistry::new(1);

    assert_eq!(ast_build(&cpt, &mut registry).unwrap(), None);
}

#[test]
fn enter_hook_runs_in_preorder() {
    let mut arena = GrammarArena::new();
    let a = arena.char(Some("a"), b'a');
    let b = arena.char(Some("b"), b'b');
    let seq = arena.and(Some("seq"), &[a, b]);

    let cpt = arena.parse(seq, "ab").unwrap();

    let mut visited = Vec::new();
    {
        let mut registry: HookRegistry<'_, Node> = HookRegistry::new(1);
        registry.set_enter(|node| {
            visited.push(node.name().to_owned());
            Ok(())
        });
        ast_build(&cpt, &mut registry).unwrap();
    }
    assert_eq!(visited, ["seq", "a", "b"]);
}

#[test]
fn parse_and_build_evaluates_left_chain() {
    const ON_INT: usize = 0;
    const ON_SUB: usize = 1;

    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, ON_INT);
    let minus = arena.char(None, b'-');
    let chain = arena.chainl1(Some("sub"), int, minus);
    arena.set_action(chain, ON_SUB);

    let mut registry: HookRegistry<'_, i64> = HookRegistry::new(2);
    registry.set_action(ON_INT, |stack, node, _| {
        stack.push(node.text().parse().unwrap());
        Ok(())
    });
    registry.set_action(ON_SUB, |stack, _, children| {
        // The operator node is untagged and contributes nothing.
        match children[..] {
            [left, right] => stack.push(left - right),
            _ => return Err(AstError::action("expected two operands")),
        }
        Ok(())
    });

    let value = parse_and_build(&arena, chain, "1-2-3", &mut registry)
        .unwrap()
        .unwrap();
    assert_eq!(value, -4);
}

#[test]
fn parse_and_build_evaluates_right_chain() {
    const ON_INT: usize = 0;
    const ON_POW: usize = 1;

    let mut arena = GrammarArena::new();
    let int = arena.integer(None);
    arena.set_action(int, ON_INT);
    let caret = arena.char(None, b'^');
    let chain = arena.chainr1(Some("pow"), int, caret);
    arena.set_action(chain, ON_POW);

    let mut registry: HookRegistry<'_, i64> = HookRegistry::new(2);
    registry.set_action(ON_INT, |stack, node, _| {
        stack.push(node.text().parse().unwrap());
        Ok(())
    });
    registry.set_action(ON_POW, |stack, _, children| {
        match children[..] {
            [base, exp] => stack.push(base.pow(exp as u32)),
            _ => return Err(AstError::action("expected two operands")),
        }
        Ok(())
    });

    let value = parse_and_build(&arena, chain, "2^3^2", &mut registry)
        .unwrap()
        .unwrap();
    assert_eq!(value, 512);
}

#[test]
fn parse_and_build_reports_parse_errors() {
    let mut arena = GrammarArena::new();
    let int = arena.integer(None);

    let mut registry: HookRegistry<'_, i64> = HookRegistry::new(1);
    let err = parse_and_build(&arena, int, "abc", &mut registry).unwrap_err();
    match err {
        BuildError::Parse(parse) => assert_eq!(parse.message, "Expected an integer"),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
