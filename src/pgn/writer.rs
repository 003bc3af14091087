//! Game tree to PGN text.

use crate::board::START_FEN;
use crate::options::PgnOptions;
use crate::tree::tags::SEVEN_TAG_ROSTER;
use crate::tree::{GameTree, NodeId};

// Written by the writer itself from the root position
const SETUP_TAGS: [&str; 3] = ["FEN", "SetUp", "Variant"];

/// One item of movetext in writing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Node(NodeId),
    Open,
    Close,
}

/// Every node below `root` in the order it appears in PGN, with parentheses
/// around variations.
///
/// At a branch the main move is written first, then each alternative in
/// brackets, then the main line continues.
#[must_use]
pub fn ordered_tokens(tree: &GameTree) -> Vec<Token> {
    let mut tokens = Vec::new();
    order_nodes(tree, tree.root(), &mut tokens, true);
    tokens
}

fn order_nodes(tree: &GameTree, start: NodeId, out: &mut Vec<Token>, skip_self: bool) {
    if !skip_self {
        out.push(Token::Node(start));
    }

    let mut id = start;
    let mut children = tree.node(id).map(|n| n.children()).unwrap_or(&[]);
    while let [only] = children {
        id = *only;
        out.push(Token::Node(id));
        children = tree.node(id).map(|n| n.children()).unwrap_or(&[]);
    }

    let Some((&main, variations)) = children.split_first() else {
        return;
    };
    out.push(Token::Node(main));
    for &child in variations {
        out.push(Token::Open);
        order_nodes(tree, child, out, false);
        out.push(Token::Close);
    }
    order_nodes(tree, main, out, true);
}

/// The movetext of `tree`, wrapped, ending with the `Result` tag value.
#[must_use]
pub fn movetext(tree: &GameTree, options: &PgnOptions) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut after_close = false;
    for token in ordered_tokens(tree) {
        match token {
            Token::Open => words.push("(".to_string()),
            Token::Close => words.push(")".to_string()),
            // A Black move resuming the main line after a variation needs
            // its number again
            Token::Node(id) => words.extend(
                tree.token(id, options.include_stats, after_close)
                    .split(' ')
                    .filter(|w| !w.is_empty())
                    .map(str::to_string),
            ),
        }
        after_close = token == Token::Close;
    }
    words.push(tree.tags.get("Result").unwrap_or("*").to_string());

    wrap(&words, options.line_width).join("\n")
}

/// Greedy word wrap keeping lines under `width`, with no space after `(` or
/// before `)`.
fn wrap(words: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in words {
        // Never start a line with a closing parenthesis
        if word == ")" && !line.is_empty() {
            line.push(')');
            continue;
        }
        let space = !line.is_empty() && !line.ends_with('(') && word != ")";
        if line.len() + usize::from(space) + word.len() >= width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
        } else if space {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Full PGN text for `tree`.
///
/// The `Result` tag is first updated from the end of the main line when that
/// position is terminal. Starting positions other than the standard one get
/// `FEN` and `SetUp` tags, plus `Variant "Chess960"` when needed.
pub fn write_pgn(tree: &mut GameTree, options: &PgnOptions) -> String {
    let end = tree.get_end(tree.root());
    if let Some(reason) = tree.terminal_reason(end) {
        tree.tags.set("Result", reason.result_string());
    }

    let mut lines: Vec<String> = Vec::new();
    for key in SEVEN_TAG_ROSTER {
        if let Some(value) = tree.tags.get(key).filter(|v| !v.is_empty()) {
            lines.push(format!("[{key} \"{}\"]", escape(value)));
        }
    }
    for (key, value) in tree.tags.iter() {
        if !SEVEN_TAG_ROSTER.contains(&key) && !SETUP_TAGS.contains(&key) {
            lines.push(format!("[{key} \"{}\"]", escape(value)));
        }
    }

    if let Some(root) = tree.board(tree.root()) {
        let start_fen = root.fen(true);
        if start_fen != START_FEN {
            if !root.normal_chess() {
                lines.push("[Variant \"Chess960\"]".to_string());
            }
            lines.push(format!("[FEN \"{start_fen}\"]"));
            lines.push("[SetUp \"1\"]".to_string());
        }
    }

    format!("{}\n\n{}\n", lines.join("\n"), movetext(tree, options))
}
