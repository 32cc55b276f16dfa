//! Linear intermediate representation, lowered from the AST.

use crate::ast::Node;

/// A single IR instruction. Unlike the original C++ `IrInst` (a flat struct
/// with two always-present, often-unused integer fields), each variant here
/// only carries the payload it actually needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    /// `ptr += arg`
    AddPtr(i32),
    /// `*ptr += arg` (wraps modulo 256)
    AddVal(i32),
    /// emit `*ptr` to stdout
    Output,
    /// read a byte into `*ptr`, EOF -> 0
    Input,
    /// placeholder, emits no code; marks a jump target
    Label(u32),
    /// jump to `Label(id)` if `*ptr == 0`
    Jz(u32),
    /// jump to `Label(id)` if `*ptr != 0`
    Jnz(u32),
}

/// Lower an AST into a flat, label-and-jump IR program.
///
/// Each `Loop` consumes two fresh label ids from a monotonically increasing
/// counter (`start`, then `end`) and lowers to exactly:
///
/// ```text
/// Label(start)
/// Jz    end
/// <body>
/// Jnz   start
/// Label(end)
/// ```
///
/// The synthetic root produced by the parser is unfolded directly: its
/// children are lowered in order without any surrounding label/jump pair.
pub fn generate(root: &Node) -> Vec<Inst> {
    let mut prog = Vec::new();
    let mut next_label = 0u32;

    let Node::Loop(children) = root else {
        unreachable!("parser always produces a Loop root");
    };
    for child in children {
        lower(child, &mut prog, &mut next_label);
    }

    prog
}

fn lower(node: &Node, prog: &mut Vec<Inst>, next_label: &mut u32) {
    match node {
        Node::MovePtr(step) => prog.push(Inst::AddPtr(*step)),
        Node::AddVal(delta) => prog.push(Inst::AddVal(*delta)),
        Node::Output => prog.push(Inst::Output),
        Node::Input => prog.push(Inst::Input),
        Node::Loop(children) => {
            let start = *next_label;
            let end = *next_label + 1;
            *next_label += 2;

            prog.push(Inst::Label(start));
            prog.push(Inst::Jz(end));
            for child in children {
                lower(child, prog, next_label);
            }
            prog.push(Inst::Jnz(start));
            prog.push(Inst::Label(end));
        }
    }
}
