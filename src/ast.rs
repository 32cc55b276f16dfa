//! Abstract syntax tree produced by the parser.

/// A single parsed Brainfuck construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `>` (step = 1) or `<` (step = -1), already folded by the parser to a
    /// signed step of one cell.
    MovePtr(i32),
    /// `+` (delta = 1) or `-` (delta = -1).
    AddVal(i32),
    Output,
    Input,
    /// `[ ... ]`. The top-level program is itself represented as a `Loop`
    /// whose children are the top-level statements; the IR generator unfolds
    /// that synthetic root without emitting guard labels for it.
    Loop(Vec<Node>),
}
