//! Peephole optimizer: fuses maximal adjacent runs of identical additive ops.

use crate::ir::Inst;

/// Fuse every maximal run of consecutive `AddPtr`/`AddVal` instructions into a
/// single instruction carrying the summed delta, dropping runs that sum to
/// zero. All other opcodes pass through unchanged and act as barriers, so one
/// linear pass suffices (fused output can never merge with a non-matching
/// neighbor).
pub fn optimize(prog: &[Inst]) -> Vec<Inst> {
    let mut out = Vec::with_capacity(prog.len());
    let mut i = 0;

    while i < prog.len() {
        match prog[i] {
            Inst::AddPtr(arg) => {
                let (sum, next) = fuse_run(prog, i, arg, |inst| match inst {
                    Inst::AddPtr(a) => Some(a),
                    _ => None,
                });
                if sum != 0 {
                    out.push(Inst::AddPtr(sum));
                }
                i = next;
            }
            Inst::AddVal(arg) => {
                let (sum, next) = fuse_run(prog, i, arg, |inst| match inst {
                    Inst::AddVal(a) => Some(a),
                    _ => None,
                });
                if sum != 0 {
                    out.push(Inst::AddVal(sum));
                }
                i = next;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    out
}

/// Sum `prog[i..]` while `extract` keeps matching the same opcode, returning
/// the total and the index just past the run.
fn fuse_run(
    prog: &[Inst],
    start: usize,
    first: i32,
    extract: impl Fn(Inst) -> Option<i32>,
) -> (i32, usize) {
    let mut sum = first;
    let mut j = start + 1;
    while let Some(arg) = prog.get(j).and_then(|&inst| extract(inst)) {
        sum += arg;
        j += 1;
    }
    (sum, j)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuses_adjacent_runs() {
        let prog = vec![Inst::AddVal(1), Inst::AddVal(1), Inst::AddVal(1)];
        assert_eq!(optimize(&prog), vec![Inst::AddVal(3)]);
    }

    #[test]
    fn drops_zero_sum_runs() {
        let prog = vec![Inst::AddPtr(1), Inst::AddPtr(-1)];
        assert_eq!(optimize(&prog), vec![]);
    }

    #[test]
    fn labels_and_jumps_are_barriers() {
        let prog = vec![
            Inst::AddPtr(1),
            Inst::Label(0),
            Inst::AddPtr(1),
            Inst::Jz(1),
            Inst::AddPtr(1),
        ];
        assert_eq!(
            optimize(&prog),
            vec![
                Inst::AddPtr(1),
                Inst::Label(0),
                Inst::AddPtr(1),
                Inst::Jz(1),
                Inst::AddPtr(1),
            ]
        );
    }

    #[test]
    fn does_not_fuse_across_opcode_boundary() {
        let prog = vec![Inst::AddPtr(1), Inst::AddVal(1), Inst::AddPtr(1)];
        assert_eq!(
            optimize(&prog),
            vec![Inst::AddPtr(1), Inst::AddVal(1), Inst::AddPtr(1)]
        );
    }

    #[test]
    fn idempotent() {
        let prog = vec![
            Inst::AddVal(1),
            Inst::AddVal(1),
            Inst::AddPtr(-1),
            Inst::AddPtr(1),
            Inst::Output,
        ];
        let once = optimize(&prog);
        let twice = optimize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn no_adjacent_same_opcode_survives() {
        let prog = vec![
            Inst::AddVal(1),
            Inst::AddVal(2),
            Inst::AddPtr(3),
            Inst::AddPtr(-1),
            Inst::Output,
            Inst::AddVal(5),
        ];
        let out = optimize(&prog);
        for w in out.windows(2) {
            let same = matches!(
                (w[0], w[1]),
                (Inst::AddPtr(_), Inst::AddPtr(_)) | (Inst::AddVal(_), Inst::AddVal(_))
            );
            assert!(!same, "adjacent same-opcode survived optimization: {w:?}");
        }
    }
}
