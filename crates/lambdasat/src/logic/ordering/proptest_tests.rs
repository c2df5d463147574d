//! Property-based tests for the weight ordering.

use super::{Comparison, TermOrdering, WeightOrdering};
use crate::term::{TermBank, TermId, VarId};
use proptest::prelude::*;

/// Term description before interning
#[derive(Debug, Clone)]
enum TermDesc {
    Const(u8),
    Var(u8),
    Func(u8, Vec<TermDesc>),
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    let leaf = prop_oneof![
        3 => (0..4u8).prop_map(TermDesc::Const),
        1 => (0..2u8).prop_map(TermDesc::Var),
    ];
    if max_depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            3 => leaf,
            2 => (0..2u8, proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=2))
                .prop_map(|(f, args)| TermDesc::Func(f, args)),
        ]
        .boxed()
    }
}

fn build_term(desc: &TermDesc, bank: &mut TermBank) -> TermId {
    let i = bank.base_ty("i");
    match desc {
        TermDesc::Const(k) => bank.declare(&format!("c{k}"), i),
        TermDesc::Var(k) => bank.var(VarId(*k as u32), i),
        TermDesc::Func(f, args) => {
            let built: Vec<TermId> = args.iter().map(|a| build_term(a, bank)).collect();
            let params = vec![i; built.len()];
            let ty = bank.arrow(&params, i);
            let head = bank.declare(&format!("f{f}_{}", built.len()), ty);
            bank.app(head, &built)
        }
    }
}

proptest! {
    /// Transitivity: if a > b and b > c, then a > c
    #[test]
    fn weight_ordering_transitivity(
        d1 in arb_term_desc(3),
        d2 in arb_term_desc(3),
        d3 in arb_term_desc(3),
    ) {
        let mut bank = TermBank::new();
        let (t1, t2, t3) = (build_term(&d1, &mut bank), build_term(&d2, &mut bank), build_term(&d3, &mut bank));
        let ord = WeightOrdering;
        let cmp12 = ord.compare(&bank, t1, t2);
        let cmp23 = ord.compare(&bank, t2, t3);
        let cmp13 = ord.compare(&bank, t1, t3);

        if cmp12 == Comparison::Greater && cmp23 == Comparison::Greater {
            prop_assert_eq!(cmp13, Comparison::Greater,
                "transitivity: t1 > t2 and t2 > t3 implies t1 > t3");
        }
        if cmp12 == Comparison::Less && cmp23 == Comparison::Less {
            prop_assert_eq!(cmp13, Comparison::Less,
                "transitivity: t1 < t2 and t2 < t3 implies t1 < t3");
        }
    }

    /// Swapping the arguments flips the result
    #[test]
    fn weight_ordering_antisymmetry(d1 in arb_term_desc(3), d2 in arb_term_desc(3)) {
        let mut bank = TermBank::new();
        let (t1, t2) = (build_term(&d1, &mut bank), build_term(&d2, &mut bank));
        let ord = WeightOrdering;
        prop_assert_eq!(ord.compare(&bank, t1, t2), ord.compare(&bank, t2, t1).flip());
    }

    /// A term is greater than each of its arguments
    #[test]
    fn weight_ordering_subterm(f in 0..2u8, args in proptest::collection::vec(arb_term_desc(2), 1..=2)) {
        let mut bank = TermBank::new();
        let t = build_term(&TermDesc::Func(f, args), &mut bank);
        let ord = WeightOrdering;
        for &arg in bank.args(t).to_vec().iter() {
            prop_assert_eq!(ord.compare(&bank, t, arg), Comparison::Greater);
        }
    }
}
