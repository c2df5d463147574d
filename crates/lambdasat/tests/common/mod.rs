//! Shared fixtures: a first-order unifier and binary resolution, enough to
//! drive the saturation loop on small propositional and monadic problems.

#![allow(dead_code)]

use lambdasat::env::GeneratingInference;
use lambdasat::term::TermNode;
use lambdasat::{
    Clause, ClauseManager, Env, Literal, ProofState, ProofStep, RuleError, SaturationConfig, Saturator, TermBank,
    TermError, TermId, VarId,
};
use std::collections::HashMap;
use std::sync::Arc;

pub type Subst = HashMap<VarId, TermId>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Unification
// =============================================================================

fn walk(bank: &TermBank, mut t: TermId, subst: &Subst) -> TermId {
    while let TermNode::Var(v) = bank.node(t) {
        match subst.get(v) {
            Some(&u) => t = u,
            None => break,
        }
    }
    t
}

fn occurs(bank: &TermBank, v: VarId, t: TermId, subst: &Subst) -> bool {
    let t = walk(bank, t, subst);
    match bank.node(t) {
        TermNode::Var(w) => *w == v,
        TermNode::App(f, args) => occurs(bank, v, *f, subst) || args.iter().any(|&a| occurs(bank, v, a, subst)),
        _ => false,
    }
}

/// Extend `subst` to a unifier of `s` and `t`.
pub fn unify(bank: &TermBank, s: TermId, t: TermId, subst: &mut Subst) -> bool {
    let s = walk(bank, s, subst);
    let t = walk(bank, t, subst);
    if s == t {
        return true;
    }
    match (bank.node(s), bank.node(t)) {
        (TermNode::Var(v), _) => {
            let v = *v;
            if occurs(bank, v, t, subst) {
                return false;
            }
            subst.insert(v, t);
            true
        }
        (_, TermNode::Var(_)) => unify(bank, t, s, subst),
        (TermNode::App(f, xs), TermNode::App(g, ys)) if xs.len() == ys.len() => {
            let pairs: Vec<(TermId, TermId)> = std::iter::once((*f, *g))
                .chain(xs.iter().copied().zip(ys.iter().copied()))
                .collect();
            pairs.into_iter().all(|(x, y)| unify(bank, x, y, subst))
        }
        _ => false,
    }
}

pub fn apply(bank: &mut TermBank, t: TermId, subst: &Subst) -> Result<TermId, TermError> {
    if bank.is_ground(t) {
        return Ok(t);
    }
    match bank.node(t).clone() {
        TermNode::Var(v) => match subst.get(&v) {
            Some(&u) => apply(bank, u, subst),
            None => Ok(t),
        },
        TermNode::App(f, args) => {
            let f = apply(bank, f, subst)?;
            let args = args
                .iter()
                .map(|&a| apply(bank, a, subst))
                .collect::<Result<Vec<TermId>, TermError>>()?;
            bank.try_app(f, &args)
        }
        _ => Ok(t),
    }
}

/// Shift every free variable of `t` by `offset`.
pub fn rename(bank: &mut TermBank, t: TermId, offset: u32) -> TermId {
    if bank.is_ground(t) {
        return t;
    }
    match bank.node(t).clone() {
        TermNode::Var(v) => {
            let ty = bank.ty(t);
            bank.var(VarId(v.0 + offset), ty)
        }
        TermNode::App(f, args) => {
            let f = rename(bank, f, offset);
            let args: Vec<TermId> = args.iter().map(|&a| rename(bank, a, offset)).collect();
            bank.app(f, &args)
        }
        _ => t,
    }
}

fn max_var(bank: &TermBank, clause: &Clause) -> u32 {
    clause
        .lits()
        .iter()
        .flat_map(|l| l.terms())
        .flat_map(|t| bank.var_occurrences(t).into_keys())
        .map(|v| v.0)
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Binary resolution
// =============================================================================

/// Resolution on predicate literals between the given clause and every active
/// clause, the given clause included.
pub struct BinaryResolution;

impl BinaryResolution {
    fn resolve(cm: &mut ClauseManager, c: &Arc<Clause>, d: &Arc<Clause>) -> Result<Vec<Arc<Clause>>, RuleError> {
        let offset = max_var(&cm.bank, c) + 1;
        let d_lits: Vec<Literal> = d
            .lits()
            .iter()
            .map(|l| l.map_terms(|t| rename(&mut cm.bank, t, offset)))
            .collect();
        let mut out = Vec::new();
        for (i, li) in c.lits().iter().enumerate() {
            let Literal::Prop { atom: a, sign: sa } = *li else {
                continue;
            };
            for (j, lj) in d_lits.iter().enumerate() {
                let Literal::Prop { atom: b, sign: sb } = *lj else {
                    continue;
                };
                let mut subst = Subst::new();
                if sa == sb || !unify(&cm.bank, a, b, &mut subst) {
                    continue;
                }
                let rest: Vec<Literal> = c
                    .lits()
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i)
                    .chain(d_lits.iter().enumerate().filter(|&(k, _)| k != j))
                    .map(|(_, l)| *l)
                    .collect();
                let mut lits = Vec::with_capacity(rest.len());
                for lit in rest {
                    let mut failure = None;
                    let lit = lit.map_terms(|t| {
                        apply(&mut cm.bank, t, &subst).unwrap_or_else(|err| {
                            failure = failure.take().or(Some(err));
                            t
                        })
                    });
                    if let Some(err) = failure {
                        return Err(RuleError::ill_typed("resolution", err));
                    }
                    lits.push(lit);
                }
                let proof = ProofStep::inference("resolution", vec![Arc::clone(c), Arc::clone(d)]);
                out.push(cm.mk_clause(lits, proof));
            }
        }
        Ok(out)
    }
}

impl GeneratingInference for BinaryResolution {
    fn name(&self) -> &str {
        "resolution"
    }

    fn generate(
        &self,
        given: &Arc<Clause>,
        state: &ProofState,
        cm: &mut ClauseManager,
    ) -> Result<Vec<Arc<Clause>>, RuleError> {
        let mut out = Vec::new();
        for partner in state.active().values() {
            out.extend(Self::resolve(cm, given, partner)?);
        }
        Ok(out)
    }
}

// =============================================================================
// Problems
// =============================================================================

/// Monadic signature over one sort: `P`, `Q`, constants `a`, `b`.
pub struct Signature {
    pub p: TermId,
    pub q: TermId,
    pub a: TermId,
    pub b: TermId,
    pub x: TermId,
}

impl Signature {
    pub fn new(bank: &mut TermBank) -> Self {
        let i = bank.base_ty("i");
        let o = bank.prop();
        let pred = bank.arrow(&[i], o);
        Signature {
            p: bank.declare("P", pred),
            q: bank.declare("Q", pred),
            a: bank.declare("a", i),
            b: bank.declare("b", i),
            x: bank.var(VarId(0), i),
        }
    }
}

pub fn saturator(config: SaturationConfig, state: ProofState) -> (Saturator, Signature) {
    init_tracing();
    let mut env = Env::new(ClauseManager::default(), state, &config);
    env.add_generating(Box::new(BinaryResolution));
    let sig = Signature::new(&mut env.cm.bank);
    (Saturator::new(env, config), sig)
}

/// Build an atom `pred(arg)`.
pub fn atom(sat: &mut Saturator, pred: TermId, arg: TermId) -> TermId {
    sat.env.cm.bank.app(pred, &[arg])
}

pub fn assert_clause(sat: &mut Saturator, lits: Vec<Literal>) -> Arc<Clause> {
    let c = sat.env.cm.mk_clause(lits, ProofStep::assert());
    sat.add_input(Arc::clone(&c));
    c
}

/// `P(a)`, `¬P(x) ∨ Q(x)`, `¬Q(a)`
pub fn modus_ponens(sat: &mut Saturator, sig: &Signature) -> Vec<Arc<Clause>> {
    let pa = atom(sat, sig.p, sig.a);
    let px = atom(sat, sig.p, sig.x);
    let qx = atom(sat, sig.q, sig.x);
    let qa = atom(sat, sig.q, sig.a);
    vec![
        assert_clause(sat, vec![Literal::prop(pa, true)]),
        assert_clause(sat, vec![Literal::prop(px, false), Literal::prop(qx, true)]),
        assert_clause(sat, vec![Literal::prop(qa, false)]),
    ]
}
