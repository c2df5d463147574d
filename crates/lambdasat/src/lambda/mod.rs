//! Lambda-calculus normalization
//!
//! Beta reduction runs on an explicit machine state instead of eager
//! substitution: the head being reduced carries a [`DbEnv`] of pending
//! instantiations, and every pending argument carries the environment it must
//! be read in. Reduction is a loop over that state, so long chains of redexes
//! never grow the native stack.
//!
//! - [`whnf`] reduces until the head is no longer an applied lambda.
//! - [`snf`] reduces every subterm, skipping subterms without redexes.
//! - [`eta_expand`], [`eta_reduce`] and [`eta_quick_reduce`] move between
//!   eta-long and eta-short forms.
//! - [`is_lambda_pattern`] recognizes higher-order patterns.
//!
//! All functions expect well-typed input. A type mismatch discovered during
//! beta reduction is a bug in the caller and panics.

mod env;

pub use env::DbEnv;

use crate::config::EtaMode;
use crate::term::{Binder, TermBank, TermId, TermNode, TyId};
use std::collections::{HashMap, HashSet};

/// Weak-head reduction state.
struct WhnfState {
    head: TermId,
    /// Instantiation of the loose indices of `head`
    env: DbEnv,
    /// Pending arguments; the next one to be consumed is last
    args: Vec<(TermId, DbEnv)>,
    ty: TyId,
    flat: Flattened,
}

/// Substitution slices of the environments met during one reduction, so a
/// shared environment is flattened once.
#[derive(Default)]
struct Flattened(HashMap<usize, (DbEnv, Vec<TermId>)>);

impl Flattened {
    fn instantiate(&mut self, bank: &mut TermBank, t: TermId, env: &DbEnv) -> TermId {
        if env.is_empty() || bank.is_closed(t) {
            return t;
        }
        // the stored clone keeps the frames alive, so addresses are not reused
        let (_, subst) = self.0.entry(env.addr()).or_insert_with(|| (env.clone(), env.to_vec()));
        bank.instantiate(t, subst)
    }
}

impl WhnfState {
    fn new(bank: &TermBank, t: TermId) -> Self {
        WhnfState {
            head: t,
            env: DbEnv::empty(),
            args: Vec::new(),
            ty: bank.ty(t),
            flat: Flattened::default(),
        }
    }

    fn reduce(&mut self, bank: &mut TermBank) {
        loop {
            match bank.node(self.head) {
                TermNode::App(f, args) => {
                    for &arg in args.iter().rev() {
                        self.args.push((arg, self.env.clone()));
                    }
                    self.head = *f;
                }
                TermNode::Bind(Binder::Lambda, var_ty, body) => {
                    let (var_ty, body) = (*var_ty, *body);
                    let Some((arg, arg_env)) = self.args.pop() else {
                        break;
                    };
                    let arg = self.flat.instantiate(bank, arg, &arg_env);
                    assert_eq!(
                        bank.ty(arg),
                        var_ty,
                        "ill-typed beta redex: argument {} does not have type {}",
                        bank.display(arg),
                        bank.display_ty(var_ty)
                    );
                    self.env = self.env.push(arg);
                    self.head = body;
                }
                TermNode::BVar(i) => match self.env.find(*i) {
                    Some(bound) => {
                        self.head = bound;
                        self.env = DbEnv::empty();
                    }
                    None => break,
                },
                _ => break,
            }
        }
    }

    fn into_term(mut self, bank: &mut TermBank) -> TermId {
        let head = self.flat.instantiate(bank, self.head, &self.env);
        let mut args = Vec::with_capacity(self.args.len());
        for (arg, env) in self.args.iter().rev() {
            args.push(self.flat.instantiate(bank, *arg, env));
        }
        let t = bank.app(head, &args);
        debug_assert_eq!(bank.ty(t), self.ty, "weak-head reduction changed the type");
        t
    }
}

fn is_head_redex(bank: &TermBank, t: TermId) -> bool {
    matches!(bank.node(t), TermNode::App(head, _) if bank.is_lambda(*head))
}

/// Weak head normal form.
///
/// Returns `t` itself when its head is not an applied lambda, so applying
/// `whnf` twice yields the same handle.
pub fn whnf(bank: &mut TermBank, t: TermId) -> TermId {
    if !is_head_redex(bank, t) {
        return t;
    }
    let mut state = WhnfState::new(bank, t);
    state.reduce(bank);
    state.into_term(bank)
}

/// Strong (beta) normal form.
pub fn snf(bank: &mut TermBank, t: TermId) -> TermId {
    let mut cache = HashMap::new();
    snf_cached(bank, t, &mut cache)
}

fn snf_cached(bank: &mut TermBank, t: TermId, cache: &mut HashMap<TermId, TermId>) -> TermId {
    if !bank.has_beta_redex(t) {
        return t;
    }
    if let Some(&done) = cache.get(&t) {
        return done;
    }
    // After whnf the head is rigid, so normalizing children cannot expose a new redex.
    let reduced = whnf(bank, t);
    let result = bank.map_children(reduced, |bank, s, _| snf_cached(bank, s, cache));
    cache.insert(t, result);
    result
}

/// Eta-long form.
///
/// Every subterm of functional type that is not a lambda gets the missing
/// trailing abstractions, and the fresh bound variables are themselves
/// expanded.
pub fn eta_expand(bank: &mut TermBank, t: TermId) -> TermId {
    eta_expand_cached(bank, t, &mut HashMap::new())
}

fn eta_expand_cached(bank: &mut TermBank, t: TermId, cache: &mut HashMap<TermId, TermId>) -> TermId {
    if let Some(&done) = cache.get(&t) {
        return done;
    }
    let result = expand_term(bank, t, cache);
    cache.insert(t, result);
    result
}

fn expand_term(bank: &mut TermBank, t: TermId, cache: &mut HashMap<TermId, TermId>) -> TermId {
    if let TermNode::Bind(Binder::Lambda, var_ty, body) = *bank.node(t) {
        let new_body = eta_expand_cached(bank, body, cache);
        return if new_body == body {
            t
        } else {
            bank.lambda(var_ty, new_body)
        };
    }

    let inner = expand_subterms(bank, t, cache);
    let (params, _) = bank.arrow_parts(bank.ty(t));
    if params.is_empty() {
        return inner;
    }

    let n = params.len() as u32;
    let shifted = bank.shift(inner, n);
    let mut fresh = Vec::with_capacity(params.len());
    for (k, &param) in params.iter().enumerate() {
        let db = bank.bvar(n - 1 - k as u32, param);
        fresh.push(eta_expand_cached(bank, db, cache));
    }
    let body = bank.app(shifted, &fresh);
    params.iter().rev().fold(body, |acc, &param| bank.lambda(param, acc))
}

fn expand_subterms(bank: &mut TermBank, t: TermId, cache: &mut HashMap<TermId, TermId>) -> TermId {
    match bank.node(t).clone() {
        // The head stays as is: expanding it would create a redex.
        TermNode::App(head, args) => {
            let new_args: Vec<TermId> = args.iter().map(|&a| eta_expand_cached(bank, a, cache)).collect();
            let ty = bank.ty(t);
            bank.mk_app(head, &new_args, ty)
        }
        _ => bank.map_children(t, |bank, s, _| eta_expand_cached(bank, s, cache)),
    }
}

/// Contract every `λx. f x` where `x` occurs only as the last argument.
pub fn eta_reduce(bank: &mut TermBank, t: TermId) -> TermId {
    eta_reduce_cached(bank, t, &mut HashMap::new())
}

fn eta_reduce_cached(bank: &mut TermBank, t: TermId, cache: &mut HashMap<TermId, TermId>) -> TermId {
    if !bank.has_lambda(t) {
        return t;
    }
    if let Some(&done) = cache.get(&t) {
        return done;
    }
    let result = match *bank.node(t) {
        TermNode::Bind(Binder::Lambda, var_ty, body) => {
            let body = eta_reduce_cached(bank, body, cache);
            match contract(bank, body) {
                Some(reduced) => reduced,
                None => bank.lambda(var_ty, body),
            }
        }
        _ => bank.map_children(t, |bank, s, _| eta_reduce_cached(bank, s, cache)),
    };
    cache.insert(t, result);
    result
}

/// Eta-contract the body of a lambda, if it has the shape `f .. #0`.
fn contract(bank: &mut TermBank, body: TermId) -> Option<TermId> {
    let TermNode::App(head, args) = bank.node(body).clone() else {
        return None;
    };
    let (&last, rest) = args.split_last()?;
    if *bank.node(last) != TermNode::BVar(0) {
        return None;
    }
    if bank.contains_loose(head, 0) || rest.iter().any(|&a| bank.contains_loose(a, 0)) {
        return None;
    }
    let reduced = bank.app(head, rest);
    Some(bank.unshift(reduced, 1))
}

/// Strip a trailing run of bound-variable arguments under the top lambdas.
///
/// `λx y. f t x y` becomes `f t` without looking inside `f` or `t` for
/// further eta redexes.
pub fn eta_quick_reduce(bank: &mut TermBank, t: TermId) -> TermId {
    let mut binders = Vec::new();
    let mut body = t;
    while let TermNode::Bind(Binder::Lambda, var_ty, inner) = *bank.node(body) {
        binders.push(var_ty);
        body = inner;
    }
    if binders.is_empty() {
        return t;
    }
    let TermNode::App(head, args) = bank.node(body).clone() else {
        return t;
    };

    let limit = binders.len().min(args.len());
    let mut k = 0;
    while k < limit && *bank.node(args[args.len() - 1 - k]) == TermNode::BVar(k as u32) {
        k += 1;
    }
    while k > 0 {
        let rest = &args[..args.len() - k];
        let captured = bank.has_loose_below(head, k as u32)
            || rest.iter().any(|&a| bank.has_loose_below(a, k as u32));
        if !captured {
            break;
        }
        k -= 1;
    }
    if k == 0 {
        return t;
    }

    let reduced = bank.app(head, &args[..args.len() - k]);
    let reduced = bank.unshift(reduced, k as u32);
    binders[..binders.len() - k]
        .iter()
        .rev()
        .fold(reduced, |acc, &ty| bank.lambda(ty, acc))
}

/// Higher-order pattern test.
///
/// Every application headed by a free variable must have distinct bound
/// variables (up to eta) as arguments.
pub fn is_lambda_pattern(bank: &mut TermBank, t: TermId) -> bool {
    let t = snf(bank, t);
    pattern_check(bank, t, &mut HashMap::new())
}

fn pattern_check(bank: &mut TermBank, t: TermId, seen_terms: &mut HashMap<TermId, bool>) -> bool {
    if let Some(&ok) = seen_terms.get(&t) {
        return ok;
    }
    let ok = match bank.node(t).clone() {
        TermNode::App(head, args) if bank.is_var(head) => {
            let mut seen = HashSet::new();
            args.iter().all(|&arg| {
                let arg = eta_reduce(bank, arg);
                matches!(*bank.node(arg), TermNode::BVar(i) if seen.insert(i))
            })
        }
        TermNode::App(head, args) => {
            pattern_check(bank, head, seen_terms) && args.iter().all(|&a| pattern_check(bank, a, seen_terms))
        }
        TermNode::Bind(_, _, body) => pattern_check(bank, body, seen_terms),
        TermNode::AppBuiltin(_, args) => args.iter().all(|&a| pattern_check(bank, a, seen_terms)),
        TermNode::Var(_) | TermNode::Const(_) | TermNode::BVar(_) => true,
    };
    seen_terms.insert(t, ok);
    ok
}

/// Beta normal form followed by the requested eta normal form.
pub fn normalize(bank: &mut TermBank, t: TermId, eta: EtaMode) -> TermId {
    let t = snf(bank, t);
    match eta {
        EtaMode::Reduce => eta_reduce(bank, t),
        EtaMode::Expand => eta_expand(bank, t),
        EtaMode::Keep => t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Builtin, VarId};

    struct Sig {
        bank: TermBank,
        i: TyId,
        f: TermId,
        g: TermId,
        a: TermId,
    }

    /// i, f: i → i, g: i → i → i, a: i
    fn sig() -> Sig {
        let mut bank = TermBank::new();
        let i = bank.base_ty("i");
        let f_ty = bank.arrow(&[i], i);
        let g_ty = bank.arrow(&[i, i], i);
        let f = bank.declare("f", f_ty);
        let g = bank.declare("g", g_ty);
        let a = bank.declare("a", i);
        Sig { bank, i, f, g, a }
    }

    #[test]
    fn test_whnf_beta() {
        let Sig { mut bank, i, f, a, .. } = sig();
        let x = bank.bvar(0, i);
        let fx = bank.app(f, &[x]);
        let lam = bank.lambda(i, fx);
        let redex = bank.app(lam, &[a]);

        let expected = bank.app(f, &[a]);
        assert_eq!(whnf(&mut bank, redex), expected);
    }

    #[test]
    fn test_whnf_leaves_non_redex_alone() {
        let Sig { mut bank, f, a, .. } = sig();
        let fa = bank.app(f, &[a]);
        assert_eq!(whnf(&mut bank, fa), fa);
        assert_eq!(whnf(&mut bank, f), f);
    }

    #[test]
    fn test_whnf_partial_application_keeps_lambda() {
        let Sig { mut bank, i, g, a, .. } = sig();
        // (λx. λy. g x y) a  ~>  λy. g a y
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);
        let gxy = bank.app(g, &[db1, db0]);
        let inner = bank.lambda(i, gxy);
        let outer = bank.lambda(i, inner);
        let redex = bank.app(outer, &[a]);

        let ga_y = bank.app(g, &[a, db0]);
        let expected = bank.lambda(i, ga_y);
        assert_eq!(whnf(&mut bank, redex), expected);
    }

    #[test]
    fn test_whnf_over_application() {
        let Sig { mut bank, f, a, .. } = sig();
        // (λh:i→i. h) f a  ~>  f a
        let f_ty = bank.ty(f);
        let h = bank.bvar(0, f_ty);
        let id = bank.lambda(f_ty, h);
        let t = bank.app(id, &[f, a]);

        let expected = bank.app(f, &[a]);
        assert_eq!(whnf(&mut bank, t), expected);
    }

    #[test]
    fn test_whnf_bound_head_is_looked_up() {
        let Sig { mut bank, i, g, a, .. } = sig();
        // (λh. h a) (λx. g x x)  ~>  g a a
        let fn_ty = bank.arrow(&[i], i);
        let h = bank.bvar(0, fn_ty);
        let ha = bank.app(h, &[a]);
        let apply_to_a = bank.lambda(fn_ty, ha);
        let x = bank.bvar(0, i);
        let gxx = bank.app(g, &[x, x]);
        let dup = bank.lambda(i, gxx);
        let t = bank.app(apply_to_a, &[dup]);

        let expected = bank.app(g, &[a, a]);
        assert_eq!(whnf(&mut bank, t), expected);
    }

    #[test]
    fn test_snf_under_binder() {
        let Sig { mut bank, i, g, a, .. } = sig();
        // λy. (λx. g x y) a  ~>  λy. g a y
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);
        let gxy = bank.app(g, &[db0, db1]);
        let lam_x = bank.lambda(i, gxy);
        let redex = bank.app(lam_x, &[a]);
        let t = bank.lambda(i, redex);

        // whnf does not look under the binder
        assert_eq!(whnf(&mut bank, t), t);

        let ga_y = bank.app(g, &[a, db0]);
        let expected = bank.lambda(i, ga_y);
        assert_eq!(snf(&mut bank, t), expected);
    }

    #[test]
    fn test_snf_substitutes_loose_variable_under_binder() {
        let Sig { mut bank, i, .. } = sig();
        // λy. (λx. λz. x) y  ~>  λy. λz. y
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);
        let k = bank.lambda(i, db1);
        let k = bank.lambda(i, k);
        let redex = bank.app(k, &[db0]);
        let t = bank.lambda(i, redex);

        let inner = bank.lambda(i, db1);
        let expected = bank.lambda(i, inner);
        assert_eq!(snf(&mut bank, t), expected);
    }

    #[test]
    fn test_snf_inside_connectives() {
        let Sig { mut bank, i, a, .. } = sig();
        let o = bank.prop();
        let p_ty = bank.arrow(&[i], o);
        let p = bank.declare("p", p_ty);
        let x = bank.bvar(0, i);
        let px = bank.app(p, &[x]);
        let lam = bank.lambda(i, px);
        let redex = bank.app(lam, &[a]);
        let negated = bank.mk_not(redex);

        // whnf stops at the connective
        assert_eq!(whnf(&mut bank, negated), negated);

        let pa = bank.app(p, &[a]);
        let expected = bank.mk_not(pa);
        assert_eq!(snf(&mut bank, negated), expected);
        assert_eq!(snf(&mut bank, expected), expected);
    }

    #[test]
    fn test_snf_chain_of_redexes() {
        let Sig { mut bank, i, f, a, .. } = sig();
        // (λx. f x) applied through a chain of 200 identity redexes
        let db0 = bank.bvar(0, i);
        let id = bank.lambda(i, db0);
        let mut t = a;
        for _ in 0..200 {
            t = bank.app(id, &[t]);
        }
        let fx = bank.app(f, &[db0]);
        let lam = bank.lambda(i, fx);
        let t = bank.app(lam, &[t]);

        let expected = bank.app(f, &[a]);
        assert_eq!(snf(&mut bank, t), expected);
    }

    #[test]
    fn test_normalizes_deeply_shared_redex() {
        let Sig { mut bank, i, g, a, .. } = sig();
        // t_0 = #0, t_{k+1} = g t_k t_k: 41 nodes, 2^40 leaves when unfolded
        let mut body = bank.bvar(0, i);
        let mut expected = a;
        for _ in 0..40 {
            body = bank.app(g, &[body, body]);
            expected = bank.app(g, &[expected, expected]);
        }
        let lam = bank.lambda(i, body);
        let redex = bank.app(lam, &[a]);
        let wrapped = bank.lambda(i, redex);
        let before = bank.len();

        assert_eq!(whnf(&mut bank, redex), expected);
        assert_eq!(snf(&mut bank, redex), expected);
        let expected_wrapped = bank.lambda(i, expected);
        assert_eq!(snf(&mut bank, wrapped), expected_wrapped);
        assert_eq!(eta_reduce(&mut bank, expected_wrapped), expected_wrapped);
        assert!(is_lambda_pattern(&mut bank, wrapped));
        assert!(bank.len() <= before + 1);
    }

    #[test]
    fn test_eta_expand_constant() {
        let Sig { mut bank, i, f, g, .. } = sig();
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);

        let fx = bank.app(f, &[db0]);
        let expected_f = bank.lambda(i, fx);
        assert_eq!(eta_expand(&mut bank, f), expected_f);

        let gxy = bank.app(g, &[db1, db0]);
        let inner = bank.lambda(i, gxy);
        let expected_g = bank.lambda(i, inner);
        assert_eq!(eta_expand(&mut bank, g), expected_g);
    }

    #[test]
    fn test_eta_expand_partial_application() {
        let Sig { mut bank, i, g, a, .. } = sig();
        let ga = bank.app(g, &[a]);
        let db0 = bank.bvar(0, i);
        let ga_x = bank.app(g, &[a, db0]);
        let expected = bank.lambda(i, ga_x);
        assert_eq!(eta_expand(&mut bank, ga), expected);
    }

    #[test]
    fn test_eta_expand_shifts_loose_indices() {
        let Sig { mut bank, i, .. } = sig();
        let fn_ty = bank.arrow(&[i], i);
        // loose #0 of type i → i becomes λ. #1 #0
        let h = bank.bvar(0, fn_ty);
        let h_shifted = bank.bvar(1, fn_ty);
        let x = bank.bvar(0, i);
        let hx = bank.app(h_shifted, &[x]);
        let expected = bank.lambda(i, hx);
        assert_eq!(eta_expand(&mut bank, h), expected);
    }

    #[test]
    fn test_eta_expand_higher_order_argument() {
        let Sig { mut bank, i, .. } = sig();
        // c : (i → i) → i expands to λh. c (λx. h x)
        let fn_ty = bank.arrow(&[i], i);
        let c_ty = bank.arrow(&[fn_ty], i);
        let c = bank.declare("c", c_ty);

        let h_inner = bank.bvar(1, fn_ty);
        let x = bank.bvar(0, i);
        let hx = bank.app(h_inner, &[x]);
        let expanded_h = bank.lambda(i, hx);
        let body = bank.app(c, &[expanded_h]);
        let expected = bank.lambda(fn_ty, body);
        assert_eq!(eta_expand(&mut bank, c), expected);
    }

    #[test]
    fn test_eta_reduce() {
        let Sig { mut bank, i, f, g, a, .. } = sig();
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);

        // λx. λy. g x y  ~>  g
        let gxy = bank.app(g, &[db1, db0]);
        let inner = bank.lambda(i, gxy);
        let outer = bank.lambda(i, inner);
        assert_eq!(eta_reduce(&mut bank, outer), g);

        // λx. g a x  ~>  g a
        let gax = bank.app(g, &[a, db0]);
        let lam = bank.lambda(i, gax);
        let ga = bank.app(g, &[a]);
        assert_eq!(eta_reduce(&mut bank, lam), ga);

        // λx. g x x is not an eta redex
        let gxx = bank.app(g, &[db0, db0]);
        let lam = bank.lambda(i, gxx);
        assert_eq!(eta_reduce(&mut bank, lam), lam);

        // λx. f (f x) is not an eta redex
        let fx = bank.app(f, &[db0]);
        let ffx = bank.app(f, &[fx]);
        let lam = bank.lambda(i, ffx);
        assert_eq!(eta_reduce(&mut bank, lam), lam);
    }

    #[test]
    fn test_eta_reduce_inside_arguments() {
        let Sig { mut bank, i, f, .. } = sig();
        let fn_ty = bank.arrow(&[i], i);
        let c_ty = bank.arrow(&[fn_ty], i);
        let c = bank.declare("c", c_ty);
        let db0 = bank.bvar(0, i);
        let fx = bank.app(f, &[db0]);
        let lam = bank.lambda(i, fx);
        let t = bank.app(c, &[lam]);
        let expected = bank.app(c, &[f]);
        assert_eq!(eta_reduce(&mut bank, t), expected);
    }

    #[test]
    fn test_eta_quick_reduce() {
        let Sig { mut bank, i, g, a, .. } = sig();
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);

        let gxy = bank.app(g, &[db1, db0]);
        let inner = bank.lambda(i, gxy);
        let outer = bank.lambda(i, inner);
        assert_eq!(eta_quick_reduce(&mut bank, outer), g);

        let gax = bank.app(g, &[a, db0]);
        let lam = bank.lambda(i, gax);
        let ga = bank.app(g, &[a]);
        assert_eq!(eta_quick_reduce(&mut bank, lam), ga);

        // λx y. g y y: only y could be stripped, but it also occurs earlier
        let gyy = bank.app(g, &[db0, db0]);
        let inner = bank.lambda(i, gyy);
        let outer = bank.lambda(i, inner);
        assert_eq!(eta_quick_reduce(&mut bank, outer), outer);

        // λx y. g x y with swapped arguments keeps both binders
        let gyx = bank.app(g, &[db0, db1]);
        let inner = bank.lambda(i, gyx);
        let outer = bank.lambda(i, inner);
        assert_eq!(eta_quick_reduce(&mut bank, outer), outer);
    }

    #[test]
    fn test_eta_quick_reduce_keeps_outer_binders() {
        let Sig { mut bank, i, f, .. } = sig();
        // λx y. f y  ~>  λx. f
        let db0 = bank.bvar(0, i);
        let fy = bank.app(f, &[db0]);
        let inner = bank.lambda(i, fy);
        let outer = bank.lambda(i, inner);
        let expected = bank.lambda(i, f);
        assert_eq!(eta_quick_reduce(&mut bank, outer), expected);
    }

    #[test]
    fn test_lambda_patterns() {
        let Sig { mut bank, i, f, a, .. } = sig();
        let fn2 = bank.arrow(&[i, i], i);
        let big_x = bank.var(VarId(0), fn2);
        let db0 = bank.bvar(0, i);
        let db1 = bank.bvar(1, i);

        // λx y. X x y
        let xxy = bank.app(big_x, &[db1, db0]);
        let inner = bank.lambda(i, xxy);
        let pattern = bank.lambda(i, inner);
        assert!(is_lambda_pattern(&mut bank, pattern));

        // λx. X x x
        let xxx = bank.app(big_x, &[db0, db0]);
        let dup = bank.lambda(i, xxx);
        assert!(!is_lambda_pattern(&mut bank, dup));

        // λx. X a x
        let xax = bank.app(big_x, &[a, db0]);
        let with_const = bank.lambda(i, xax);
        assert!(!is_lambda_pattern(&mut bank, with_const));

        // first-order terms are patterns
        let fa = bank.app(f, &[a]);
        assert!(is_lambda_pattern(&mut bank, fa));
    }

    #[test]
    fn test_lambda_pattern_up_to_eta() {
        let Sig { mut bank, i, .. } = sig();
        let fn_ty = bank.arrow(&[i], i);
        let hv_ty = bank.arrow(&[fn_ty], i);
        let big_x = bank.var(VarId(0), hv_ty);
        // λh. X (λz. h z) is a pattern: the argument eta-reduces to h
        let h = bank.bvar(1, fn_ty);
        let z = bank.bvar(0, i);
        let hz = bank.app(h, &[z]);
        let eta_h = bank.lambda(i, hz);
        let body = bank.app(big_x, &[eta_h]);
        let t = bank.lambda(fn_ty, body);
        assert!(is_lambda_pattern(&mut bank, t));
    }

    #[test]
    fn test_normalize_modes() {
        let Sig { mut bank, i, f, a, .. } = sig();
        let fn_ty = bank.arrow(&[i], i);
        let c_ty = bank.arrow(&[fn_ty], i);
        let c = bank.declare("c", c_ty);
        let db0 = bank.bvar(0, i);
        // c ((λy. λx. f x) a)
        let fx = bank.app(f, &[db0]);
        let eta_f = bank.lambda(i, fx);
        let k = bank.lambda(i, eta_f);
        let redex = bank.app(k, &[a]);
        let t = bank.app(c, &[redex]);

        let c_f = bank.app(c, &[f]);
        let c_eta_f = bank.app(c, &[eta_f]);
        assert_eq!(normalize(&mut bank, t, EtaMode::Reduce), c_f);
        assert_eq!(normalize(&mut bank, t, EtaMode::Keep), c_eta_f);
        assert_eq!(normalize(&mut bank, t, EtaMode::Expand), c_eta_f);
    }

    #[test]
    #[should_panic(expected = "malformed builtin")]
    fn test_builtin_misuse_is_fatal() {
        let Sig { mut bank, a, .. } = sig();
        bank.builtin(Builtin::Not, &[a]);
    }
}
