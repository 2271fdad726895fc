use cas_rewrite::{
    builder::*,
    error::{CacheError, MaxDepthExceeded},
    matches,
    pattern::Predicate,
    rules::{ALL, BASIC},
    simplify,
    Captures,
    Expander,
    ExpanderConfig,
    Expr,
    Matcher,
    Rule,
    Simplifier,
};
use pretty_assertions::assert_eq;
use std::num::NonZeroUsize;

fn var(name: &str) -> Expr {
    Expr::var(name)
}

/// `p + (-p) = 0`, replacing only the two matched terms.
fn cancel_rule() -> Rule {
    fn replace(_: &Captures) -> Expr {
        Expr::zero()
    }

    Rule::children("cancel", sub(cap("P"), cap("P")), &["P"], replace)
}

fn sample_trees() -> Vec<Expr> {
    let x = var("x");
    let y = var("y");
    vec![
        Expr::Mul(vec![Expr::Add(vec![x.clone(), Expr::zero()]), Expr::one()]),
        Expr::Add(vec![x.clone(), x.clone(), Expr::int(2), Expr::int(3)]),
        Expr::Mul(vec![x.clone().pow(Expr::int(2)), x.clone(), y.clone(), Expr::int(-1)]),
        Expr::Add(vec![
            Expr::Mul(vec![Expr::int(2), x.clone()]),
            Expr::Mul(vec![x.clone(), Expr::int(5)]),
            y.clone(),
        ]),
        Expr::int(3).factorial().pow(Expr::int(2)),
        Expr::Abs(Box::new(Expr::Abs(Box::new(Expr::fraction(-3, 4).unwrap())))),
        Expr::call("f", vec![Expr::Add(vec![y.clone(), Expr::zero()])]),
        Expr::equals(x.clone().pow(Expr::one()), Expr::Mul(vec![y, Expr::zero()])),
    ]
}

#[test_log::test]
fn end_to_end() {
    let expr = Expr::Mul(vec![Expr::Add(vec![var("x"), Expr::zero()]), Expr::one()]);
    assert_eq!(simplify(&expr, &BASIC).unwrap(), var("x"));
}

#[test]
fn idempotence() {
    let mut simplifier = Simplifier::default();
    for rules in [&BASIC, &ALL] {
        for tree in sample_trees() {
            let once = simplifier.simplify(&tree, rules).unwrap();
            let twice = simplifier.simplify(&once, rules).unwrap();
            assert_eq!(once, twice, "simplifying {} is not idempotent", tree);
        }
    }
}

#[test]
fn literal_exactness() {
    let expr = Expr::Mul(vec![Expr::fraction(1, 3).unwrap(), Expr::int(3)]);
    assert_eq!(simplify(&expr, &BASIC).unwrap(), Expr::one());

    let expr = Expr::Add(vec![
        Expr::fraction(1, 10).unwrap(),
        Expr::fraction(2, 10).unwrap(),
    ]);
    assert_eq!(simplify(&expr, &ALL).unwrap(), Expr::fraction(3, 10).unwrap());
}

#[test]
fn commutative_order_invariance() {
    let pattern = add([cap("P"), cap("Q")]);
    let (a, b) = (var("a"), var("b"));

    let ab = matches(&Expr::Add(vec![a.clone(), b.clone()]), &pattern).unwrap().unwrap();
    let ba = matches(&Expr::Add(vec![b.clone(), a.clone()]), &pattern).unwrap().unwrap();
    assert_eq!(ab.captures["P"], ba.captures["Q"]);
    assert_eq!(ab.captures["Q"], ba.captures["P"]);

    // the same holds for a pattern with a constrained slot
    let pattern = add([capture("P", variable()), zero()]);
    let left = matches(&Expr::Add(vec![a.clone(), Expr::zero()]), &pattern).unwrap();
    let right = matches(&Expr::Add(vec![Expr::zero(), a.clone()]), &pattern).unwrap();
    assert_eq!(left.map(|m| m.captures), right.map(|m| m.captures));
}

#[test]
fn capture_consistency() {
    let pattern = mul([cap("P"), pow(cap("P"), cap("Q"))]);
    let x = var("x");

    let same = Expr::Mul(vec![x.clone(), x.clone().pow(Expr::int(2))]);
    assert!(matches(&same, &pattern).unwrap().is_some());

    let different = Expr::Mul(vec![var("y"), x.pow(Expr::int(2))]);
    assert!(matches(&different, &pattern).unwrap().is_none());
}

#[test]
fn partial_match_locality() {
    let (a, b, x) = (var("a"), var("b"), var("x"));
    let expr = Expr::Add(vec![a.clone(), x.clone(), -x.clone(), b.clone()]);

    // a single rewrite removes exactly the matched terms and appends the replacement
    let mut matcher = Matcher::default();
    let rewritten = matcher.apply(&expr, &cancel_rule()).unwrap().unwrap();
    assert_eq!(rewritten, Expr::Add(vec![a.clone(), b.clone(), Expr::zero()]));

    // `p + 0 = p` then removes the zero; the remaining terms are `a` and `b`
    let mut rules = vec![cancel_rule()];
    rules.extend(BASIC.iter().cloned());
    let simplified = simplify(&expr, &rules).unwrap();
    assert_eq!(simplified, Expr::Add(vec![b.clone(), a.clone()]));
    assert!(matches(&simplified, &add([var_pattern("a"), var_pattern("b")])).unwrap().is_some());
}

fn var_pattern(name: &str) -> cas_rewrite::Pattern {
    cas_rewrite::builder::var(name)
}

#[test]
fn cache_correctness() {
    let config = ExpanderConfig::default().max_cache_entries(NonZeroUsize::new(2).unwrap());
    let mut expander = Expander::new(config);
    let p1 = add([cap("P"), zero()]);
    let p2 = mul([cap("P"), one()]);
    let p3 = pow(cap("P"), one());

    for pattern in [&p1, &p2, &p3] {
        expander.expand(pattern).unwrap();
    }
    assert_eq!(expander.cache_stats().misses, 3);
    assert_eq!(expander.cache_stats().evictions, 1);

    // p1 was evicted by p3's insertion
    expander.expand(&p1).unwrap();
    assert_eq!(expander.cache_stats().misses, 4);
    assert_eq!(expander.cache_stats().hits, 0);

    // inserting p1 again evicted p2, the least recently used; p3 is still cached
    expander.expand(&p3).unwrap();
    assert_eq!(expander.cache_stats().hits, 1);
    assert_eq!(expander.cache_len(), 2);
}

#[test]
fn cached_and_uncached_expansions_agree() {
    let pattern = add([mul([cap("Q"), cap("P")]), mul([cap("R"), cap("P")])]);
    let mut cached = Expander::default();
    let mut uncached = Expander::new(ExpanderConfig::default().cache_enabled(false));

    let first = cached.expand(&pattern).unwrap();
    let second = cached.expand(&pattern).unwrap();
    let fresh = uncached.expand(&pattern).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, fresh);
    assert_eq!(first.len(), 8);
}

#[test]
fn max_depth_exceeded() {
    let config = ExpanderConfig::default().max_depth(NonZeroUsize::new(2).unwrap());
    let mut expander = Expander::new(config);

    // three levels of nested slots
    let pattern = abs(abs(abs(cap("P"))));
    let err = expander.expand(&pattern).unwrap_err();
    assert_eq!(
        err.downcast_ref::<MaxDepthExceeded>(),
        Some(&MaxDepthExceeded { depth: 3, max_depth: 2 }),
    );
    assert!(err.to_string().contains("maximum depth of 2"));

    // nothing was cached for the failed expansion
    assert_eq!(expander.cache_len(), 0);
}

#[test]
fn cache_error_for_anonymous_predicate() {
    let pattern = add([
        cap("P"),
        literal().with_predicate(Predicate::anonymous(|expr| expr.is_zero())),
    ]);
    let expr = Expr::Add(vec![var("x"), Expr::zero()]);

    let err = matches(&expr, &pattern).unwrap_err();
    assert!(err.is::<CacheError>());

    let mut matcher = Matcher::new(ExpanderConfig::default().cache_enabled(false));
    let found = matcher.matches(&expr, &pattern).unwrap().unwrap();
    assert_eq!(found.captures["P"], var("x"));
}

#[test]
fn cached_expansion_keeps_predicate_identity() {
    let accept = literal().with_predicate(Predicate::named("class", |_| true));
    let reject = literal().with_predicate(Predicate::named("class", |_| false));
    let expr = Expr::int(2);

    let mut matcher = Matcher::default();
    assert!(matcher.matches(&expr, &accept).unwrap().is_some());
    let cached = matcher.matches(&expr, &reject).unwrap();
    let fresh = Matcher::default().matches(&expr, &reject).unwrap();
    assert_eq!(cached, fresh);
    assert_eq!(cached, None);
}

#[test]
fn latent_square_rule_never_fires() {
    let expr = Expr::Mul(vec![var("x"), var("x")]);
    assert_eq!(simplify(&expr, &ALL).unwrap(), expr);
}

#[test]
fn simplified_trees_are_canonical() {
    for tree in sample_trees() {
        let simplified = simplify(&tree, &ALL).unwrap();
        for node in simplified.post_order_iter() {
            match node {
                Expr::Add(args) | Expr::Mul(args) => assert_ne!(args.len(), 1, "in {}", simplified),
                _ => (),
            }
            if let Expr::Mul(args) = node {
                assert!(!args.iter().all(Expr::is_zero), "in {}", simplified);
            }
        }
    }
}
