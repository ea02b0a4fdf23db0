use dynenum::compare::ByKey;
use dynenum::domain::Domain;
use dynenum::error::{DomainError, VariableError};
use dynenum::variable::RestrictedVariable;
use test_log::test;

#[test]
fn remove_unbinds_all_holders() {
    let domain: Domain<i32> = [1, 2, 3].into_iter().collect();
    let v1 = domain.variable(&2).unwrap();
    let v2 = domain.variable(&2).unwrap();

    assert!(domain.remove(&2));

    assert!(!v1.has_value());
    assert!(!v2.has_value());
    assert!(!domain.contains(&2));
    assert_eq!(domain.values(), vec![1, 3]);
}

#[test]
fn replace_rebinds_holders() {
    let domain: Domain<String> = ["a", "b"].into_iter().map(String::from).collect();
    let v = domain.variable("a").unwrap();

    assert!(domain.replace("a", "c".to_string()));

    assert_eq!(v.value().as_deref(), Ok("c"));
    assert!(!domain.contains("a"));
    assert!(domain.contains("c"));
}

#[test]
fn assignment_moves_subscription_between_domains() {
    let d1: Domain<i32> = (0..10).collect();
    let d2: Domain<i32> = (0..10).collect();

    let mut v = RestrictedVariable::new(&d1, &5).unwrap();
    assert!(v.holds(&5));
    assert_eq!(d1.subscriber_count(), 1);

    v = RestrictedVariable::new(&d2, &7).unwrap();

    assert!(std::ptr::eq(v.domain(), &d2));
    assert_eq!(v.value(), Ok(7));
    assert_eq!(d1.subscriber_count(), 0);
    assert_eq!(d2.subscriber_count(), 1);
}

#[test]
fn copy_assignment_moves_subscription_between_domains() {
    let d1: Domain<i32> = (0..10).collect();
    let d2: Domain<i32> = (0..10).collect();

    let mut v = d1.variable(&5).unwrap();
    let w = d2.variable(&7).unwrap();
    v.clone_from(&w);

    assert_eq!(v.value(), Ok(7));
    assert_eq!(d1.subscriber_count(), 0);
    assert_eq!(d2.subscriber_count(), 2);
}

#[test]
fn uniqueness_under_any_add_sequence() {
    let domain: Domain<u32> = Domain::new();
    // Deterministic pseudo-random sequence with plenty of repeats.
    let mut x: u32 = 17;
    for _ in 0..1000 {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345) % 64;
        domain.add(x);
    }
    let values = domain.values();
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    assert!(values.len() <= 64);
}

#[test]
fn subscription_symmetry() {
    let domain: Domain<i32> = (0..5).collect();
    let mut vars: Vec<_> = (0..5).map(|x| domain.variable(&x).unwrap()).collect();
    vars.push(domain.unbound_variable());
    assert_eq!(domain.subscriber_count(), 6);

    let taken = vars[0].take();
    assert_eq!(domain.subscriber_count(), 7);

    let copies = vars.clone();
    assert_eq!(domain.subscriber_count(), 13);

    drop(copies);
    drop(taken);
    assert_eq!(domain.subscriber_count(), 6);

    vars.truncate(2);
    assert_eq!(domain.subscriber_count(), 2);

    drop(vars);
    assert_eq!(domain.close(), Ok(()));
}

#[test]
fn busy_domain_is_reported() {
    let domain: Domain<i32> = [1].into_iter().collect();
    std::mem::forget(domain.variable(&1).unwrap());
    assert_eq!(domain.close(), Err(DomainError::Busy { subscribers: 1 }));
}

#[test]
fn mixed_mutations_keep_bindings_consistent() {
    let domain: Domain<i32> = (0..20).collect();
    let vars: Vec<_> = (0..20).map(|x| domain.variable(&x).unwrap()).collect();

    // Drop the even numbers, shift the multiples of three by 100.
    for x in (0..20).filter(|x| x % 2 == 0) {
        domain.remove(&x);
    }
    for x in (0..20).filter(|x| x % 3 == 0) {
        domain.replace(&x, x + 100);
    }

    for (x, var) in (0..20).zip(&vars) {
        match (x % 2 == 0, x % 3 == 0) {
            (true, _) => assert_eq!(var.value(), Err(VariableError::Unbound)),
            (false, true) => assert_eq!(var.value(), Ok(x + 100)),
            (false, false) => assert_eq!(var.value(), Ok(x)),
        }
        if let Some(slot) = var.slot() {
            assert_eq!(domain.value_at(slot), var.value().ok());
        }
    }
}

#[test]
fn keyed_records() {
    #[derive(Debug, Clone, PartialEq)]
    struct Status {
        code: u16,
        label: &'static str,
    }

    let statuses = Domain::with_compare(ByKey(|s: &Status| s.code));
    statuses.add_all([
        Status { code: 200, label: "OK" },
        Status { code: 404, label: "Not Found" },
        Status { code: 200, label: "duplicate" },
    ]);
    assert_eq!(statuses.len(), 2);

    let not_found = Status { code: 404, label: "" };
    let v = statuses.variable(&not_found).unwrap();
    assert_eq!(v.with_value(|s| s.label), Ok("Not Found"));

    // Equivalent replacement updates in place.
    statuses.replace(&not_found, Status { code: 404, label: "Gone Missing" });
    assert_eq!(v.with_value(|s| s.label), Ok("Gone Missing"));

    // Re-keying moves the binding.
    statuses.replace(&not_found, Status { code: 410, label: "Gone" });
    assert_eq!(v.with_value(|s| s.code), Ok(410));
}
