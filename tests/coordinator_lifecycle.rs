//! Coordinator registration, restore-once caching and lifecycle teardown.

mod common;

use std::rc::Rc;

use common::{Env, init_logger};
use statekeep::cells;
use statekeep::config::COORDINATOR_KEY;
use statekeep::coordinator::HostCoordinator;
use statekeep::errors::StatekeepError;
use statekeep::host::StateHost;
use statekeep::registry::SavedStateRegistry;
use statekeep::value::StateValue;

fn seeded_registry(env: &Env) -> Rc<SavedStateRegistry> {
    let snapshot = env.registry.capture().expect("capture");
    env.lifecycle.dispose();
    let next = Rc::new(SavedStateRegistry::new());
    next.inject(snapshot);
    next
}

#[test]
fn restore_payload_is_consumed_exactly_once() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let a = cells::value(|| 1i32);
    let b = cells::value(|| 2i32);
    a.set(&env, "a", 11).unwrap();
    b.set(&env, "b", 22).unwrap();

    let reborn = Env::new(seeded_registry(&env));
    let a = cells::value(|| 1i32);
    let b = cells::value(|| 2i32);

    // The first delegate read triggers the container-level consume...
    assert_eq!(a.get(&reborn, "a").unwrap(), 11);
    // ...after which the container entry is gone for good.
    assert!(
        reborn
            .registry
            .consume_restored_state(COORDINATOR_KEY)
            .is_none()
    );
    // Yet the second delegate still restores: it reads the cached payload,
    // not the container.
    assert_eq!(b.get(&reborn, "b").unwrap(), 22);

    let coordinator = HostCoordinator::lookup(reborn.host_id()).expect("coordinator");
    assert!(coordinator.restore_consumed());
}

#[test]
fn one_coordinator_serves_every_cell_of_a_host() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let a = cells::value(|| 0i32);
    let b = cells::late_init::<String>();
    a.set(&env, "a", 5).unwrap();
    b.set(&env, "b", "x".to_string()).unwrap();

    let snapshot = env.registry.capture().unwrap();
    assert_eq!(snapshot.len(), 1, "one provider entry per host");
    let Some(StateValue::Nested(record)) = snapshot.get(COORDINATOR_KEY) else {
        panic!("expected nested host record");
    };
    assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn disposal_unregisters_and_releases_the_host() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let counter = cells::value(|| 1i32);
    counter.set(&env, "n", 9).unwrap();
    assert!(HostCoordinator::is_registered(env.host_id()));

    env.lifecycle.dispose();
    assert!(!HostCoordinator::is_registered(env.host_id()));
    // The save provider slot was released with the coordinator.
    assert!(env.registry.capture().unwrap().is_empty());
}

#[test]
fn save_drops_the_stale_restore_cache() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let first = cells::value(|| 0i32);
    let second = cells::late_init::<i32>();
    first.set(&env, "first", 1).unwrap();
    second.set(&env, "second", 2).unwrap();

    let reborn = Env::new(seeded_registry(&env));
    let first = cells::value(|| 0i32);
    assert_eq!(first.get(&reborn, "first").unwrap(), 1);

    // A save supersedes whatever was left of the restore payload.
    let _ = reborn.registry.capture().unwrap();

    let second = cells::late_init::<i32>();
    let err = second.get(&reborn, "second").unwrap_err();
    assert!(matches!(err, StatekeepError::UninitializedAccess { .. }));
}

#[test]
fn hosts_do_not_observe_each_other() {
    init_logger();
    let left = Env::new(Rc::new(SavedStateRegistry::new()));
    let right = Env::new(Rc::new(SavedStateRegistry::new()));
    let left_cell = cells::value(|| 0i32);
    let right_cell = cells::value(|| 0i32);
    left_cell.set(&left, "n", 1).unwrap();
    right_cell.set(&right, "n", 2).unwrap();

    left.lifecycle.dispose();
    assert!(!HostCoordinator::is_registered(left.host_id()));
    assert!(HostCoordinator::is_registered(right.host_id()));
    assert_eq!(right_cell.get(&right, "n").unwrap(), 2);
}

#[test]
fn repeated_binds_register_one_source() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let cell = cells::value(|| 0i32);
    for _ in 0..5 {
        cell.set(&env, "n", 3).unwrap();
        cell.get(&env, "n").unwrap();
    }
    let snapshot = env.registry.capture().unwrap();
    let Some(StateValue::Nested(record)) = snapshot.get(COORDINATOR_KEY) else {
        panic!("expected nested host record");
    };
    assert_eq!(record.len(), 1);
}
