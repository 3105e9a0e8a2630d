//! Delegate cell behavior across a simulated destroy/recreate cycle.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{Env, init_logger};
use statekeep::cells;
use statekeep::config::COORDINATOR_KEY;
use statekeep::errors::StatekeepError;
use statekeep::host::{HostId, LifecycleSource, StateHost};
use statekeep::registry::SavedStateRegistry;
use statekeep::value::StateValue;

/// Capture the current state, tear the host down, and hand back a registry
/// seeded for the next incarnation.
fn recreate(env: &Env) -> Rc<SavedStateRegistry> {
    let snapshot = env.registry.capture().expect("capture");
    env.lifecycle.dispose();
    let next = Rc::new(SavedStateRegistry::new());
    next.inject(snapshot);
    next
}

#[test]
fn nullable_cell_reruns_initializer_without_a_payload() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));

    let init_calls = Rc::new(Cell::new(0));
    let calls = Rc::clone(&init_calls);
    let counter = cells::nullable_with(move || {
        calls.set(calls.get() + 1);
        10i32
    });

    assert_eq!(counter.get(&env, "a").unwrap(), Some(10));
    assert_eq!(counter.get(&env, "a").unwrap(), Some(10));
    assert_eq!(init_calls.get(), 1, "initializer must run exactly once");

    counter.set(&env, "a", None).unwrap();
    assert_eq!(counter.get(&env, "a").unwrap(), None);

    // A cleared nullable writes nothing: the record has no key `a`.
    let other = cells::value(|| 1i32);
    other.set(&env, "b", 2).unwrap();
    let snapshot = env.registry.capture().unwrap();
    let Some(StateValue::Nested(record)) = snapshot.get(COORDINATOR_KEY) else {
        panic!("expected a nested host record");
    };
    assert!(!record.contains("a"));
    assert!(record.contains("b"));

    // Recreate with no payload at all: the initializer runs again.
    env.lifecycle.dispose();
    let reborn = Env::new(Rc::new(SavedStateRegistry::new()));
    let counter = cells::nullable_with(|| 10i32);
    assert_eq!(counter.get(&reborn, "a").unwrap(), Some(10));
}

#[test]
fn value_cell_array_survives_mutation_and_recreate() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));

    let spans = cells::value(|| (0i64..10).collect::<Box<[i64]>>());
    let mut current = spans.get(&env, "d").unwrap();
    current[1] *= 10;
    spans.set(&env, "d", current.clone()).unwrap();

    let snapshot = env.registry.capture().unwrap();
    let Some(StateValue::Nested(record)) = snapshot.get(COORDINATOR_KEY) else {
        panic!("expected a nested host record");
    };
    assert_eq!(record.get("d"), Some(&StateValue::I64Array(current.clone())));

    let next_registry = recreate(&env);
    let reborn = Env::new(next_registry);
    let spans = cells::value(|| (0i64..10).collect::<Box<[i64]>>());
    let restored = spans.get(&reborn, "d").unwrap();
    assert_eq!(restored, current, "restored array must be element-wise equal");
    assert_eq!(restored[1], 10);
}

#[test]
fn restore_overwrites_the_in_memory_value_on_first_get() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let name = cells::late_init::<String>();
    name.set(&env, "name", "saved".to_string()).unwrap();

    let reborn = Env::new(recreate(&env));
    let name = cells::late_init::<String>();
    name.set(&reborn, "name", "fresh".to_string()).unwrap();
    // The first read consults the restore payload and overwrites the write
    // that raced ahead of it.
    assert_eq!(name.get(&reborn, "name").unwrap(), "saved");
    // The payload key is consumed: later writes stick.
    name.set(&reborn, "name", "fresh".to_string()).unwrap();
    assert_eq!(name.get(&reborn, "name").unwrap(), "fresh");
}

#[test]
fn late_cell_reports_uninitialized_access() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let token = cells::late_init::<String>();

    assert!(!token.is_initialized(&env, "token").unwrap());
    let err = token.get(&env, "token").unwrap_err();
    assert!(matches!(
        err,
        StatekeepError::UninitializedAccess { key } if key == "token"
    ));

    token.set(&env, "token", "t-1".to_string()).unwrap();
    assert!(token.is_initialized(&env, "token").unwrap());
    assert_eq!(token.get(&env, "token").unwrap(), "t-1");
}

#[test]
fn late_cell_probe_sees_the_restore_payload() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let token = cells::late_init::<String>();
    token.set(&env, "token", "persisted".to_string()).unwrap();

    let reborn = Env::new(recreate(&env));
    let token = cells::late_init::<String>();
    // The probe performs the restore-consumption check without erroring...
    assert!(token.is_initialized(&reborn, "token").unwrap());
    // ...and the value it pulled in satisfies the following get.
    assert_eq!(token.get(&reborn, "token").unwrap(), "persisted");
}

struct BareHost;

impl StateHost for BareHost {
    fn host_id(&self) -> HostId {
        HostId::fresh()
    }

    fn saved_state_registry(&self) -> Option<Rc<SavedStateRegistry>> {
        None
    }

    fn lifecycle(&self) -> Option<Rc<LifecycleSource>> {
        None
    }
}

#[test]
fn hosts_without_capabilities_are_rejected() {
    init_logger();
    let cell = cells::nullable::<i32>();
    assert!(matches!(
        cell.get(&BareHost, "a").unwrap_err(),
        StatekeepError::UnsupportedHost
    ));
    assert!(matches!(
        cell.set(&BareHost, "a", Some(1)).unwrap_err(),
        StatekeepError::UnsupportedHost
    ));
    let late = cells::late_init::<i32>();
    assert!(matches!(
        late.is_initialized(&BareHost, "a").unwrap_err(),
        StatekeepError::UnsupportedHost
    ));
}

#[test]
fn untouched_cells_contribute_nothing() {
    init_logger();
    let env = Env::new(Rc::new(SavedStateRegistry::new()));
    let used = cells::value(|| 1i32);
    let _untouched = cells::value(|| 2i32);
    used.get(&env, "used").unwrap();

    let snapshot = env.registry.capture().unwrap();
    let Some(StateValue::Nested(record)) = snapshot.get(COORDINATOR_KEY) else {
        panic!("expected a nested host record");
    };
    assert_eq!(record.keys().collect::<Vec<_>>(), ["used"]);
}
