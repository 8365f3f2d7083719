//! Property-based tests for the resolver
//!
//! 1. Shared registrations always hand out the identical `Arc`
//! 2. Transient registrations never do
//! 3. Any chain that closes on itself is reported as a cycle

use proptest::prelude::*;
use std::sync::Arc;
use wayfarer_di::{DiError, Provider, Resolver};

fn chain(resolver: &Resolver, len: usize, closed: bool) {
	for i in 0..len {
		let next = if i + 1 < len {
			Some(format!("n{}", i + 1))
		} else if closed {
			Some("n0".to_string())
		} else {
			None
		};
		let provider = match next {
			Some(next) => Provider::factory(&[next.as_str()], |_| Ok(())),
			None => Provider::factory(&[], |_| Ok(())),
		};
		resolver.register(format!("n{}", i), provider, false).unwrap();
	}
}

proptest! {
	#[test]
	fn prop_shared_identity(calls in 2usize..16) {
		let resolver = Resolver::new();
		resolver
			.singleton("value", Provider::factory(&[], |_| Ok(String::from("v"))))
			.unwrap();

		let first = resolver.make("value").unwrap();
		for _ in 1..calls {
			let next = resolver.make("value").unwrap();
			prop_assert!(Arc::ptr_eq(&first, &next));
		}
	}

	#[test]
	fn prop_transient_freshness(calls in 2usize..16) {
		let resolver = Resolver::new();
		resolver
			.register("value", Provider::factory(&[], |_| Ok(String::from("v"))), false)
			.unwrap();

		let built: Vec<_> = (0..calls).map(|_| resolver.make("value").unwrap()).collect();
		for pair in built.windows(2) {
			prop_assert!(!Arc::ptr_eq(&pair[0], &pair[1]));
		}
	}

	#[test]
	fn prop_closed_chain_is_cycle(len in 1usize..20) {
		let resolver = Resolver::new();
		chain(&resolver, len, true);

		let result = resolver.make("n0");

		let is_cycle = matches!(result, Err(DiError::CircularDependency { ref name, .. }) if name == "n0");
		prop_assert!(is_cycle);
	}

	#[test]
	fn prop_open_chain_resolves(len in 1usize..20) {
		let resolver = Resolver::new();
		chain(&resolver, len, false);

		prop_assert!(resolver.make("n0").is_ok());
	}
}
