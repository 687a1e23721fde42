//! Fuzz target for selector resolution and feature edits.
//!
//! Builds a small inventory from arbitrary names, then checks the
//! resolution and edit rules that hold for every inventory.

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use testbed::inventory::{FeatureScope, Group, Inventory, Target};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzTarget {
    uri: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzGroup {
    name: String,
    targets: Vec<FuzzTarget>,
    nested: Option<Box<FuzzGroup>>,
}

fn build(group: FuzzGroup) -> Group {
    let mut built = Group::new(group.name);
    for t in group.targets {
        let mut target = Target::new(t.uri);
        if let Some(role) = t.role {
            target = target.with_var("role", role);
        }
        built.add_target(target);
    }
    if let Some(nested) = group.nested {
        built.add_group(build(*nested));
    }
    built
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(groups) = Vec::<FuzzGroup>::arbitrary(&mut unstructured) else {
        return;
    };
    let Ok(selector) = String::arbitrary(&mut unstructured) else {
        return;
    };

    let mut inventory = Inventory::with_groups(groups.into_iter().map(build).collect());

    for name in inventory.group_names() {
        let found = inventory.find_selector([name.as_str()]).expect("group name resolves");
        assert!(found.contains(&name));
    }

    match inventory.find_selector([selector.as_str()]) {
        Ok(found) => assert!(!found.is_empty()),
        Err(err) => assert!(err.is_not_found()),
    }

    inventory.add_feature(FeatureScope::Target, "fuzzed", &selector);
    inventory.add_feature(FeatureScope::Target, "fuzzed", &selector);
    if let Some(target) = inventory.target(&selector) {
        assert_eq!(target.features().iter().filter(|f| *f == "fuzzed").count(), 1);
    }
});
