//! Fuzz target for inventory documents.
//!
//! Any input must either fail to parse or survive a render/parse cycle
//! with its shape intact, and resolution over it must not panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use testbed::inventory::Inventory;

fuzz_target!(|data: &[u8]| {
    let Ok(inventory) = Inventory::from_slice(data) else {
        return;
    };

    if let Ok(rendered) = inventory.to_yaml() {
        let reparsed = Inventory::from_yaml(&rendered).expect("rendered inventory must parse");
        assert_eq!(reparsed.group_names(), inventory.group_names());
        assert_eq!(reparsed.resolve_targets(None), inventory.resolve_targets(None));
    }

    let names = inventory.group_names();
    let _ = inventory.find_selector(&names);
    let _ = inventory.resolve_targets(None);
});
