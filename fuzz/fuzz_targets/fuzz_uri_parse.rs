#![no_main]

use dayflags::uri::{ResourceUri, Target};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(uri) = ResourceUri::parse(input) else {
        return;
    };

    // Display output must parse back to the same address.
    let rendered = uri.to_string();
    let reparsed = ResourceUri::parse(&rendered).expect("rendered address parses");
    assert_eq!(reparsed, uri);

    if let Ok(target) = Target::resolve(&uri, uri.authority()) {
        assert_eq!(target.namespace().path(), uri.segments()[0]);
    }
});
