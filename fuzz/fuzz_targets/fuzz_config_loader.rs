#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use seqrec::config::{ConfigLoader, build};

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        let loader = ConfigLoader::with_defaults();
        if let Ok(loaded) = loader.load_str(yaml, Path::new("fuzz.yaml")) {
            // Anything the loader accepts must build.
            assert!(build(&loaded.config).is_ok());
        }
    }
});
