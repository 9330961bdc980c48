#![no_main]

use cpybind::BindingGenerator;
use cpybind_meta::load;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the metadata loader
        if let Ok(packages) = load::from_json_str(s) {
            // If loading succeeds, fuzz generation; diagnostics are fine, panics are not
            let generator = BindingGenerator::new();
            for pkg in &packages {
                let _ = generator.generate(pkg).output.render();
            }
        }
    }
});
