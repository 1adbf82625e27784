#![no_main]

use gltfcheck::{FormatHint, ValidatorConfig, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Full pipeline on raw input, once per container format
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    for format in [FormatHint::Gltf, FormatHint::Glb] {
        let config = ValidatorConfig::new().with_format(format);
        let result = rt.block_on(validate(data, &config));
        assert_eq!(
            result.issues.num_errors
                + result.issues.num_warnings
                + result.issues.num_infos
                + result.issues.num_hints,
            result.issues.messages.len()
        );
    }
});
