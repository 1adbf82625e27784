#![no_main]

use gltfcheck::{ValidatorConfig, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only inputs that are JSON objects reach the document stages
    let Ok(serde_json::Value::Object(_)) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let result = rt.block_on(validate(data, &ValidatorConfig::new().with_max_issues(256)));
    assert!(result.issues.messages.len() <= 256);
});
