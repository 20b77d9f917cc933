#![no_main]
use dial_core::observation::Observation;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // The body comes straight off the network.
    if let Ok(obs) = Observation::parse(data) {
        let _ = obs.observed_at();
        for metric in ["relative_humidity", "dewpoint_f", "feelslike_f"] {
            let _ = obs.value(metric);
        }
    }
    let _ = dial_core::parse_metric(data);
});
