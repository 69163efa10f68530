#![no_main]

use libfuzzer_sys::fuzz_target;
use robin_core::RobinError;
use robin_wrr::WeightedSelector;

// Each byte pair is one operation: the low two bits of the first byte pick add/next/reset,
// the second byte supplies the weight for adds. A plain model of the counters is kept alongside.
fuzz_target!(|data: &[u8]| {
    let sel = WeightedSelector::<u16>::new();
    let mut weights: Vec<u32> = Vec::new();
    let mut position = 0u64;

    for (op, chunk) in data.chunks(2).enumerate() {
        let arg = chunk.get(1).copied().unwrap_or(0);
        match chunk[0] & 0b11 {
            0 | 1 => {
                let weight = u32::from(arg);
                match sel.add(op as u16, weight) {
                    Ok(()) => weights.push(weight),
                    Err(RobinError::InvalidWeight { weight: 0 }) => assert_eq!(weight, 0),
                    Err(e) => panic!("unexpected error {e}"),
                }
            }
            2 => match sel.next() {
                Some(_) => {
                    let cycle_weight: u64 = weights.iter().map(|w| u64::from(*w)).sum();
                    position = (position + 1) % cycle_weight;
                }
                None => assert!(weights.is_empty()),
            },
            _ => {
                sel.reset();
                weights.clear();
                position = 0;
            }
        }

        let cycle_weight: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        assert_eq!(sel.cycle_weight(), cycle_weight);
        assert_eq!(sel.len(), weights.len());
        assert_eq!(sel.cycle_position(), position);
        assert!(sel.weights().windows(2).all(|w| w[0] >= w[1]));
    }
});
