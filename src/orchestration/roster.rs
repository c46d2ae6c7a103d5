//! Courier naming and scenario order generation.

use rand::seq::SliceRandom;

use crate::constants::COURIER_ROSTER;

/// Pick `count` distinct courier names at random from the base roster.
///
/// When more names are requested than the roster holds, the shuffled roster is
/// reused with numeric suffixes (`Camila-2`, ...) so every name stays unique.
pub fn courier_names(count: usize) -> Vec<String> {
    let mut base: Vec<&str> = COURIER_ROSTER.to_vec();
    base.shuffle(&mut rand::thread_rng());

    if count <= base.len() {
        return base[..count].iter().map(|n| (*n).to_string()).collect();
    }

    let mut names: Vec<String> = base.iter().map(|n| (*n).to_string()).collect();
    let mut round = 1;
    while names.len() < count {
        round += 1;
        for name in &base {
            if names.len() == count {
                break;
            }
            names.push(format!("{name}-{round}"));
        }
    }
    names
}

/// Orders `1..=count`, cycling through `destinations` in order
pub fn generate_orders(count: u64, destinations: &[String]) -> Vec<(u64, String)> {
    if destinations.is_empty() {
        return Vec::new();
    }
    (1..=count)
        .map(|id| {
            let index = ((id - 1) % destinations.len() as u64) as usize;
            (id, destinations[index].clone())
        })
        .collect()
}
