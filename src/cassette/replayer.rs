//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions in recorded order, one queue per
/// port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. The
    /// message lists what the cassette does hold, since a replay that runs
    /// past its recording means the test and the cassette disagree.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let available: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|((p, m), queue)| format!("{p}::{m} ({} left)", queue.len()))
            .collect();

        match self.queues.get_mut(&(port.to_string(), method.to_string())) {
            Some(queue) => queue.pop_front().unwrap_or_else(|| {
                panic!(
                    "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                     have been consumed. Remaining: [{}]",
                    available.join(", ")
                )
            }),
            None => panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} \
                 method={method:?}. Remaining: [{}]",
                available.join(", ")
            ),
        }
    }
}
