/// Identifies one run of the elapsed-time ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerGeneration(u64);

impl TickerGeneration {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Generation counter for the once-per-second elapsed display.
///
/// Every restart invalidates earlier generations, so a timer task spawned for
/// a previous puzzle notices it is stale on its next tick and exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElapsedTicker {
    generation: u64,
    running: bool,
}

impl ElapsedTicker {
    pub fn restart(&mut self) -> TickerGeneration {
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        TickerGeneration(self.generation)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn current(&self) -> TickerGeneration {
        TickerGeneration(self.generation)
    }

    #[must_use]
    pub fn is_live(&self, generation: TickerGeneration) -> bool {
        self.running && generation.0 == self.generation
    }
}

/// `Time: m:ss`.
#[must_use]
pub fn format_elapsed(secs: u64) -> String {
    format!("Time: {}:{:02}", secs / 60, secs % 60)
}
