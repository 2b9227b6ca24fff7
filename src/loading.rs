/// Startup loading sequence state
///
/// The app moves through exactly one loading pass: parse the dataset,
/// then preload sprites batch by batch, then interaction unlocks.
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadingPhase {
    LoadingDataset,
    LoadingSprites { loaded: usize, total: usize },
    Ready,
    Failed(String),
}

impl LoadingPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadingPhase::Ready)
    }

    /// Fraction for the loading bar, dataset parsing counted as the
    /// first tenth.
    pub fn progress(&self) -> f32 {
        match self {
            LoadingPhase::LoadingDataset => 0.05,
            LoadingPhase::LoadingSprites { loaded, total } => {
                if *total == 0 {
                    1.0
                } else {
                    0.1 + 0.9 * (*loaded as f32 / *total as f32)
                }
            }
            LoadingPhase::Ready => 1.0,
            LoadingPhase::Failed(_) => 0.0,
        }
    }

    pub fn label(&self) -> String {
        match self {
            LoadingPhase::LoadingDataset => "Loading dataset\u{2026}".to_string(),
            LoadingPhase::LoadingSprites { loaded, total } => {
                format!("Loading images {}/{}", loaded, total)
            }
            LoadingPhase::Ready => String::new(),
            LoadingPhase::Failed(reason) => reason.clone(),
        }
    }
}

/// The sprite preload work queue: image names chunked into fixed-size
/// batches, loaded one batch at a time.
#[derive(Debug, Clone)]
pub struct SpriteLoadPlan {
    batches: VecDeque<Vec<String>>,
    total: usize,
    loaded: usize,
}

impl SpriteLoadPlan {
    pub fn new(names: Vec<String>, batch_size: usize) -> Self {
        let total = names.len();
        let batch_size = batch_size.max(1);
        let batches = names
            .chunks(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        Self {
            batches,
            total,
            loaded: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn next_batch(&mut self) -> Option<Vec<String>> {
        self.batches.pop_front()
    }

    /// Count a finished batch. Failures count too: progress tracks
    /// attempts, the cache tracks successes.
    pub fn record_loaded(&mut self, count: usize) {
        self.loaded = (self.loaded + count).min(self.total);
    }

    pub fn is_finished(&self) -> bool {
        self.batches.is_empty() && self.loaded >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("img_{}.png", i)).collect()
    }

    #[test]
    fn test_plan_batching() {
        let mut plan = SpriteLoadPlan::new(names(10), 4);
        assert_eq!(plan.total(), 10);
        assert_eq!(plan.next_batch().unwrap().len(), 4);
        assert_eq!(plan.next_batch().unwrap().len(), 4);
        assert_eq!(plan.next_batch().unwrap().len(), 2);
        assert!(plan.next_batch().is_none());
    }

    #[test]
    fn test_plan_finishes_after_all_batches_recorded() {
        let mut plan = SpriteLoadPlan::new(names(3), 2);
        let first = plan.next_batch().unwrap();
        plan.record_loaded(first.len());
        assert!(!plan.is_finished());
        let second = plan.next_batch().unwrap();
        plan.record_loaded(second.len());
        assert!(plan.is_finished());
        assert_eq!(plan.loaded(), 3);
    }

    #[test]
    fn test_empty_plan_is_finished() {
        let plan = SpriteLoadPlan::new(Vec::new(), 8);
        assert!(plan.is_finished());
    }

    #[test]
    fn test_phase_progress() {
        assert_eq!(LoadingPhase::Ready.progress(), 1.0);
        let halfway = LoadingPhase::LoadingSprites { loaded: 5, total: 10 };
        assert!((halfway.progress() - 0.55).abs() < 1e-5);
        assert_eq!(halfway.label(), "Loading images 5/10");
    }
}
