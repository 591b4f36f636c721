#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Initial output gain in `[0, 1]`.
    pub volume: f32,
    pub volume_step: f32,
    pub seek_step_secs: u64,
    /// Songs requested when extending a queue from recommendations.
    pub recommendation_limit: usize,
    pub for_you_limit: usize,
    /// Search used to seed the For You mix before anything has been played.
    pub for_you_fallback_query: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            volume_step: 0.05,
            seek_step_secs: 5,
            recommendation_limit: 10,
            for_you_limit: 20,
            for_you_fallback_query: "top hits".to_string(),
        }
    }
}
