#[derive(Debug, Clone)]
pub struct PrefillResult {
    /// `None` when the caller cancelled between blocks.
    pub first_token: Option<u64>,
    pub forwardpass_durations: Vec<f64>,
}

impl PrefillResult {
    pub fn is_cancelled(&self) -> bool {
        self.first_token.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateResult {
    pub token: u64,
    pub forwardpass_duration: f64,
}
