/// Settings for a [`ReactAgent`](super::ReactAgent) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactConfig {
    /// Model turns allowed before the run is cut short
    pub max_iterations: usize,
    /// Feed malformed model output back as an observation instead of failing
    pub handle_parsing_errors: bool,
    /// Log every model turn and observation at info level
    pub verbose: bool,
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            handle_parsing_errors: true,
            verbose: false,
        }
    }
}

impl ReactConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_handle_parsing_errors(mut self, handle: bool) -> Self {
        self.handle_parsing_errors = handle;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Graph steps needed for a full run: a reason/act pair per iteration
    /// plus the closing reason step.
    pub(crate) fn recursion_limit(&self) -> usize {
        self.max_iterations.saturating_mul(2).saturating_add(2)
    }
}
